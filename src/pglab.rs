//! PostgreSQL half of the labs: one records table and the insert strategies
//! being compared on it. Per-row commit, single commit, batched commits, and
//! a COPY stream all load the same shape of data; only the transaction scope
//! and the wire path differ.
//!
//! Interrupting a strategy mid-run leaves the session inside an open
//! transaction; the driver rolls it back when the `Transaction` value drops,
//! so the next run starts from a clean session instead of an aborted one.

use std::io::Write;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use postgres::{Client, NoTls};

use crate::error::Result;
use crate::rowgen::Record;
use crate::util::types::RowCount;

const RECORDS_DDL: &str =
    "CREATE TABLE IF NOT EXISTS records (id serial PRIMARY KEY, num BIGINT, txt VARCHAR);";
const INSERT_SQL: &str = "INSERT INTO records (num, txt) VALUES ($1, $2)";
const COPY_SQL: &str = "COPY records (num, txt) FROM STDIN";

///The database itself must exist already (CREATE DATABASE is up to the
///operator)
pub fn connect(conn_info: &str) -> Result<Client> {
    Ok(Client::connect(conn_info, NoTls)?)
}

///Idempotent: CREATE TABLE IF NOT EXISTS, committed
pub fn prepare_schema(client: &mut Client) -> Result<()> {
    client.batch_execute(RECORDS_DDL)?;
    Ok(())
}

///Resets the table so each strategy starts from the same state
pub fn truncate(client: &mut Client) -> Result<()> {
    client.batch_execute("TRUNCATE records;")?;
    Ok(())
}

pub fn row_count(client: &mut Client) -> Result<RowCount> {
    let row = client.query_one("SELECT count(*) FROM records", &[])?;
    let n: i64 = row.get(0);
    Ok(n as RowCount)
}

///Strategy 1: one INSERT and one commit per row. Every row pays the full
///durability cost on its own.
pub fn insert_per_row_commit(client: &mut Client, rows: &[Record]) -> Result<Duration> {
    let stmt = client.prepare(INSERT_SQL)?;
    let start = Instant::now();
    for row in rows {
        let mut tx = client.transaction()?;
        tx.execute(&stmt, &[&row.num, &row.txt])?;
        tx.commit()?;
    }
    Ok(start.elapsed())
}

///Strategy 2: the same INSERTs, but a single commit at the end
pub fn insert_single_commit(client: &mut Client, rows: &[Record]) -> Result<Duration> {
    let stmt = client.prepare(INSERT_SQL)?;
    let start = Instant::now();
    let mut tx = client.transaction()?;
    for row in rows {
        tx.execute(&stmt, &[&row.num, &row.txt])?;
    }
    tx.commit()?;
    Ok(start.elapsed())
}

///Strategy 3: commit once per batch_size rows. Returns the summed time of
///the statement executions and commits only.
pub fn insert_batched(
    client: &mut Client,
    rows: &[Record],
    batch_size: NonZeroUsize,
) -> Result<Duration> {
    let stmt = client.prepare(INSERT_SQL)?;
    let mut total = Duration::ZERO;
    for batch in rows.chunks(batch_size.get()) {
        let start = Instant::now();
        let mut tx = client.transaction()?;
        for row in batch {
            tx.execute(&stmt, &[&row.num, &row.txt])?;
        }
        tx.commit()?;
        total += start.elapsed();
    }
    Ok(total)
}

///Strategy 4: stream every row through COPY ... FROM STDIN, committed once
///at completion. Skips per-statement parsing entirely.
pub fn insert_copy(client: &mut Client, rows: &[Record]) -> Result<Duration> {
    let start = Instant::now();
    let mut tx = client.transaction()?;
    let mut writer = tx.copy_in(COPY_SQL)?;
    let mut line = String::new();
    for row in rows {
        line.clear();
        push_copy_row(&mut line, row);
        writer.write_all(line.as_bytes())?;
    }
    writer.finish()?;
    tx.commit()?;
    Ok(start.elapsed())
}

///Text-format COPY encoding: tab-separated columns, newline-terminated.
///txt is drawn from [A-Z0-9] so nothing ever needs escaping.
pub fn push_copy_row(buf: &mut String, row: &Record) {
    buf.push_str(&row.num.to_string());
    buf.push('\t');
    buf.push_str(&row.txt);
    buf.push('\n');
}

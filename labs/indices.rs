//! Indices lab: the same selective lookup against SQLite, timed before and
//! after CREATE INDEX on the filtered column.
//!
//! The database file is deleted at startup so every run begins from a fresh,
//! empty db, and the connection is reopened between phases exactly as a
//! separate reader would.

use std::path::PathBuf;

use clap::Parser;
use rusqlite::Connection;

use rdb_labs::error::Result;
use rdb_labs::litelab;
use rdb_labs::report::{fmt_count, timed, Timing};
use rdb_labs::rowgen::expected_age_matches;
use rdb_labs::util::types::Age;

#[derive(Parser, Debug)]
#[command(name = "indices", version)]
struct Args {
    /// Database file; deleted at startup so every run starts fresh
    #[arg(long, default_value = "test_database.db")]
    db_file: PathBuf,

    /// Rows to populate (this takes a little while at the default)
    #[arg(long, default_value_t = 20_000_000)]
    rows: u64,

    /// Age to look up before and after indexing
    #[arg(long, default_value_t = 20)]
    age: Age,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("indices failed: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    if litelab::remove_db_file(&args.db_file)? {
        println!("Database deleted successfully");
    }

    //create & populate
    let mut conn = Connection::open(&args.db_file)?;
    litelab::prepare_schema(&conn)?;
    let elapsed = litelab::populate(&mut conn, args.rows)?;
    println!("populated: {}", Timing::new(args.rows, elapsed));
    close(conn)?;

    //query without index
    let conn = Connection::open(&args.db_file)?;
    let (elapsed, matches) = litelab::timed_query(&conn, args.age)?;
    println!("Time taken without index: {:.3}s", elapsed.as_secs_f64());
    println!("Number of results: {}", fmt_count(matches as u64));
    close(conn)?;

    //index creation
    let conn = Connection::open(&args.db_file)?;
    let (elapsed, ()) = timed(|| litelab::create_index(&conn))?;
    println!("Index created in {:.3}s", elapsed.as_secs_f64());
    close(conn)?;

    //query with index: same predicate, same data, so the count must not move
    let conn = Connection::open(&args.db_file)?;
    let (elapsed, matches) = litelab::timed_query(&conn, args.age)?;
    println!("Time taken with index: {:.3}s", elapsed.as_secs_f64());
    println!("Number of results: {}", fmt_count(matches as u64));
    println!(
        "Expected results for age {}: {}",
        args.age,
        fmt_count(expected_age_matches(args.rows, args.age))
    );
    close(conn)?;

    Ok(())
}

fn close(conn: Connection) -> Result<()> {
    conn.close().map_err(|(_conn, e)| e)?;
    Ok(())
}

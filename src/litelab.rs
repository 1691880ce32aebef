//! SQLite half of the labs: populate a students table, time the same lookup
//! before and after CREATE INDEX. The index must change only the latency,
//! never the result set.

use std::path::Path;
use std::time::{Duration, Instant};

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::rowgen::{students, Student};
use crate::util::types::{Age, RowCount};

const STUDENTS_DDL: &str = "CREATE TABLE students (name TEXT, age INTEGER)";
const INSERT_SQL: &str = "INSERT INTO students (name, age) VALUES (?1, ?2)";
const LOOKUP_SQL: &str = "SELECT * FROM students WHERE age = ?1 AND name LIKE 'Student%'";

///Deletes a database file left over from a previous run, so every run starts
///fresh. Idempotent; returns whether a stale file was actually removed.
pub fn remove_db_file(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if path.exists() {
        std::fs::remove_file(path)?;
        return Ok(true);
    }
    Ok(false)
}

pub fn prepare_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(STUDENTS_DDL)?;
    Ok(())
}

///Inserts students(rows) through one prepared statement, committed once
pub fn populate(conn: &mut Connection, rows: u64) -> Result<Duration> {
    let start = Instant::now();
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(INSERT_SQL)?;
        for Student { name, age } in students(rows) {
            stmt.execute(params![name, age])?;
        }
    }
    tx.commit()?;
    Ok(start.elapsed())
}

///Runs the age lookup and fetches every matching row. Returns elapsed time
///and the match count; no side effects.
pub fn timed_query(conn: &Connection, age: Age) -> Result<(Duration, RowCount)> {
    let start = Instant::now();
    let mut stmt = conn.prepare(LOOKUP_SQL)?;
    let mut rows = stmt.query(params![age])?;
    let mut fetched: Vec<Student> = Vec::new();
    while let Some(row) = rows.next()? {
        fetched.push(Student {
            name: row.get(0)?,
            age: row.get(1)?,
        });
    }
    Ok((start.elapsed(), fetched.len()))
}

///Single index-creation statement; a duplicate index name is an error that
///propagates to the caller
pub fn create_index(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE INDEX age_index ON students (age)")?;
    Ok(())
}

pub fn row_count(conn: &Connection) -> Result<RowCount> {
    let n: i64 = conn.query_row("SELECT count(*) FROM students", [], |row| row.get(0))?;
    Ok(n as RowCount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rowgen::expected_age_matches;
    use tempfile::tempdir;

    fn fresh_in_memory(rows: u64) -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        prepare_schema(&conn).unwrap();
        populate(&mut conn, rows).unwrap();
        conn
    }

    #[test]
    fn test_populate_row_count() {
        let conn = fresh_in_memory(500);
        //row_count and timed_query report counts in the same type
        let total: RowCount = row_count(&conn).unwrap();
        assert_eq!(total, 500);
        let (_, matches): (_, RowCount) = timed_query(&conn, 0).unwrap();
        assert!(matches <= total);
    }

    #[test]
    fn test_query_count_matches_age_cycle() {
        let conn = fresh_in_memory(500);
        let (_elapsed, matches) = timed_query(&conn, 20).unwrap();
        assert_eq!(matches as u64, expected_age_matches(500, 20));
    }

    #[test]
    fn test_index_does_not_change_results() {
        let conn = fresh_in_memory(1_000);
        let (_, before) = timed_query(&conn, 20).unwrap();
        create_index(&conn).unwrap();
        let (_, after) = timed_query(&conn, 20).unwrap();
        assert_eq!(before, after);
        assert_eq!(before as u64, expected_age_matches(1_000, 20));
    }

    #[test]
    fn test_duplicate_index_propagates() {
        let conn = fresh_in_memory(10);
        create_index(&conn).unwrap();
        assert!(create_index(&conn).is_err());
    }

    #[test]
    fn test_age_outside_cycle_matches_nothing() {
        let conn = fresh_in_memory(200);
        let (_, matches) = timed_query(&conn, 75).unwrap();
        assert_eq!(matches, 0);
    }

    #[test]
    fn test_reruns_never_leak_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_database.db");

        //first run: nothing to delete yet
        assert!(!remove_db_file(&path).unwrap());
        let mut conn = Connection::open(&path).unwrap();
        prepare_schema(&conn).unwrap();
        populate(&mut conn, 120).unwrap();
        assert_eq!(row_count(&conn).unwrap(), 120);
        conn.close().map_err(|(_, e)| e).unwrap();

        //second run: stale file removed, fresh db holds exactly the new rows
        assert!(remove_db_file(&path).unwrap());
        let mut conn = Connection::open(&path).unwrap();
        prepare_schema(&conn).unwrap();
        populate(&mut conn, 120).unwrap();
        assert_eq!(row_count(&conn).unwrap(), 120);
        conn.close().map_err(|(_, e)| e).unwrap();

        //and deleting twice in a row is harmless
        assert!(remove_db_file(&path).unwrap());
        assert!(!remove_db_file(&path).unwrap());
    }
}

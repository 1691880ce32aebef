//! Batch-inserts lab: how commit scope and the wire path change insert
//! throughput against PostgreSQL.
//!
//! Loads the same shape of random rows four ways — committing after every
//! row, committing once, committing once per batch, and a single COPY
//! stream — and prints the elapsed time of each so the speedups can be read
//! side by side.

use std::num::NonZeroUsize;

use clap::Parser;

use rdb_labs::error::{Error, Result};
use rdb_labs::pglab;
use rdb_labs::report::{fmt_count, Timing};
use rdb_labs::rowgen::{self, generate_rows, Record};

#[derive(Parser, Debug)]
#[command(name = "batch_inserts", version)]
struct Args {
    /// Connection string; the database itself must be created beforehand
    /// (CREATE DATABASE rdb_lab_batch_inserts)
    #[arg(
        long,
        default_value = "host=localhost port=5432 user=postgres password=myverysecretpassword dbname=rdb_lab_batch_inserts"
    )]
    conn: String,

    /// Rows for the per-row-commit and single-commit strategies
    #[arg(long, default_value_t = 10_000)]
    rows: usize,

    /// Rows per committed batch in the batched strategy
    #[arg(long, default_value_t = NonZeroUsize::new(1_000).unwrap())]
    batch_size: NonZeroUsize,

    /// Number of batches in the batched strategy
    #[arg(long, default_value_t = 1_000)]
    batches: usize,

    /// Rows for the COPY strategy
    #[arg(long, default_value_t = 1_000_000)]
    copy_rows: usize,

    /// Length of the random txt payload in each row
    #[arg(long, default_value_t = 64)]
    size_exp: usize,

    /// RNG seed for reproducible datasets; omit for fresh data every run
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn validate(&self) -> Result<()> {
        if self.size_exp == 0 {
            return Err(Error::Config("size-exp must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("batch_inserts failed: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    args.validate()?;
    let mut rng = rowgen::seeded_rng(args.seed);
    let mut client = pglab::connect(&args.conn)?;
    pglab::prepare_schema(&mut client)?;

    println!("Batch inserts lab");
    println!("txt length (size_exp): {}", args.size_exp);
    println!();

    //Step 1: individual INSERTs, one commit each
    pglab::truncate(&mut client)?;
    let rows = generate_rows(args.rows, || Record::random(&mut rng, args.size_exp));
    let elapsed = pglab::insert_per_row_commit(&mut client, &rows)?;
    report("commit per row", rows.len(), elapsed, &mut client)?;

    //Step 2: same INSERTs, one commit at the end
    pglab::truncate(&mut client)?;
    let rows = generate_rows(args.rows, || Record::random(&mut rng, args.size_exp));
    let elapsed = pglab::insert_single_commit(&mut client, &rows)?;
    report("single commit", rows.len(), elapsed, &mut client)?;

    //Step 3: commit once per batch; experiment with --batch-size to see
    //which size performs best on your machine
    pglab::truncate(&mut client)?;
    let total = args.batches * args.batch_size.get();
    let rows = generate_rows(total, || Record::random(&mut rng, args.size_exp));
    let elapsed = pglab::insert_batched(&mut client, &rows, args.batch_size)?;
    println!(
        "batched commits: {} batches of {} rows",
        fmt_count(args.batches as u64),
        fmt_count(args.batch_size.get() as u64)
    );
    report("batched commits", rows.len(), elapsed, &mut client)?;

    //Step 4: COPY, the fastest path the driver offers
    pglab::truncate(&mut client)?;
    let rows = generate_rows(args.copy_rows, || Record::random(&mut rng, args.size_exp));
    let elapsed = pglab::insert_copy(&mut client, &rows)?;
    report("copy stream", rows.len(), elapsed, &mut client)?;

    client.close()?;
    Ok(())
}

///Prints one strategy's timing plus the table count, so the reader can see
///that every strategy landed exactly the generated rows
fn report(
    label: &str,
    rows: usize,
    elapsed: std::time::Duration,
    client: &mut postgres::Client,
) -> Result<()> {
    println!("{label}: {}", Timing::new(rows as u64, elapsed));
    println!(
        "  table now holds {} rows\n",
        fmt_count(pglab::row_count(client)? as u64)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_batch_size_rejected_at_parse() {
        assert!(Args::try_parse_from(["batch_inserts", "--batch-size", "0"]).is_err());
    }

    #[test]
    fn test_zero_size_exp_rejected() {
        let args = Args::try_parse_from(["batch_inserts", "--size-exp", "0"]).unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_defaults_validate() {
        let args = Args::try_parse_from(["batch_inserts"]).unwrap();
        assert!(args.validate().is_ok());
        assert_eq!(args.batches * args.batch_size.get(), 1_000_000);
    }
}

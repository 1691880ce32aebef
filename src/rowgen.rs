use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::util::types::{Age, RowCount};

///Largest value stored in the num column; 10^17, so it always fits BIGINT
pub const NUM_MAX: i64 = 100_000_000_000_000_000;

///Alphabet for the random txt payload (uppercase ASCII letters + digits)
const TXT_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

///Ages repeat 0..AGE_CYCLE by insertion index
pub const AGE_CYCLE: u64 = 60;

///With a seed, runs are bit-for-bit reproducible; without one, each run gets
///a different dataset and runs are only statistically comparable
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

///One row of the records table (Postgres demo). Rows are independent and
///uncorrelated; the id column is left to the database's serial counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub num: i64,
    pub txt: String,
}

impl Record {
    pub fn random(rng: &mut impl Rng, size_exp: usize) -> Record {
        let num = rng.gen_range(1..=NUM_MAX);
        let txt = (0..size_exp)
            .map(|_| TXT_ALPHABET[rng.gen_range(0..TXT_ALPHABET.len())] as char)
            .collect();
        Record { num, txt }
    }
}

///Produces exactly count rows by invoking the per-row factory. Purely
///computational, no I/O; deterministic only if the factory is.
pub fn generate_rows<T>(count: RowCount, mut factory: impl FnMut() -> T) -> Vec<T> {
    (0..count).map(|_| factory()).collect()
}

///One row of the students table (SQLite demo). Fully determined by the
///insertion index: name is "Student<i>", age cycles i mod 60.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub name: String,
    pub age: Age,
}

impl Student {
    pub fn nth(i: u64) -> Student {
        Student {
            name: format!("Student{i}"),
            age: (i % AGE_CYCLE) as Age,
        }
    }
}

///Lazy on purpose: the index lab populates tens of millions of rows and
///never needs them materialized
pub fn students(count: u64) -> impl Iterator<Item = Student> {
    (0..count).map(Student::nth)
}

///How many of students(rows) have exactly this age. Closed form of counting
///i in [0, rows) with i mod 60 == age: ceil((rows - age) / 60).
pub fn expected_age_matches(rows: u64, age: Age) -> u64 {
    if age < 0 || age as u64 >= AGE_CYCLE || age as u64 >= rows {
        return 0;
    }
    (rows - age as u64).div_ceil(AGE_CYCLE)
}

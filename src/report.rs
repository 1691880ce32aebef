use std::fmt;
use std::time::{Duration, Instant};

use crate::error::Result;

///Wall-clock wrapper so every strategy is measured the same way
pub fn timed<T>(op: impl FnOnce() -> Result<T>) -> Result<(Duration, T)> {
    let start = Instant::now();
    let out = op()?;
    Ok((start.elapsed(), out))
}

///One measurement: how many rows, how long it took
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub rows: u64,
    pub elapsed: Duration,
}

impl Timing {
    pub fn new(rows: u64, elapsed: Duration) -> Self {
        Self { rows, elapsed }
    }

    pub fn rows_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.rows as f64 / secs
        }
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "took {:.3}s for {} rows ({} rows/s)",
            self.elapsed.as_secs_f64(),
            fmt_count(self.rows),
            fmt_count(self.rows_per_sec() as u64)
        )
    }
}

///Thousands separator for row counts, e.g. 1000000 -> "1,000,000"
pub fn fmt_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_count() {
        assert_eq!(fmt_count(0), "0");
        assert_eq!(fmt_count(5), "5");
        assert_eq!(fmt_count(999), "999");
        assert_eq!(fmt_count(1_000), "1,000");
        assert_eq!(fmt_count(10_000), "10,000");
        assert_eq!(fmt_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_timed_passes_value_through() {
        let (elapsed, value) = timed(|| Ok(41 + 1)).unwrap();
        assert_eq!(value, 42);
        assert!(elapsed >= Duration::ZERO);
    }

    #[test]
    fn test_rows_per_sec() {
        let timing = Timing::new(1_000, Duration::from_secs(2));
        assert!((timing.rows_per_sec() - 500.0).abs() < f64::EPSILON);
        let zero = Timing::new(1_000, Duration::ZERO);
        assert_eq!(zero.rows_per_sec(), 0.0);
    }

    #[test]
    fn test_timing_display() {
        let timing = Timing::new(10_000, Duration::from_millis(2_500));
        assert_eq!(format!("{timing}"), "took 2.500s for 10,000 rows (4,000 rows/s)");
    }
}

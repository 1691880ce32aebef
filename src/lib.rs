//! Two empirical relational-database lessons, measured instead of asserted:
//! batching writes and commits beats committing per row, and a secondary
//! index beats a table scan for selective lookups.
//!
//! The library holds the shared harness pieces (synthetic row generation,
//! wall-clock timing, reporting) plus one module per backend. The lab
//! binaries under `labs/` wire them together.

pub mod error;
pub mod litelab;
pub mod pglab;
pub mod report;
pub mod rowgen;
pub mod util;

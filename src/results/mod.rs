//! Benchmark Results Table
//!
//! One flat table of solver outcomes, keyed by (problem, solver), persisted
//! to a single CSV file.
//!
//! ## Schema Overview
//!
//! ```text
//! ResultsStore (1) ──< ResultRecord (N)   [unique (problem, solver)]
//!                          │
//!                          └── derived from Problem + solution
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use qpbench::results::{ResultRecord, ResultsStore};
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("results.csv");
//!
//! let mut store = ResultsStore::load(&path)?;
//! store.upsert(ResultRecord::new("HS21", "osqp", 120.0, true));
//! store.upsert(ResultRecord::new("HS21", "osqp", 95.0, true)); // replaces
//! store.persist(&path)?;
//!
//! let reloaded = ResultsStore::load(&path)?;
//! assert_eq!(reloaded.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod problem;
mod record;
mod store;

pub use problem::Problem;
pub use record::{ResultRecord, ResultRecordBuilder};
pub use store::ResultsStore;

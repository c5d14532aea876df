//! # qpbench: Results Store and Statistics for QP Solver Benchmarks
//!
//! qpbench keeps the outcome of every (problem, solver) pair of a
//! quadratic-programming benchmark in one CSV-backed table, and derives the
//! comparative statistics of a benchmark report from it:
//!
//! - success rate of each solver under each settings group,
//! - shifted geometric mean of solve times, charging failures the time limit,
//! - found table and largest precision errors.
//!
//! ## Design Principles
//!
//! - **Last write wins**: one live record per (problem, solver), no history
//! - **Crash-safe persistence**: the results file is replaced atomically
//! - **Pure derivation**: every table is computed from an explicit snapshot,
//!   never cached
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use qpbench::aggregate::{Aggregator, SingleSettings};
//! use qpbench::results::{ResultRecord, ResultsStore};
//!
//! let mut store = ResultsStore::load("results/maros_meszaros.csv")?;
//! store.upsert(ResultRecord::new("HS21", "osqp", 120.0, true));
//! store.persist("results/maros_meszaros.csv")?;
//!
//! let aggregator = Aggregator::default();
//! let success = aggregator.success_rate(store.all_records(), &SingleSettings::default());
//! for (solver, cells) in success.rows() {
//!     println!("{solver}: {cells:?}");
//! }
//! # Ok::<(), qpbench::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod aggregate;
pub mod error;
pub mod report;
pub mod results;
pub mod shgeom;
pub mod storage;

pub use error::{Error, Result};

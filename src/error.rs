//! Error types for qpbench
//!
//! Every fallible operation in the crate returns [`Result`], so drivers can
//! propagate load, aggregation and persist failures with a single `?`.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// qpbench error types
#[derive(Error, Debug)]
pub enum Error {
    /// Persisted results file does not match the expected layout
    #[error("Data format error: {0}\nThe results file must have the columns problem, solver, duration_us, found, cost_error, primal_error")]
    DataFormat(String),

    /// Argument outside the domain of an operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow encoding error while writing results
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Configuration could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

//! Tests for error types

use qpbench::Error;

#[test]
fn test_data_format_error() {
    let error = Error::DataFormat("results.csv: missing column(s): found".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Data format error"));
    assert!(error_str.contains("missing column(s): found"));
    assert!(error_str.contains("problem, solver, duration_us, found, cost_error, primal_error"));
}

#[test]
fn test_invalid_argument_error() {
    let error = Error::InvalidArgument("shift must be a finite number >= 1, got 0.5".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid argument"));
    assert!(error_str.contains("got 0.5"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
    assert!(error_str.contains("read-only"));
}

#[test]
fn test_arrow_error_conversion() {
    let arrow_error = arrow::error::ArrowError::SchemaError("bad schema".to_string());
    let error: Error = arrow_error.into();
    assert!(format!("{error}").contains("Arrow error"));
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: Error = json_error.into();
    assert!(format!("{error}").contains("JSON error"));
}

#[test]
fn test_error_debug() {
    let error = Error::InvalidArgument("empty".to_string());
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("InvalidArgument"));
}

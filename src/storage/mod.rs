//! Storage backend (Arrow CSV)
//!
//! The results table is persisted as a single CSV file with a header row and
//! exactly the columns of [`COLUMNS`]. Rows are decoded through an Arrow
//! [`RecordBatch`] so that every cell is type-checked against the results
//! schema before it becomes a [`ResultRecord`].
//!
//! **Write pattern**: whole-table rewrite. The table is written to a sibling
//! temporary file, synced, then renamed over the target, so a crash mid-write
//! leaves the previous snapshot in place.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, StringArray};
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::results::ResultRecord;
use crate::{Error, Result};

/// Column names of the persisted results file, in write order
pub const COLUMNS: [&str; 6] = [
    "problem",
    "solver",
    "duration_us",
    "found",
    "cost_error",
    "primal_error",
];

/// Arrow schema of the persisted results file
#[must_use]
pub fn results_schema() -> Schema {
    Schema::new(vec![
        Field::new("problem", DataType::Utf8, false),
        Field::new("solver", DataType::Utf8, false),
        Field::new("duration_us", DataType::Float64, false),
        Field::new("found", DataType::Boolean, false),
        Field::new("cost_error", DataType::Float64, true),
        Field::new("primal_error", DataType::Float64, true),
    ])
}

/// Read all records from a results file.
///
/// Returns `Ok(None)` if the file does not exist. Columns may appear in any
/// order, but the header must name each column of [`COLUMNS`] exactly once
/// and nothing else.
///
/// # Errors
///
/// Returns [`Error::DataFormat`] if the header or any cell does not match the
/// results schema, and [`Error::Io`] if the file exists but cannot be read.
pub fn read_results(path: &Path) -> Result<Option<Vec<ResultRecord>>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let (header, _) = Format::default()
        .with_header(true)
        .infer_schema(file, Some(0))
        .map_err(|e| malformed(path, &format!("unreadable header: {e}")))?;
    let schema = file_schema(path, &header)?;

    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_header(true)
        .build(File::open(path)?)
        .map_err(|e| malformed(path, &e.to_string()))?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch.map_err(|e| malformed(path, &e.to_string()))?;
        decode_batch(path, &batch, &mut records)?;
    }

    Ok(Some(records))
}

/// Write all records to a results file, replacing it atomically.
///
/// Every record is checked before anything touches the filesystem, so a
/// snapshot that [`read_results`] would reject is never written. Missing
/// parent directories are created.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if a record has an empty identifier,
/// an out-of-range value, or precision errors without a found solution.
/// Returns [`Error::Io`] if the temporary file cannot be written or renamed,
/// and [`Error::Arrow`] if the records cannot be encoded. In all cases the
/// existing file at `path` is left untouched.
pub fn write_results(path: &Path, records: &[ResultRecord]) -> Result<()> {
    for record in records {
        record.check().map_err(|reason| {
            Error::InvalidArgument(format!(
                "record ({}, {}): {reason}",
                record.problem(),
                record.solver()
            ))
        })?;
    }
    let batch = encode_records(records)?;

    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_path(path);
    let outcome = write_batch(&temp_path, &batch)
        .and_then(|()| fs::rename(&temp_path, path).map_err(Error::from));
    if outcome.is_err() {
        // Best effort: the temporary file is garbage either way
        let _ = fs::remove_file(&temp_path);
        return outcome;
    }
    sync_dir(parent.unwrap_or_else(|| Path::new(".")))
}

/// Encode records into a single batch following [`results_schema`].
///
/// # Errors
///
/// Returns [`Error::Arrow`] if the batch cannot be assembled.
pub fn encode_records(records: &[ResultRecord]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            records.iter().map(ResultRecord::problem),
        )),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(ResultRecord::solver),
        )),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(ResultRecord::duration_us),
        )),
        Arc::new(BooleanArray::from(
            records.iter().map(ResultRecord::found).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            records
                .iter()
                .map(ResultRecord::cost_error)
                .collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            records
                .iter()
                .map(ResultRecord::primal_error)
                .collect::<Vec<_>>(),
        )),
    ];

    Ok(RecordBatch::try_new(Arc::new(results_schema()), columns)?)
}

/// Build the reader schema in the column order of the file header.
fn file_schema(path: &Path, header: &Schema) -> Result<Schema> {
    let expected = results_schema();
    let mut fields = Vec::with_capacity(header.fields().len());

    for field in header.fields() {
        let name = field.name();
        let known = expected
            .field_with_name(name)
            .map_err(|_| malformed(path, &format!("unexpected column '{name}'")))?;
        if fields.iter().any(|f: &Field| f.name() == name) {
            return Err(malformed(path, &format!("duplicate column '{name}'")));
        }
        fields.push(known.clone());
    }

    let missing: Vec<&str> = COLUMNS
        .iter()
        .copied()
        .filter(|column| !fields.iter().any(|f| f.name() == column))
        .collect();
    if !missing.is_empty() {
        return Err(malformed(
            path,
            &format!("missing column(s): {}", missing.join(", ")),
        ));
    }

    Ok(Schema::new(fields))
}

fn decode_batch(path: &Path, batch: &RecordBatch, out: &mut Vec<ResultRecord>) -> Result<()> {
    let problem = typed_column::<StringArray>(path, batch, "problem")?;
    let solver = typed_column::<StringArray>(path, batch, "solver")?;
    let duration = typed_column::<Float64Array>(path, batch, "duration_us")?;
    let found = typed_column::<BooleanArray>(path, batch, "found")?;
    let cost_error = typed_column::<Float64Array>(path, batch, "cost_error")?;
    let primal_error = typed_column::<Float64Array>(path, batch, "primal_error")?;

    for row in 0..batch.num_rows() {
        let line = out.len() + 2; // 1-based, after the header
        for (name, column) in [
            ("problem", problem as &dyn Array),
            ("solver", solver as &dyn Array),
            ("duration_us", duration as &dyn Array),
            ("found", found as &dyn Array),
        ] {
            if column.is_null(row) {
                return Err(malformed(path, &format!("line {line}: empty {name}")));
            }
        }

        let mut builder = ResultRecord::builder(
            problem.value(row),
            solver.value(row),
            duration.value(row),
            found.value(row),
        );
        if cost_error.is_valid(row) {
            builder = builder.cost_error(cost_error.value(row));
        }
        if primal_error.is_valid(row) {
            builder = builder.primal_error(primal_error.value(row));
        }
        let record = builder.build();

        record
            .check()
            .map_err(|reason| malformed(path, &format!("line {line}: {reason}")))?;
        out.push(record);
    }

    Ok(())
}

fn typed_column<'a, T: Array + 'static>(
    path: &Path,
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .and_then(|column| column.as_any().downcast_ref::<T>())
        .ok_or_else(|| malformed(path, &format!("column '{name}' is missing or mistyped")))
}

fn write_batch(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(batch)?;
    writer.into_inner().sync_all()?;
    Ok(())
}

/// Flush the directory entry of a rename to disk.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".tmp");
    path.with_file_name(name)
}

fn malformed(path: &Path, reason: &str) -> Error {
    Error::DataFormat(format!("{}: {reason}", path.display()))
}

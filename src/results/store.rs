//! Results Store - the persisted (problem, solver) results table

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info, warn};

use super::{Problem, ResultRecord};
use crate::aggregate::{self, SettingsClassifier, SummaryTable, TimeLimits};
use crate::shgeom::DEFAULT_SHIFT;
use crate::{storage, Result};

/// Store for benchmark results, keyed by (problem, solver).
///
/// ## Design
///
/// Records live in a vector in insertion order. There is at most one record
/// per (problem, solver) pair: [`upsert`](Self::upsert) replaces the previous
/// record for the same pair and keeps no history.
///
/// The store is only written to disk by [`persist`](Self::persist); there is
/// no autosave. One process owns a results file at a time.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResultsStore {
    records: Vec<ResultRecord>,
}

impl ResultsStore {
    /// Create a new empty results store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a results store from a CSV file.
    ///
    /// Starts empty if the file does not exist. Duplicate (problem, solver)
    /// rows are collapsed, the last row winning.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use qpbench::results::ResultsStore;
    ///
    /// let dir = tempfile::tempdir()?;
    /// let store = ResultsStore::load(dir.path().join("results.csv"))?;
    /// assert!(store.is_empty());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataFormat`](crate::Error::DataFormat) if the file
    /// exists but is not a valid results table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let Some(records) = storage::read_results(path)? else {
            info!(path = %path.display(), "no results file, starting empty");
            return Ok(Self::new());
        };

        let rows = records.len();
        let mut store = Self::new();
        for record in records {
            if store.get(record.problem(), record.solver()).is_some() {
                warn!(
                    path = %path.display(),
                    problem = record.problem(),
                    solver = record.solver(),
                    "duplicate results row, keeping the last one"
                );
            }
            store.upsert(record);
        }

        info!(path = %path.display(), rows, records = store.len(), "loaded results");
        Ok(store)
    }

    /// Write the full table to a CSV file, replacing it atomically.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if a
    /// record could not be loaded back (empty identifier, negative or
    /// non-finite value, precision errors on an unfound record), and
    /// [`Error::Io`](crate::Error::Io) if the file cannot be written.
    /// The previous file contents survive a failed write.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        storage::write_results(path, &self.records)?;
        info!(path = %path.display(), records = self.records.len(), "persisted results");
        Ok(())
    }

    /// Insert a record, replacing any record with the same (problem, solver).
    pub fn upsert(&mut self, record: ResultRecord) {
        self.records.retain(|existing| !existing.same_key(&record));
        debug!(
            problem = record.problem(),
            solver = record.solver(),
            found = record.found(),
            duration_us = record.duration_us(),
            "upsert result"
        );
        self.records.push(record);
    }

    /// Record the outcome of `solver` on `problem`.
    ///
    /// `solution` is `None` when the solver returned nothing; the precision
    /// errors are computed by the problem itself.
    pub fn update<P: Problem + ?Sized>(
        &mut self,
        problem: &P,
        solver: &str,
        solution: Option<&P::Solution>,
        duration_us: f64,
    ) {
        self.upsert(ResultRecord::from_solution(
            problem,
            solver,
            solution,
            duration_us,
        ));
    }

    /// Get all records, in insertion order.
    #[must_use]
    pub fn all_records(&self) -> &[ResultRecord] {
        &self.records
    }

    /// Get the record for a (problem, solver) pair.
    #[must_use]
    pub fn get(&self, problem: &str, solver: &str) -> Option<&ResultRecord> {
        self.records
            .iter()
            .find(|r| r.problem() == problem && r.solver() == solver)
    }

    /// Get the number of records in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct solver names, sorted.
    #[must_use]
    pub fn solvers(&self) -> Vec<&str> {
        distinct(self.records.iter().map(ResultRecord::solver))
    }

    /// Distinct problem names, sorted.
    #[must_use]
    pub fn problems(&self) -> Vec<&str> {
        distinct(self.records.iter().map(ResultRecord::problem))
    }

    /// Success rate table (solvers × settings groups) of the current records.
    #[must_use]
    pub fn success_rate_table<C: SettingsClassifier + ?Sized>(&self, settings: &C) -> SummaryTable {
        aggregate::success_rate(&self.records, settings)
    }

    /// Shifted geometric mean table (solvers × settings groups) of the
    /// current records, with the default shift.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if a
    /// time limit is negative.
    pub fn geometric_mean_table<C: SettingsClassifier + ?Sized>(
        &self,
        settings: &C,
        time_limits: &TimeLimits,
    ) -> Result<SummaryTable> {
        aggregate::geometric_mean(&self.records, settings, time_limits, DEFAULT_SHIFT)
    }
}

fn distinct<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    names.collect::<BTreeSet<_>>().into_iter().collect()
}

//! Derived tables handed to report renderers

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::Result;

/// Two-dimensional summary: one row per solver, one column per settings
/// group.
///
/// A cell is `None` when the statistic is undefined for that pair, for
/// instance when the solver never ran under those settings. Rows and columns
/// are sorted by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    solvers: Vec<String>,
    settings: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl SummaryTable {
    /// Assemble a table over the given universe of solvers and settings.
    ///
    /// Pairs absent from `values` become empty cells.
    pub(crate) fn from_values(
        solvers: BTreeSet<String>,
        settings: BTreeSet<String>,
        values: &BTreeMap<(String, String), f64>,
    ) -> Self {
        let solvers: Vec<String> = solvers.into_iter().collect();
        let settings: Vec<String> = settings.into_iter().collect();
        let cells = solvers
            .iter()
            .map(|solver| {
                settings
                    .iter()
                    .map(|group| values.get(&(solver.clone(), group.clone())).copied())
                    .collect()
            })
            .collect();

        Self {
            solvers,
            settings,
            cells,
        }
    }

    /// Row labels (solver names).
    #[must_use]
    pub fn solvers(&self) -> &[String] {
        &self.solvers
    }

    /// Column labels (settings groups).
    #[must_use]
    pub fn settings(&self) -> &[String] {
        &self.settings
    }

    /// Get the value for a (solver, settings) pair.
    #[must_use]
    pub fn get(&self, solver: &str, settings: &str) -> Option<f64> {
        let row = self.solvers.iter().position(|s| s == solver)?;
        let column = self.settings.iter().position(|s| s == settings)?;
        self.cells[row][column]
    }

    /// Iterate over rows as (solver, cells), cells ordered like
    /// [`settings`](Self::settings).
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.solvers
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(Vec::as_slice))
    }

    /// Check if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.solvers.is_empty()
    }

    /// Serialize the table to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Which solver found a solution to which problem.
///
/// Every problem present in the snapshot is a column for every solver; a
/// (solver, problem) pair that was never run is missing rather than `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundTable {
    problems: Vec<String>,
    found: BTreeMap<String, BTreeMap<String, bool>>,
}

impl FoundTable {
    pub(crate) const fn new(
        problems: Vec<String>,
        found: BTreeMap<String, BTreeMap<String, bool>>,
    ) -> Self {
        Self { problems, found }
    }

    /// All problems, sorted.
    #[must_use]
    pub fn problems(&self) -> &[String] {
        &self.problems
    }

    /// All solvers, sorted.
    pub fn solvers(&self) -> impl Iterator<Item = &str> {
        self.found.keys().map(String::as_str)
    }

    /// Whether `solver` found a solution to `problem`, `None` if it never
    /// ran on it.
    #[must_use]
    pub fn get(&self, solver: &str, problem: &str) -> Option<bool> {
        self.found.get(solver)?.get(problem).copied()
    }

    /// Success rate (%) of each solver over the problems it attempted.
    ///
    /// Problems a solver never ran on are not counted as failures.
    #[must_use]
    pub fn summary(&self) -> BTreeMap<String, f64> {
        self.found
            .iter()
            .map(|(solver, problems)| {
                let found = problems.values().filter(|found| **found).count();
                (solver.clone(), percentage(found, problems.len()))
            })
            .collect()
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    100.0 * part as f64 / whole as f64
}

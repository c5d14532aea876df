//! Result Record - outcome of one solver on one problem

use serde::{Deserialize, Serialize};

use super::Problem;

/// Result Record represents a single (problem, solver) outcome.
///
/// A record is found when the solver returned a candidate solution, which
/// is not necessarily feasible or optimal. The precision errors are only
/// present for found records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultRecord {
    problem: String,
    solver: String,
    duration_us: f64,
    found: bool,
    cost_error: Option<f64>,
    primal_error: Option<f64>,
}

impl ResultRecord {
    /// Create a new record without precision errors.
    ///
    /// # Arguments
    ///
    /// * `problem` - Test-case identifier
    /// * `solver` - Solver identifier
    /// * `duration_us` - Wall-clock solve time in microseconds
    /// * `found` - Whether the solver returned a solution
    #[must_use]
    pub fn new(
        problem: impl Into<String>,
        solver: impl Into<String>,
        duration_us: f64,
        found: bool,
    ) -> Self {
        Self {
            problem: problem.into(),
            solver: solver.into(),
            duration_us,
            found,
            cost_error: None,
            primal_error: None,
        }
    }

    /// Create a builder for constructing a record with precision errors.
    #[must_use]
    pub fn builder(
        problem: impl Into<String>,
        solver: impl Into<String>,
        duration_us: f64,
        found: bool,
    ) -> ResultRecordBuilder {
        ResultRecordBuilder::new(problem, solver, duration_us, found)
    }

    /// Derive a record from the solution a solver returned for a problem.
    ///
    /// `solution` is `None` when the solver failed to return one, which
    /// makes the record unfound and leaves both errors absent.
    pub fn from_solution<P: Problem + ?Sized>(
        problem: &P,
        solver: impl Into<String>,
        solution: Option<&P::Solution>,
        duration_us: f64,
    ) -> Self {
        Self {
            problem: problem.name().to_string(),
            solver: solver.into(),
            duration_us,
            found: solution.is_some(),
            cost_error: problem.cost_error(solution),
            primal_error: problem.primal_error(solution),
        }
    }

    /// Get the problem identifier.
    #[must_use]
    pub fn problem(&self) -> &str {
        &self.problem
    }

    /// Get the solver identifier.
    #[must_use]
    pub fn solver(&self) -> &str {
        &self.solver
    }

    /// Get the solve time in microseconds.
    #[must_use]
    pub const fn duration_us(&self) -> f64 {
        self.duration_us
    }

    /// Whether the solver returned a solution.
    #[must_use]
    pub const fn found(&self) -> bool {
        self.found
    }

    /// Get the cost error, if a solution was found.
    #[must_use]
    pub const fn cost_error(&self) -> Option<f64> {
        self.cost_error
    }

    /// Get the primal residual error, if a solution was found.
    #[must_use]
    pub const fn primal_error(&self) -> Option<f64> {
        self.primal_error
    }

    /// Whether this record and `other` share the same (problem, solver) key.
    #[must_use]
    pub fn same_key(&self, other: &Self) -> bool {
        self.problem == other.problem && self.solver == other.solver
    }

    /// Check the value ranges of the record.
    ///
    /// Returns a description of the first violation found.
    pub(crate) fn check(&self) -> std::result::Result<(), String> {
        // Empty fields read back as null in the results file
        for (name, value) in [("problem", &self.problem), ("solver", &self.solver)] {
            if value.is_empty() {
                return Err(format!("{name} must not be empty"));
            }
        }
        if !self.found && (self.cost_error.is_some() || self.primal_error.is_some()) {
            return Err(format!(
                "unfound record ({}, {}) must not carry precision errors",
                self.problem, self.solver
            ));
        }
        if !self.duration_us.is_finite() || self.duration_us < 0.0 {
            return Err(format!(
                "duration_us must be finite and nonnegative, got {}",
                self.duration_us
            ));
        }
        for (name, value) in [
            ("cost_error", self.cost_error),
            ("primal_error", self.primal_error),
        ] {
            if let Some(value) = value {
                if value.is_nan() || value < 0.0 {
                    return Err(format!("{name} must be nonnegative, got {value}"));
                }
            }
        }
        Ok(())
    }
}

/// Builder for `ResultRecord`.
#[derive(Debug)]
pub struct ResultRecordBuilder {
    record: ResultRecord,
}

impl ResultRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(
        problem: impl Into<String>,
        solver: impl Into<String>,
        duration_us: f64,
        found: bool,
    ) -> Self {
        Self {
            record: ResultRecord::new(problem, solver, duration_us, found),
        }
    }

    /// Set the cost error.
    #[must_use]
    pub const fn cost_error(mut self, cost_error: f64) -> Self {
        self.record.cost_error = Some(cost_error);
        self
    }

    /// Set the primal residual error.
    #[must_use]
    pub const fn primal_error(mut self, primal_error: f64) -> Self {
        self.record.primal_error = Some(primal_error);
        self
    }

    /// Build the `ResultRecord`.
    #[must_use]
    pub fn build(self) -> ResultRecord {
        self.record
    }
}

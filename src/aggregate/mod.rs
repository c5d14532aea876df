//! Comparative statistics over a results snapshot
//!
//! Every function here is pure: it takes an explicit `&[ResultRecord]`
//! snapshot and derives a fresh table, nothing is cached between calls.
//!
//! ## Universe
//!
//! Rows are all solvers of the snapshot and columns all settings groups
//! produced by the [`SettingsClassifier`]. No solver or settings group is
//! dropped for lack of successes; a pair that never ran is an empty cell.
//!
//! ## Unfound attempts in runtime means
//!
//! [`geometric_mean`] charges an unfound attempt the time limit of its
//! settings group. When the group has no configured limit, unfound attempts
//! are left out of the mean instead, and a pair with no remaining duration
//! is an empty cell.
//!
//! ## Usage
//!
//! ```rust
//! use qpbench::aggregate::{self, SingleSettings, TimeLimits};
//! use qpbench::results::ResultRecord;
//!
//! let records = vec![
//!     ResultRecord::new("p1", "s1", 100.0, true),
//!     ResultRecord::new("p2", "s1", 0.0, false),
//!     ResultRecord::new("p1", "s2", 200.0, true),
//! ];
//! let settings = SingleSettings::default();
//!
//! let success = aggregate::success_rate(&records, &settings);
//! assert_eq!(success.get("s1", "default"), Some(50.0));
//! assert_eq!(success.get("s2", "default"), Some(100.0));
//!
//! let limits = TimeLimits::from([("default".to_string(), 1000.0)]);
//! let runtimes = aggregate::geometric_mean(&records, &settings, &limits, 10.0)?;
//! assert!(runtimes.get("s1", "default").unwrap() > 100.0);
//! # Ok::<(), qpbench::Error>(())
//! ```

mod config;
mod settings;
mod table;

pub use config::{AggregationConfig, AggregationConfigBuilder, TimeLimits};
pub use settings::{SettingsClassifier, SingleSettings};
pub use table::{FoundTable, SummaryTable};

use std::collections::{BTreeMap, BTreeSet};

use crate::results::ResultRecord;
use crate::shgeom::{self, shgeom};
use crate::Result;
use table::percentage;

/// Precision metric carried by found records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMetric {
    /// Difference to the reference optimal cost
    Cost,
    /// Largest constraint violation
    Primal,
}

impl ErrorMetric {
    fn of(self, record: &ResultRecord) -> Option<f64> {
        match self {
            Self::Cost => record.cost_error(),
            Self::Primal => record.primal_error(),
        }
    }
}

/// Records of a snapshot bucketed by (solver, settings).
struct Groups<'a> {
    solvers: BTreeSet<String>,
    settings: BTreeSet<String>,
    members: BTreeMap<(String, String), Vec<&'a ResultRecord>>,
}

impl<'a> Groups<'a> {
    fn new<C: SettingsClassifier + ?Sized>(records: &'a [ResultRecord], classifier: &C) -> Self {
        let mut groups = Self {
            solvers: BTreeSet::new(),
            settings: BTreeSet::new(),
            members: BTreeMap::new(),
        };
        for record in records {
            let settings = classifier.settings_of(record);
            groups.solvers.insert(record.solver().to_string());
            groups.settings.insert(settings.clone());
            groups
                .members
                .entry((record.solver().to_string(), settings))
                .or_default()
                .push(record);
        }
        groups
    }

    fn into_table(self, values: &BTreeMap<(String, String), f64>) -> SummaryTable {
        SummaryTable::from_values(self.solvers, self.settings, values)
    }
}

/// Build the found table of a snapshot.
#[must_use]
pub fn found_table(records: &[ResultRecord]) -> FoundTable {
    let problems: BTreeSet<&str> = records.iter().map(ResultRecord::problem).collect();
    let mut found: BTreeMap<String, BTreeMap<String, bool>> = BTreeMap::new();
    for record in records {
        found
            .entry(record.solver().to_string())
            .or_default()
            .insert(record.problem().to_string(), record.found());
    }
    FoundTable::new(problems.into_iter().map(String::from).collect(), found)
}

/// Success rate (%) of each (solver, settings) pair.
///
/// The denominator is the number of distinct problems the solver attempted
/// under those settings: a problem it never ran on is not a failure.
#[must_use]
pub fn success_rate<C: SettingsClassifier + ?Sized>(
    records: &[ResultRecord],
    settings: &C,
) -> SummaryTable {
    let groups = Groups::new(records, settings);
    let values = groups
        .members
        .iter()
        .map(|(key, members)| {
            let attempted: BTreeSet<&str> = members.iter().map(|r| r.problem()).collect();
            let found: BTreeSet<&str> = members
                .iter()
                .filter(|r| r.found())
                .map(|r| r.problem())
                .collect();
            (key.clone(), percentage(found.len(), attempted.len()))
        })
        .collect();
    groups.into_table(&values)
}

/// Shifted geometric mean of the runtime of each (solver, settings) pair.
///
/// Found records contribute their `duration_us`. Unfound records are
/// charged `time_limits[settings]`, or excluded when the settings group has
/// no time limit.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
/// `shift < 1` or a time limit is negative or not finite.
pub fn geometric_mean<C: SettingsClassifier + ?Sized>(
    records: &[ResultRecord],
    settings: &C,
    time_limits: &TimeLimits,
    shift: f64,
) -> Result<SummaryTable> {
    shgeom::check_shift(shift)?;
    config::validate_time_limits(time_limits)?;

    let groups = Groups::new(records, settings);
    let mut values = BTreeMap::new();
    for ((solver, group), members) in &groups.members {
        let limit = time_limits.get(group).copied();
        let durations: Vec<f64> = members
            .iter()
            .filter_map(|r| if r.found() { Some(r.duration_us()) } else { limit })
            .collect();
        if durations.is_empty() {
            continue;
        }
        values.insert((solver.clone(), group.clone()), shgeom(&durations, shift)?);
    }
    Ok(groups.into_table(&values))
}

/// Largest precision error of each (solver, settings) pair over its found
/// records.
///
/// A pair without any found record carrying the metric is an empty cell.
#[must_use]
pub fn max_error<C: SettingsClassifier + ?Sized>(
    records: &[ResultRecord],
    settings: &C,
    metric: ErrorMetric,
) -> SummaryTable {
    let groups = Groups::new(records, settings);
    let values = groups
        .members
        .iter()
        .filter_map(|(key, members)| {
            members
                .iter()
                .filter(|r| r.found())
                .filter_map(|r| metric.of(r))
                .reduce(f64::max)
                .map(|max| (key.clone(), max))
        })
        .collect();
    groups.into_table(&values)
}

/// Aggregation functions bound to one [`AggregationConfig`].
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: AggregationConfig,
}

impl Aggregator {
    /// Create an aggregator from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// the configuration does not validate.
    pub fn new(config: AggregationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// See [`found_table`].
    #[must_use]
    pub fn found_table(&self, records: &[ResultRecord]) -> FoundTable {
        found_table(records)
    }

    /// See [`success_rate`].
    #[must_use]
    pub fn success_rate<C: SettingsClassifier + ?Sized>(
        &self,
        records: &[ResultRecord],
        settings: &C,
    ) -> SummaryTable {
        success_rate(records, settings)
    }

    /// See [`geometric_mean`], with the configured shift and time limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// a duration is invalid.
    pub fn geometric_mean<C: SettingsClassifier + ?Sized>(
        &self,
        records: &[ResultRecord],
        settings: &C,
    ) -> Result<SummaryTable> {
        geometric_mean(
            records,
            settings,
            &self.config.time_limits,
            self.config.shift,
        )
    }

    /// See [`max_error`].
    #[must_use]
    pub fn max_error<C: SettingsClassifier + ?Sized>(
        &self,
        records: &[ResultRecord],
        settings: &C,
        metric: ErrorMetric,
    ) -> SummaryTable {
        max_error(records, settings, metric)
    }
}

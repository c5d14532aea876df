//! Aggregation configuration

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::shgeom::{self, DEFAULT_SHIFT};
use crate::{Error, Result};

/// Time limit (microseconds) of each settings group.
///
/// Settings groups missing from the map have no time limit.
pub type TimeLimits = BTreeMap<String, f64>;

/// Parameters of the runtime aggregation.
///
/// ## JSON form
///
/// ```json
/// { "shift": 10.0, "time_limits": { "default": 1000000.0 } }
/// ```
///
/// Both fields are optional and default to [`DEFAULT_SHIFT`] and no limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AggregationConfig {
    /// Shift of the shifted geometric mean, in microseconds
    pub shift: f64,
    /// Penalty charged to unfound attempts, per settings group
    pub time_limits: TimeLimits,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            shift: DEFAULT_SHIFT,
            time_limits: TimeLimits::new(),
        }
    }
}

impl AggregationConfig {
    /// Create a builder starting from the defaults.
    #[must_use]
    pub fn builder() -> AggregationConfigBuilder {
        AggregationConfigBuilder::default()
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] on malformed JSON or unknown fields, and
    /// [`Error::InvalidArgument`] if the values are out of range.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the shift is at least 1 and that time limits are finite
    /// and nonnegative.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        shgeom::check_shift(self.shift)?;
        validate_time_limits(&self.time_limits)
    }
}

pub(crate) fn validate_time_limits(time_limits: &TimeLimits) -> Result<()> {
    match time_limits
        .iter()
        .find(|(_, limit)| !limit.is_finite() || **limit < 0.0)
    {
        Some((settings, limit)) => Err(Error::InvalidArgument(format!(
            "time limit of settings '{settings}' must be finite and nonnegative, got {limit}"
        ))),
        None => Ok(()),
    }
}

/// Builder for `AggregationConfig`.
#[derive(Debug, Default)]
pub struct AggregationConfigBuilder {
    config: AggregationConfig,
}

impl AggregationConfigBuilder {
    /// Set the shift of the shifted geometric mean.
    #[must_use]
    pub const fn shift(mut self, shift: f64) -> Self {
        self.config.shift = shift;
        self
    }

    /// Set the time limit (microseconds) of a settings group.
    #[must_use]
    pub fn time_limit(mut self, settings: impl Into<String>, limit_us: f64) -> Self {
        self.config.time_limits.insert(settings.into(), limit_us);
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the shift or a time limit is
    /// out of range.
    pub fn build(self) -> Result<AggregationConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

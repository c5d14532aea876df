//! Settings groups - external classification of solver configurations

use crate::results::ResultRecord;

/// Assigns each record to a settings group (e.g. a tolerance profile).
///
/// The group key is opaque to aggregation: records are only compared by it.
/// Any `Fn(&ResultRecord) -> String` closure is a classifier.
pub trait SettingsClassifier {
    /// Settings group of `record`.
    fn settings_of(&self, record: &ResultRecord) -> String;
}

impl<F> SettingsClassifier for F
where
    F: Fn(&ResultRecord) -> String,
{
    fn settings_of(&self, record: &ResultRecord) -> String {
        self(record)
    }
}

/// Classifier putting every record in one settings group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleSettings {
    name: String,
}

impl SingleSettings {
    /// Name of the group used by [`SingleSettings::default`].
    pub const DEFAULT_NAME: &'static str = "default";

    /// Create a classifier with a single named group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Get the group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for SingleSettings {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}

impl SettingsClassifier for SingleSettings {
    fn settings_of(&self, _record: &ResultRecord) -> String {
        self.name.clone()
    }
}

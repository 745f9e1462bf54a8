//! Experiment Record - a named experiment and its run variants

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ConfigurationRecord;

/// One experiment: a name, a start time, and the configuration records of all
/// of its run variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentRecord {
    experiment_id: String,
    name: String,
    started_at: DateTime<Utc>,
    configurations: Vec<ConfigurationRecord>,
}

impl ExperimentRecord {
    /// Create a new experiment record started now, with no configurations yet.
    #[must_use]
    pub fn new(experiment_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            name: name.into(),
            started_at: Utc::now(),
            configurations: Vec::new(),
        }
    }

    /// Get the experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the experiment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the start timestamp.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Get the configuration records.
    #[must_use]
    pub fn configurations(&self) -> &[ConfigurationRecord] {
        &self.configurations
    }

    /// Append a configuration record.
    pub fn add_configuration(&mut self, config: ConfigurationRecord) {
        self.configurations.push(config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experiment_record_new() {
        let experiment = ExperimentRecord::new("exp-1", "lr sweep");
        assert_eq!(experiment.experiment_id(), "exp-1");
        assert_eq!(experiment.name(), "lr sweep");
        assert!(experiment.configurations().is_empty());
    }

    #[test]
    fn test_add_configuration_preserves_order() {
        let mut experiment = ExperimentRecord::new("exp-1", "sweep");
        experiment.add_configuration(ConfigurationRecord::builder("cfg-a").build());
        experiment.add_configuration(ConfigurationRecord::builder("cfg-b").build());
        let ids: Vec<&str> = experiment
            .configurations()
            .iter()
            .map(ConfigurationRecord::config_id)
            .collect();
        assert_eq!(ids, ["cfg-a", "cfg-b"]);
    }
}

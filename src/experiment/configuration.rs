//! Configuration Record - one experiment run variant

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One experiment run variant: the hyperparameters that distinguish it plus
/// the opaque nested result data its series are read from.
///
/// Records are immutable inputs to the pipeline; the engine never mutates
/// them. Parameter maps preserve insertion order because series labels and
/// group representatives are built in key order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigurationRecord {
    config_id: String,
    parameters: IndexMap<String, Value>,
    series_source: Value,
}

impl ConfigurationRecord {
    /// Create a new configuration record.
    ///
    /// # Arguments
    ///
    /// * `config_id` - Unique identifier for the run variant
    /// * `parameters` - Hyperparameters, in display order
    /// * `series_source` - Nested result data (metric series live inside)
    #[must_use]
    pub fn new(
        config_id: impl Into<String>,
        parameters: IndexMap<String, Value>,
        series_source: Value,
    ) -> Self {
        Self {
            config_id: config_id.into(),
            parameters,
            series_source,
        }
    }

    /// Create a builder for constructing a record incrementally.
    #[must_use]
    pub fn builder(config_id: impl Into<String>) -> ConfigurationRecordBuilder {
        ConfigurationRecordBuilder::new(config_id)
    }

    /// Get the configuration ID.
    #[must_use]
    pub fn config_id(&self) -> &str {
        &self.config_id
    }

    /// Get the hyperparameter mapping.
    #[must_use]
    pub const fn parameters(&self) -> &IndexMap<String, Value> {
        &self.parameters
    }

    /// Get the nested result data.
    #[must_use]
    pub const fn series_source(&self) -> &Value {
        &self.series_source
    }
}

/// Builder for `ConfigurationRecord`.
#[derive(Debug)]
pub struct ConfigurationRecordBuilder {
    config_id: String,
    parameters: IndexMap<String, Value>,
    series_source: Value,
}

impl ConfigurationRecordBuilder {
    /// Create a new builder with the required ID.
    #[must_use]
    pub fn new(config_id: impl Into<String>) -> Self {
        Self {
            config_id: config_id.into(),
            parameters: IndexMap::new(),
            series_source: Value::Null,
        }
    }

    /// Add one hyperparameter.
    #[must_use]
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Set the nested result data.
    #[must_use]
    pub fn series_source(mut self, source: Value) -> Self {
        self.series_source = source;
        self
    }

    /// Build the `ConfigurationRecord`.
    #[must_use]
    pub fn build(self) -> ConfigurationRecord {
        ConfigurationRecord {
            config_id: self.config_id,
            parameters: self.parameters,
            series_source: self.series_source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_preserves_parameter_order() {
        let config = ConfigurationRecord::builder("cfg-1")
            .parameter("lr", 0.1)
            .parameter("seed", 3)
            .parameter("opt", "adam")
            .build();

        let keys: Vec<&String> = config.parameters().keys().collect();
        assert_eq!(keys, ["lr", "seed", "opt"]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = ConfigurationRecord::builder("cfg-1")
            .parameter("lr", 0.1)
            .series_source(json!({"line": {"data": [1.0, 2.0]}}))
            .build();

        let json = serde_json::to_string(&config).unwrap();
        let back: ConfigurationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}

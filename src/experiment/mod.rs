//! Experiment records and storage
//!
//! Data structures for the experiment side of the dashboard: run
//! configurations, experiments, stored analyses, and an in-memory store.
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentRecord (1) ──< ConfigurationRecord (N) [parameters + series data]
//!         │
//!         └──< AnalysisRecord (N) [pipeline spec]
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use serde_json::json;
//! use trazado::experiment::{AnalysisSpec, ConfigurationRecord, ExperimentRecord};
//!
//! let mut experiment = ExperimentRecord::new("exp-001", "lr sweep");
//! experiment.add_configuration(
//!     ConfigurationRecord::builder("cfg-001")
//!         .parameter("lr", 0.1)
//!         .series_source(json!({"line": {"points": [0, 1], "data": [0.9, 0.5]}}))
//!         .build(),
//! );
//!
//! let spec = AnalysisSpec::new("loss", "line.points", "line.data");
//! ```

mod analysis;
mod configuration;
mod experiment_record;
mod store;

pub use analysis::{AnalysisRecord, AnalysisSpec};
pub use configuration::{ConfigurationRecord, ConfigurationRecordBuilder};
pub use experiment_record::ExperimentRecord;
pub use store::ExperimentStore;

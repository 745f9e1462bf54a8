//! Analysis Spec & Record - user-authored pipeline definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::step::Step;

/// A user-authored analysis: where to read the series and what to do to them.
///
/// `x_data` / `y_data` are dotted key paths into each configuration's result
/// data; `steps` is the ordered pipeline; `layout` is an optional override
/// deep-merged onto the default plot layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisSpec {
    /// Display name of the analysis
    pub name: String,
    /// Key path for the x sequence of each configuration
    pub x_data: String,
    /// Key path for the y sequence of each configuration
    pub y_data: String,
    /// Ordered pipeline steps
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Optional layout override (deep-default merged onto the defaults)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Value>,
}

impl AnalysisSpec {
    /// Create a spec with no steps and no layout override.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        x_data: impl Into<String>,
        y_data: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            x_data: x_data.into(),
            y_data: y_data.into(),
            steps: Vec::new(),
            layout: None,
        }
    }

    /// Append a step to the pipeline.
    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Set the layout override.
    #[must_use]
    pub fn layout(mut self, layout: Value) -> Self {
        self.layout = Some(layout);
        self
    }
}

/// A stored analysis: a spec attached to an experiment at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisRecord {
    analysis_id: String,
    experiment_id: String,
    created_at: DateTime<Utc>,
    spec: AnalysisSpec,
}

impl AnalysisRecord {
    /// Create a new analysis record created now.
    #[must_use]
    pub fn new(
        analysis_id: impl Into<String>,
        experiment_id: impl Into<String>,
        spec: AnalysisSpec,
    ) -> Self {
        Self {
            analysis_id: analysis_id.into(),
            experiment_id: experiment_id.into(),
            created_at: Utc::now(),
            spec,
        }
    }

    /// Get the analysis ID.
    #[must_use]
    pub fn analysis_id(&self) -> &str {
        &self.analysis_id
    }

    /// Get the parent experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Get the analysis spec.
    #[must_use]
    pub const fn spec(&self) -> &AnalysisSpec {
        &self.spec
    }
}

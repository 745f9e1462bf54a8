//! Pipeline state and the step-fold engine
//!
//! A pipeline evaluation is a strict left fold of the ordered step list over
//! an immutable [`PipelineState`]: each step consumes the previous state and
//! returns a new one. Steps are never skipped, reordered, or parallelized;
//! later steps observe the exact output of earlier ones, including
//! cardinality changes.

pub mod ops;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::experiment::ConfigurationRecord;
use crate::keypath::resolve_series;
use crate::step::Step;

/// Hyperparameter mapping of one pipeline entry, in display order.
pub type Parameters = IndexMap<String, Value>;

/// One plotted line in progress: an x/y pair, optionally with a standard
/// deviation band produced by an averaging step.
///
/// Invariant: `x` and `y` have equal length whenever both are populated, and
/// every operator preserves that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesPair {
    /// The x sequence
    pub x: Vec<f64>,
    /// The y sequence
    pub y: Vec<f64>,
    /// Element-wise standard deviation of `y`, when an averaging step
    /// requested it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_std: Option<Vec<f64>>,
}

impl SeriesPair {
    /// Create a pair with no std band.
    #[must_use]
    pub const fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self { x, y, y_std: None }
    }
}

/// The working state of one pipeline evaluation: two index-aligned sequences,
/// where entry `i` of each describes one logical plotted line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineState {
    /// Parameter set of each entry
    pub parameters: Vec<Parameters>,
    /// Series of each entry
    pub series: Vec<SeriesPair>,
}

impl PipelineState {
    /// Build the initial state from configuration records (Series Extractor).
    ///
    /// Entry order follows the record order. Each record's series are read
    /// from its result data via the two dotted key paths; a missing path
    /// yields an empty sequence, never an error.
    #[must_use]
    pub fn from_records(configs: &[ConfigurationRecord], x_key: &str, y_key: &str) -> Self {
        let parameters = configs
            .iter()
            .map(|config| config.parameters().clone())
            .collect();
        let series = configs
            .iter()
            .map(|config| {
                SeriesPair::new(
                    resolve_series(config.series_source(), x_key),
                    resolve_series(config.series_source(), y_key),
                )
            })
            .collect();
        Self { parameters, series }
    }

    /// Number of entries (plotted lines) currently in the state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Check whether the state has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Apply the ordered step list to a state via strict left fold.
///
/// Unknown steps pass the state through unchanged (tolerant dispatch for
/// user-authored pipelines). Evaluation is atomic: the first fatal operator
/// error aborts the fold, wrapped with the offending step index and action
/// name.
///
/// # Errors
/// Returns [`crate::Error::ShapeMismatch`] or [`crate::Error::NonFinite`]
/// when an operator hits the corresponding fatal condition.
pub fn evaluate_steps(mut state: PipelineState, steps: &[Step]) -> Result<PipelineState> {
    for (index, step) in steps.iter().enumerate() {
        debug!(
            index,
            action = step.action_name(),
            entries = state.len(),
            "applying pipeline step"
        );
        state = apply_step(state, step)
            .map_err(|source| source.into_error(index, step.action_name()))?;
    }
    Ok(state)
}

fn apply_step(state: PipelineState, step: &Step) -> std::result::Result<PipelineState, ops::OpError> {
    match step {
        Step::Compare { parameters } => Ok(ops::compare(state, parameters)),
        Step::Drop { parameters } => Ok(ops::drop_keys(state, parameters)),
        Step::Best { score, parameters } => Ok(ops::best(state, *score, parameters)),
        Step::Average {
            parameters,
            with_std,
        } => ops::average(state, parameters, *with_std),
        Step::MovingAverage { window_size } => ops::moving_average(state, *window_size),
        Step::Merge { parameters } => ops::merge(state, parameters),
        Step::Filter { parameters } => Ok(ops::filter(state, parameters)),
        Step::LogTransform { axis } => ops::log_transform(state, *axis),
        Step::SubtractMin { epsilon } => Ok(ops::subtract_min(state, *epsilon)),
        Step::Unknown => Ok(state),
    }
}

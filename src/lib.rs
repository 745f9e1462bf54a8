//! # Trazado: Analysis Pipeline Engine for Experiment Metric Series
//!
//! Trazado turns a set of experiment configuration records (hyperparameters
//! plus raw numeric series) and a user-authored, declarative step list into
//! the final set of named series ready for plotting: canonical grouping of
//! heterogeneous parameter sets, best-of / mean-std / merge / windowed
//! aggregation, order-sensitive step composition, and epsilon-guarded
//! numeric transforms.
//!
//! The engine is a pure, synchronous function from `(configurations, steps)`
//! to named series. It renders nothing, knows nothing about chart appearance,
//! and persists nothing; rendering and storage are external collaborators.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use trazado::experiment::{AnalysisSpec, ConfigurationRecord};
//! use trazado::step::Step;
//!
//! let configs = vec![
//!     ConfigurationRecord::builder("cfg-a")
//!         .parameter("lr", 0.1)
//!         .series_source(json!({"line": {"points": [0, 1, 2], "data": [1.0, 2.0, 3.0]}}))
//!         .build(),
//!     ConfigurationRecord::builder("cfg-b")
//!         .parameter("lr", 0.1)
//!         .series_source(json!({"line": {"points": [0, 1, 2], "data": [3.0, 2.0, 1.0]}}))
//!         .build(),
//! ];
//!
//! let spec = AnalysisSpec::new("loss", "line.points", "line.data").step(Step::Average {
//!     parameters: vec![],
//!     with_std: true,
//! });
//!
//! let output = trazado::evaluate(&configs, &spec)?;
//! assert_eq!(output.traces[0].y, vec![2.0, 2.0, 2.0]);
//! # Ok::<(), trazado::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod error;
pub mod experiment;
pub mod group;
pub mod keypath;
pub mod pipeline;
pub mod plot;
pub mod step;

pub use error::{Error, Result};

use experiment::{AnalysisSpec, ConfigurationRecord};
use pipeline::PipelineState;
use plot::{build_traces, default_layout, merge_layout, AnalysisOutput};
use serde_json::json;

/// Evaluate one analysis: extract the initial series, fold the step list,
/// build labeled traces and the resolved layout.
///
/// Evaluation is atomic; a fatal step error surfaces here with the offending
/// step index and action name, and no partial result is returned.
///
/// # Errors
/// Returns [`Error::ShapeMismatch`] or [`Error::NonFinite`] when a step hits
/// the corresponding fatal condition.
pub fn evaluate(configs: &[ConfigurationRecord], spec: &AnalysisSpec) -> Result<AnalysisOutput> {
    let state = PipelineState::from_records(configs, &spec.x_data, &spec.y_data);
    let state = pipeline::evaluate_steps(state, &spec.steps)?;
    let overlay = spec.layout.clone().unwrap_or_else(|| json!({}));
    Ok(AnalysisOutput {
        traces: build_traces(&state),
        layout: merge_layout(overlay, &default_layout()),
    })
}

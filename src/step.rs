//! Declarative pipeline steps
//!
//! A user-authored analysis pipeline is an ordered list of [`Step`] values,
//! one tagged variant per action. Unknown action names deserialize to
//! [`Step::Unknown`], which the engine passes through as a no-op: pipelines
//! are user data, and an unrecognized action must not poison the whole spec.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default epsilon for [`Step::SubtractMin`].
pub const DEFAULT_EPSILON: f64 = 1e-10;

const fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

/// Scoring method for the `best` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMethod {
    /// Highest final `y` value wins
    MaxFinal,
    /// Lowest final `y` value wins
    MinFinal,
    /// Highest mean of `y` (area-under-curve proxy) wins
    MaxAuc,
    /// Lowest mean of `y` (area-under-curve proxy) wins
    MinAuc,
}

/// Series axis addressed by axis-wise transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// The x sequence
    X,
    /// The y sequence
    Y,
}

/// One transformation in an analysis pipeline.
///
/// Serialized form is internally tagged on `action` with snake_case names,
/// matching the stored spec documents:
///
/// ```json
/// {"action": "best", "score": "max_final", "parameters": ["seed"]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Restrict every parameter set to the listed keys
    Compare {
        /// Keys to keep
        #[serde(default)]
        parameters: Vec<String>,
    },
    /// Remove the listed keys from every parameter set
    Drop {
        /// Keys to remove
        #[serde(default)]
        parameters: Vec<String>,
    },
    /// Keep the single best-scoring entry of each group
    Best {
        /// Ranking criterion
        score: ScoreMethod,
        /// Keys excluded from the group identity
        #[serde(default)]
        parameters: Vec<String>,
    },
    /// Element-wise mean of each group, optionally with a std band
    Average {
        /// Keys excluded from the group identity (and from the result)
        #[serde(default)]
        parameters: Vec<String>,
        /// Also compute the element-wise standard deviation of `y`
        #[serde(default)]
        with_std: bool,
    },
    /// Smooth each `y` with a centered window mean
    MovingAverage {
        /// Window size; 1 (or 2) is the identity
        window_size: usize,
    },
    /// Concatenate each group's points and sort them by `x`
    Merge {
        /// Keys excluded from the group identity (and from the result)
        #[serde(default)]
        parameters: Vec<String>,
    },
    /// Keep entries matching any of the single-key predicates
    Filter {
        /// Predicates; each contributes its first key/value pair
        #[serde(default)]
        parameters: Vec<IndexMap<String, Value>>,
    },
    /// Replace the named axis with `ln(1 + value)` element-wise
    LogTransform {
        /// Axis to transform
        axis: Axis,
    },
    /// Shift all `y` so the global minimum sits `epsilon` above zero
    SubtractMin {
        /// Offset above zero for the shifted global minimum
        #[serde(default = "default_epsilon")]
        epsilon: f64,
    },
    /// Unrecognized action; passed through unchanged by the engine
    #[serde(other)]
    Unknown,
}

impl Step {
    /// Action name as it appears in the serialized spec, for logs and errors.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::Compare { .. } => "compare",
            Self::Drop { .. } => "drop",
            Self::Best { .. } => "best",
            Self::Average { .. } => "average",
            Self::MovingAverage { .. } => "moving_average",
            Self::Merge { .. } => "merge",
            Self::Filter { .. } => "filter",
            Self::LogTransform { .. } => "log_transform",
            Self::SubtractMin { .. } => "subtract_min",
            Self::Unknown => "unknown",
        }
    }
}

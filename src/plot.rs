//! Labels, layout, and plot export
//!
//! The last stage of an evaluation: surviving `(parameters, series)` pairs
//! become named trace descriptors for the rendering collaborator, and the
//! caller's layout override is deep-merged onto the defaults. Traces can be
//! exported as a plain JSON array ("save plot").

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

use crate::error::Result;
use crate::pipeline::{Parameters, PipelineState};

/// Symmetric error-bar descriptor attached to a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBar {
    /// Per-point magnitudes
    pub values: Vec<f64>,
}

/// One named series ready for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Display label, `"key:value"` pairs comma-joined
    pub name: String,
    /// The x sequence
    pub x: Vec<f64>,
    /// The y sequence
    pub y: Vec<f64>,
    /// Symmetric error band, when the series carries a std band
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_y: Option<ErrorBar>,
}

/// Result of one pipeline evaluation: traces plus the resolved layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// Named series, in pipeline entry order
    pub traces: Vec<Trace>,
    /// Layout override deep-merged onto the defaults
    pub layout: Value,
}

/// Build the display label of one parameter set: `"key:value"` joined with
/// `", "` in insertion order. Strings render unquoted; an empty set yields an
/// empty label.
#[must_use]
pub fn label(parameters: &Parameters) -> String {
    let mut out = String::new();
    for (key, value) in parameters {
        if !out.is_empty() {
            out.push_str(", ");
        }
        out.push_str(key);
        out.push(':');
        match value {
            Value::String(s) => out.push_str(s),
            other => out.push_str(&other.to_string()),
        }
    }
    out
}

/// Turn a final pipeline state into named trace descriptors.
#[must_use]
pub fn build_traces(state: &PipelineState) -> Vec<Trace> {
    state
        .parameters
        .iter()
        .zip(&state.series)
        .map(|(parameters, pair)| Trace {
            name: label(parameters),
            x: pair.x.clone(),
            y: pair.y.clone(),
            error_y: pair
                .y_std
                .as_ref()
                .map(|values| ErrorBar {
                    values: values.clone(),
                }),
        })
        .collect()
}

/// The fixed default layout: plain background, outside ticks on a line-only
/// x axis, log-scaled autoranged y axis, wide right margin for the legend.
#[must_use]
pub fn default_layout() -> Value {
    json!({
        "plot_bgcolor": "#ddd",
        "font": {
            "family": "Calibri, Candara, Segoe, 'Segoe UI', Optima, Arial, sans-serif",
            "size": 14,
        },
        "xaxis": {
            "autorange": true,
            "showline": true,
            "showgrid": false,
            "ticks": "outside",
        },
        "yaxis": {
            "type": "log",
            "autorange": true,
        },
        "margin": {
            "t": 20,
            "r": 420,
            "b": 50,
            "l": 50,
        },
    })
}

/// Deep-default merge: values present in `overlay` always win; keys missing
/// from `overlay` (recursively, for nested maps) inherit from `defaults`.
#[must_use]
pub fn merge_layout(overlay: Value, defaults: &Value) -> Value {
    match (overlay, defaults) {
        (Value::Object(mut overlay), Value::Object(defaults)) => {
            for (key, default_value) in defaults {
                match overlay.get_mut(key) {
                    None => {
                        overlay.insert(key.clone(), default_value.clone());
                    }
                    Some(existing) => {
                        let merged = merge_layout(existing.take(), default_value);
                        *existing = merged;
                    }
                }
            }
            Value::Object(overlay)
        }
        (overlay, _) => overlay,
    }
}

/// Serialize traces to the export JSON document: a top-level array of trace
/// descriptors.
///
/// # Errors
/// Returns [`crate::Error::Json`] if serialization fails.
pub fn export_traces(traces: &[Trace]) -> Result<String> {
    Ok(serde_json::to_string(traces)?)
}

/// Write the export JSON document to a file.
///
/// # Errors
/// Returns [`crate::Error::Json`] on serialization failure or
/// [`crate::Error::Io`] on write failure.
pub fn write_traces(traces: &[Trace], path: impl AsRef<Path>) -> Result<()> {
    std::fs::write(path, export_traces(traces)?)?;
    Ok(())
}

//! Error types for trazado
//!
//! A pipeline evaluation is atomic: any fatal condition aborts the whole run
//! and reports the offending step index and action name. Partial results are
//! never returned.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trazado error types
#[derive(Error, Debug)]
pub enum Error {
    /// Group members with unequal series lengths, or an x/y pairing violation
    #[error("shape mismatch in step {index} ({action}): {detail}")]
    ShapeMismatch {
        /// Zero-based index of the offending step
        index: usize,
        /// Action name of the offending step
        action: &'static str,
        /// What was mismatched
        detail: String,
    },

    /// A transform produced a non-finite value (e.g. log of a value below -1)
    #[error("non-finite result in step {index} ({action}): {detail}")]
    NonFinite {
        /// Zero-based index of the offending step
        index: usize,
        /// Action name of the offending step
        action: &'static str,
        /// Which element went non-finite
        detail: String,
    },

    /// JSON error (export serialization / spec parsing)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (plot export)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

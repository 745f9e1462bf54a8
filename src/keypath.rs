//! Dotted key-path resolution over nested result data
//!
//! Experiment runs store their recorded metrics as an opaque nested structure
//! (maps and sequences). An analysis spec addresses a series inside it with a
//! dotted path such as `"line.data"` or `"folds.0.loss"`. Resolution is total:
//! a missing path yields `None` (and an empty series at the extraction layer),
//! never an error.

use serde_json::Value;
use tracing::debug;

/// Resolve a dotted key path against a nested value.
///
/// Map segments are looked up by key; sequence segments are indexed when the
/// path segment parses as an unsigned integer. Any other combination yields
/// `None`.
///
/// # Example
/// ```
/// use serde_json::json;
/// use trazado::keypath::resolve;
///
/// let source = json!({"line": {"data": [1.0, 2.0]}});
/// assert_eq!(resolve(&source, "line.data"), Some(&json!([1.0, 2.0])));
/// assert_eq!(resolve(&source, "line.missing"), None);
/// ```
#[must_use]
pub fn resolve<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// Resolve a key path to a numeric sequence.
///
/// Returns an empty sequence when the path is missing, does not point at a
/// sequence, or contains non-numeric elements. The miss is logged at debug
/// level; it is deliberately not an error so that runs lacking a metric simply
/// plot as empty lines.
#[must_use]
pub fn resolve_series(root: &Value, path: &str) -> Vec<f64> {
    let Some(Value::Array(items)) = resolve(root, path) else {
        debug!(path, "key path missing or not a sequence, using empty series");
        return Vec::new();
    };

    let mut series = Vec::with_capacity(items.len());
    for item in items {
        match item.as_f64() {
            Some(v) => series.push(v),
            None => {
                debug!(path, "non-numeric element in series, using empty series");
                return Vec::new();
            }
        }
    }
    series
}

//! Canonical group keys for parameter sets
//!
//! Aggregation steps (`best`, `average`, `merge`) bucket entries whose
//! parameter sets are equal after removing a given set of keys. The bucket
//! identity is an explicit canonical string built from the sorted remaining
//! pairs, so two structurally equal mappings produce the same key regardless
//! of insertion order.

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// Canonical, hashable identity of a parameter set after key exclusion.
///
/// Two parameter mappings that are structurally equal post-exclusion map to
/// the same `GroupKey`; insertion order never matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey(String);

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the canonical group key for `parameters` with `exclude` keys removed.
///
/// Remaining pairs are sorted lexicographically by key and rendered into a
/// byte-stable string.
#[must_use]
pub fn group_key(parameters: &IndexMap<String, Value>, exclude: &[String]) -> GroupKey {
    let mut pairs: Vec<(&String, &Value)> = parameters
        .iter()
        .filter(|(key, _)| !exclude.iter().any(|e| e == *key))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let mut out = String::new();
    for (key, value) in pairs {
        out.push_str(key);
        out.push('=');
        render_value(value, &mut out);
        out.push(';');
    }
    GroupKey(out)
}

/// Render a parameter value into its canonical byte-stable form.
///
/// Scalars render directly; nested maps render with sorted keys so that the
/// result is independent of insertion order at every level.
fn render_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => {
            out.push('"');
            out.push_str(s);
            out.push('"');
        }
        Value::Array(items) => {
            out.push('[');
            for item in items {
                render_value(item, out);
                out.push(',');
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for key in keys {
                out.push_str(key);
                out.push(':');
                render_value(&map[key], out);
                out.push(',');
            }
            out.push('}');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_group_key_insertion_order_independent() {
        let a = params(&[("lr", json!(0.1)), ("seed", json!(3)), ("opt", json!("adam"))]);
        let b = params(&[("opt", json!("adam")), ("lr", json!(0.1)), ("seed", json!(3))]);
        assert_eq!(group_key(&a, &[]), group_key(&b, &[]));
    }

    #[test]
    fn test_group_key_exclusion() {
        let a = params(&[("lr", json!(0.1)), ("seed", json!(1))]);
        let b = params(&[("lr", json!(0.1)), ("seed", json!(2))]);
        assert_ne!(group_key(&a, &[]), group_key(&b, &[]));
        assert_eq!(
            group_key(&a, &["seed".to_string()]),
            group_key(&b, &["seed".to_string()])
        );
    }

    #[test]
    fn test_group_key_distinguishes_values_and_types() {
        let a = params(&[("lr", json!(0.1))]);
        let b = params(&[("lr", json!(0.2))]);
        let c = params(&[("lr", json!("0.1"))]);
        assert_ne!(group_key(&a, &[]), group_key(&b, &[]));
        assert_ne!(group_key(&a, &[]), group_key(&c, &[]));
    }

    #[test]
    fn test_group_key_nested_object_sorted() {
        let a = params(&[("cfg", json!({"b": 2, "a": 1}))]);
        let b = params(&[("cfg", json!({"a": 1, "b": 2}))]);
        assert_eq!(group_key(&a, &[]), group_key(&b, &[]));
    }

    #[test]
    fn test_group_key_empty_after_exclusion() {
        let a = params(&[("lr", json!(0.1))]);
        let b = params(&[("lr", json!(0.5))]);
        let exclude = vec!["lr".to_string()];
        assert_eq!(group_key(&a, &exclude), group_key(&b, &exclude));
    }
}

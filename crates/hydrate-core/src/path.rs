//! Path resolver (`get`): navigates dotted/bracketed paths across the
//! Value Adapter, accumulating missing-key reports.

use crate::error::MissingKeys;
use crate::value::Value;

/// `get(path, root, missing) -> value | None`, per spec §4.2.
///
/// `path` is a dot-and-bracket string: `a.b[2].c`, `a.0.name`, `.Data.x`,
/// `x?`. The leading `.Data.`/`$.Data.` alias is stripped if present, and a
/// trailing `?` marks the lookup optional (absence is not recorded as
/// missing).
pub fn get(path: &str, root: &Value, missing: &mut MissingKeys) -> Option<Value> {
    let (stripped, optional) = strip_optional_marker(strip_data_alias(path));
    let segments = split_segments(stripped);

    let mut current = root.clone();
    for segment in &segments {
        match resolve_segment(&current, segment) {
            Some(next) => current = next,
            None => {
                if !optional {
                    missing.record_key(path.to_string());
                }
                return None;
            }
        }
    }

    Some(normalize_integral_float(current))
}

fn strip_data_alias(path: &str) -> &str {
    path.strip_prefix(".Data.")
        .or_else(|| path.strip_prefix("$.Data."))
        .unwrap_or(path)
}

fn strip_optional_marker(path: &str) -> (&str, bool) {
    match path.strip_suffix('?') {
        Some(rest) => (rest, true),
        None => (path, false),
    }
}

/// Split `a.b[2].c` into `["a", "b", "2", "c"]`. `.`, `[`, `]` are all
/// segment separators; empty segments produced by adjacent separators
/// (e.g. the boundary between `]` and `.`) are dropped.
fn split_segments(path: &str) -> Vec<&str> {
    path.split(['.', '[', ']']).filter(|s| !s.is_empty()).collect()
}

fn resolve_segment(current: &Value, segment: &str) -> Option<Value> {
    let current = current.deref()?;
    if let Some(map) = current.as_mapping() {
        return map
            .get(segment)
            .cloned()
            .or_else(|| map.get(&pascal_case(segment)).cloned());
    }
    if let Some(seq) = current.as_sequence() {
        let index: usize = segment.parse().ok()?;
        return seq.get(index).cloned();
    }
    if let Value::Record(_) = current {
        return current.field_of(segment);
    }
    None
}

fn pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn normalize_integral_float(value: Value) -> Value {
    match value {
        Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Value::Int(f as i64),
        other => other,
    }
}

#[cfg(test)]
mod path_tests {
    use super::*;
    use crate::value::Value;

    fn state_with_array() -> Value {
        Value::object([(
            "a".to_string(),
            Value::array([Value::string("x"), Value::string("y")]),
        )])
    }

    #[test]
    fn resolves_sequence_index() {
        let mut missing = MissingKeys::new();
        let root = state_with_array();
        assert_eq!(get("a.0", &root, &mut missing), Some(Value::string("x")));
        assert!(missing.is_empty());
    }

    #[test]
    fn bracketed_index_syntax() {
        let mut missing = MissingKeys::new();
        let root = state_with_array();
        assert_eq!(get("a[1]", &root, &mut missing), Some(Value::string("y")));
    }

    #[test]
    fn records_missing_key_once_for_required_path() {
        let mut missing = MissingKeys::new();
        let root = Value::object([]);
        assert_eq!(get("a.b.x", &root, &mut missing), None);
        assert_eq!(missing.keys().collect::<Vec<_>>(), vec!["a.b.x"]);
    }

    #[test]
    fn optional_marker_suppresses_missing_record() {
        let mut missing = MissingKeys::new();
        let root = Value::object([]);
        assert_eq!(get("a.b.x?", &root, &mut missing), None);
        assert!(missing.is_empty());
    }

    #[test]
    fn data_alias_is_stripped() {
        let mut missing = MissingKeys::new();
        let root = Value::object([("x".to_string(), Value::string("v"))]);
        assert_eq!(get(".Data.x", &root, &mut missing), Some(Value::string("v")));
        assert_eq!(get("$.Data.x", &root, &mut missing), Some(Value::string("v")));
    }

    #[test]
    fn float_exactly_integral_is_normalized() {
        let mut missing = MissingKeys::new();
        let root = Value::object([("n".to_string(), Value::Float(42.0))]);
        assert_eq!(get("n", &root, &mut missing), Some(Value::Int(42)));
    }

    #[test]
    fn out_of_range_index_fails() {
        let mut missing = MissingKeys::new();
        let root = state_with_array();
        assert_eq!(get("a.5", &root, &mut missing), None);
        assert_eq!(missing.keys().collect::<Vec<_>>(), vec!["a.5"]);
    }
}

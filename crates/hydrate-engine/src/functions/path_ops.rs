//! Stateful `get`, `coalesce`, `getOrOriginal`.

use hydrate_core::{HydrateError, MissingKeys, Value};

use super::support::{arg, arg_str};

/// `get(path) -> any`. When the rewriter's nested-call-root special case
/// applies, the evaluator includes the nested call's resolved value as a
/// second explicit argument — that becomes the traversal root in place of
/// the ambient state (spec §9 open question: resolved by arity, not by
/// textual shape; see `hydrate-compiler::rewrite`).
pub fn get(args: &[Value], state: &Value, missing: &mut MissingKeys) -> Result<Value, HydrateError> {
    let path = arg_str(args, 0, "get")?;
    let root = args.get(1).unwrap_or(state);
    Ok(hydrate_core::path::get(path, root, missing).unwrap_or(Value::Null))
}

/// `coalesce(key, fallback)`.
pub fn coalesce(args: &[Value], state: &Value, _missing: &mut MissingKeys) -> Result<Value, HydrateError> {
    let key = arg(args, 0, "coalesce")?;
    let fallback = args.get(1).cloned().unwrap_or(Value::Null);
    if let Some(path) = key.as_str() {
        let mut scratch = MissingKeys::new();
        if let Some(v) = hydrate_core::path::get(path, state, &mut scratch) {
            if !v.is_null() {
                return Ok(v);
            }
        }
    }
    Ok(coerce_fallback(fallback))
}

fn coerce_fallback(fallback: Value) -> Value {
    match fallback {
        Value::String(s) => {
            if let Ok(i) = s.parse::<i64>() {
                return Value::Int(i);
            }
            if let Ok(f) = s.parse::<f64>() {
                return Value::Float(f);
            }
            if s == "true" {
                return Value::Bool(true);
            }
            if s == "false" {
                return Value::Bool(false);
            }
            Value::String(strip_matching_quotes(&s))
        }
        other => other,
    }
}

fn strip_matching_quotes(s: &str) -> String {
    let mut chars = s.chars();
    match (chars.next(), chars.next_back()) {
        (Some('"'), Some('"')) | (Some('\''), Some('\'')) if s.len() >= 2 => {
            s[1..s.len() - 1].to_string()
        }
        _ => s.to_string(),
    }
}

/// `getOrOriginal(key, definitions)` — like `get`, but a required-and-
/// missing key returns the literal `{{key}}` form instead of absent.
pub fn get_or_original(
    args: &[Value],
    state: &Value,
    missing: &mut MissingKeys,
) -> Result<Value, HydrateError> {
    let key = arg_str(args, 0, "getOrOriginal")?.to_string();
    let optional = key.ends_with('?');
    match hydrate_core::path::get(&key, state, missing) {
        Some(v) => Ok(v),
        None if optional => Ok(Value::Null),
        None => Ok(Value::String(format!("{{{{{key}}}}}"))),
    }
}

#[cfg(test)]
mod path_ops_tests {
    use super::*;

    #[test]
    fn coalesce_numeric_fallback_coercion() {
        let state = Value::object([]);
        let mut missing = MissingKeys::new();
        assert_eq!(
            coalesce(&[Value::string("missing?"), Value::Int(0)], &state, &mut missing).unwrap(),
            Value::Int(0)
        );
        assert_eq!(
            coalesce(&[Value::string("missing?"), Value::string("42")], &state, &mut missing)
                .unwrap(),
            Value::Int(42)
        );
    }

    #[test]
    fn coalesce_prefers_present_value() {
        let state = Value::object([("x".to_string(), Value::string("present"))]);
        let mut missing = MissingKeys::new();
        assert_eq!(
            coalesce(&[Value::string("x"), Value::string("fallback")], &state, &mut missing)
                .unwrap(),
            Value::string("present")
        );
    }

    #[test]
    fn get_uses_nested_root_when_supplied() {
        let state = Value::object([]);
        let root = Value::object([("id".to_string(), Value::string("res-1"))]);
        let mut missing = MissingKeys::new();
        assert_eq!(
            get(&[Value::string("id"), root], &state, &mut missing).unwrap(),
            Value::string("res-1")
        );
    }

    #[test]
    fn get_or_original_returns_literal_form_when_required_and_missing() {
        let state = Value::object([]);
        let mut missing = MissingKeys::new();
        assert_eq!(
            get_or_original(&[Value::string("x")], &state, &mut missing).unwrap(),
            Value::string("{{x}}")
        );
        assert_eq!(missing.keys().collect::<Vec<_>>(), vec!["x"]);
    }
}

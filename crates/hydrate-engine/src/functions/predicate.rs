//! `truthy`, `truthyValue`, `len`, `startsWith`, `endsWith`.

use hydrate_core::{HydrateError, MissingKeys, Value};

use super::support::{arg, fn_err};

/// Presence-and-truthiness check over a state path. Deliberately uses a
/// scratch accumulator rather than the caller's: `{{if truthy "flag"}}` is
/// a check, not a requirement, so a missing `flag` must never surface in
/// the compound missing-key error.
pub fn truthy(args: &[Value], state: &Value, _missing: &mut MissingKeys) -> Result<Value, HydrateError> {
    let key = arg(args, 0, "truthy")?
        .as_str()
        .ok_or_else(|| fn_err("truthy", "expected a string key"))?;
    let mut scratch = MissingKeys::new();
    let truthy = hydrate_core::path::get(key, state, &mut scratch)
        .map(|v| v.truthy_value())
        .unwrap_or(false);
    Ok(Value::Bool(truthy))
}

pub fn truthy_value(args: &[Value]) -> Result<Value, HydrateError> {
    Ok(Value::Bool(arg(args, 0, "truthyValue")?.truthy_value()))
}

pub fn len(args: &[Value]) -> Result<Value, HydrateError> {
    let v = arg(args, 0, "len")?;
    let (unwrapped, valid) = v.unwrap_nullable();
    if !valid {
        return Ok(Value::Int(0));
    }
    match unwrapped {
        None | Some(Value::Null) => Ok(Value::Int(0)),
        Some(Value::String(s)) => Ok(Value::Int(s.chars().count() as i64)),
        Some(Value::Array(items)) => Ok(Value::Int(items.len() as i64)),
        Some(Value::Object(map)) => Ok(Value::Int(map.len() as i64)),
        Some(other) => {
            tracing::warn!(?other, "len called on a value kind with no defined length");
            Ok(Value::Int(0))
        }
    }
}

pub fn starts_with(args: &[Value]) -> Result<Value, HydrateError> {
    let s = unwrap_string(arg(args, 0, "startsWith")?);
    let prefix = arg(args, 1, "startsWith")?.display_string();
    Ok(Value::Bool(s.starts_with(&prefix)))
}

pub fn ends_with(args: &[Value]) -> Result<Value, HydrateError> {
    let s = unwrap_string(arg(args, 0, "endsWith")?);
    let suffix = arg(args, 1, "endsWith")?.display_string();
    Ok(Value::Bool(s.ends_with(&suffix)))
}

fn unwrap_string(v: &Value) -> String {
    let (unwrapped, valid) = v.unwrap_nullable();
    if !valid {
        return String::new();
    }
    unwrapped.map(|v| v.display_string()).unwrap_or_default()
}

#[cfg(test)]
mod predicate_tests {
    use super::*;

    #[test]
    fn truthy_is_false_and_does_not_record_missing_when_absent() {
        let state = Value::object([]);
        let mut missing = MissingKeys::new();
        let result = truthy(&[Value::string("flag?")], &state, &mut missing).unwrap();
        assert_eq!(result, Value::Bool(false));
        assert!(missing.is_empty());
    }

    #[test]
    fn len_of_empty_collections_is_zero() {
        assert_eq!(len(&[Value::array([])]).unwrap(), Value::Int(0));
        assert_eq!(len(&[Value::object([])]).unwrap(), Value::Int(0));
        assert_eq!(len(&[Value::Null]).unwrap(), Value::Int(0));
    }

    #[test]
    fn len_counts_code_points_not_bytes() {
        assert_eq!(len(&[Value::string("héllo")]).unwrap(), Value::Int(5));
    }

    #[test]
    fn starts_and_ends_with() {
        assert_eq!(
            starts_with(&[Value::string("hello"), Value::string("he")]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            ends_with(&[Value::string("hello"), Value::string("lo")]).unwrap(),
            Value::Bool(true)
        );
    }
}

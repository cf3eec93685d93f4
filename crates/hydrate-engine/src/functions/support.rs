//! Shared argument-coercion helpers used across the function groups.

use hydrate_core::{HydrateError, MissingKeys, Value};

pub fn fn_err(name: &str, message: impl Into<String>) -> HydrateError {
    HydrateError::FunctionCall { name: name.to_string(), message: message.into() }
}

pub fn arg<'a>(args: &'a [Value], i: usize, name: &str) -> Result<&'a Value, HydrateError> {
    args.get(i).ok_or_else(|| fn_err(name, format!("missing argument {i}")))
}

pub fn arg_str<'a>(args: &'a [Value], i: usize, name: &str) -> Result<&'a str, HydrateError> {
    arg(args, i, name)?
        .as_str()
        .ok_or_else(|| fn_err(name, format!("argument {i} must be a string")))
}

/// Permissive integer coercion from int/float/string/nil, used by `add`,
/// `sub`, `gt`, `lt`.
pub fn coerce_int(v: &Value) -> i64 {
    match v {
        Value::Int(i) => *i,
        Value::Float(f) => *f as i64,
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    }
}

pub fn arg_i64(args: &[Value], i: usize, name: &str) -> Result<i64, HydrateError> {
    Ok(coerce_int(arg(args, i, name)?))
}

/// Resolve a state path that is expected to hold a sequence. Records a
/// missing-key entry both when the path doesn't resolve and when it
/// resolves to a non-sequence value (the function's "fail-fast" contract).
pub fn resolve_seq(key: &str, state: &Value, missing: &mut MissingKeys) -> Option<Vec<Value>> {
    match hydrate_core::path::get(key, state, missing) {
        Some(v) => match v.as_sequence() {
            Some(seq) => Some(seq.to_vec()),
            None => {
                missing.record_key(key.to_string());
                None
            }
        },
        None => None,
    }
}

/// Like [`resolve_seq`] but never records a missing-key entry — used by
/// functions whose contract is a tolerant fallback to empty rather than a
/// required lookup (`coalescelist`, `mapToDict`).
pub fn resolve_seq_lenient(key: &str, state: &Value) -> Option<Vec<Value>> {
    let mut scratch = MissingKeys::new();
    hydrate_core::path::get(key, state, &mut scratch).and_then(|v| v.as_sequence().map(<[Value]>::to_vec))
}

/// Resolve a state path that is expected to hold a mapping, the `...Key`
/// counterpart of [`resolve_seq`] used by `addkey`/`removekey`/`mapToArray`.
/// Records a missing-key entry both when the path doesn't resolve and when
/// it resolves to a non-mapping value.
pub fn resolve_map(
    key: &str,
    state: &Value,
    missing: &mut MissingKeys,
) -> Option<indexmap::IndexMap<String, Value>> {
    match hydrate_core::path::get(key, state, missing) {
        Some(v) => match v.as_mapping() {
            Some(map) => Some(map.clone()),
            None => {
                missing.record_key(key.to_string());
                None
            }
        },
        None => None,
    }
}

/// Look up a sub-path inside a single element without contributing to the
/// caller's missing-key report — used by per-element projections
/// (`extractSlice`, `dedupeBy`, `find`, `concat`) where an absent field on
/// one element just means "skip it".
pub fn get_scoped(path: &str, root: &Value) -> Option<Value> {
    let mut scratch = MissingKeys::new();
    hydrate_core::path::get(path, root, &mut scratch)
}

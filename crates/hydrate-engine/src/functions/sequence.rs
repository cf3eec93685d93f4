//! Stateful `slice`, `sliceEnd`, `sliceEndKeepFirstUserMessage`,
//! `extractSlice`, `dedupeBy`, `find`, `findByValue`, `getAtIndex`,
//! `merge`, `coalescelist`, `filter`, `concat`.

use std::collections::HashSet;

use hydrate_core::{HydrateError, MissingKeys, Value};

use super::support::{arg_i64, arg_str, get_scoped, resolve_seq, resolve_seq_lenient};

/// `slice(arrKey, start, end)`.
pub fn slice(args: &[Value], state: &Value, missing: &mut MissingKeys) -> Result<Value, HydrateError> {
    let key = arg_str(args, 0, "slice")?;
    let start = arg_i64(args, 1, "slice")?;
    let end = arg_i64(args, 2, "slice")?;
    let Some(items) = resolve_seq(key, state, missing) else {
        return Ok(Value::Array(Vec::new()));
    };
    let len = items.len() as i64;
    let s = start.max(0).min(len);
    let e = end.min(len).max(s);
    Ok(Value::Array(items[s as usize..e as usize].to_vec()))
}

/// `sliceEnd(arrKey, n)`.
pub fn slice_end(args: &[Value], state: &Value, missing: &mut MissingKeys) -> Result<Value, HydrateError> {
    let key = arg_str(args, 0, "sliceEnd")?;
    let n = arg_i64(args, 1, "sliceEnd")?.max(0) as usize;
    let Some(items) = resolve_seq(key, state, missing) else {
        return Ok(Value::Array(Vec::new()));
    };
    let start = items.len().saturating_sub(n);
    Ok(Value::Array(items[start..].to_vec()))
}

fn is_user_message(v: &Value) -> bool {
    get_scoped("role", v)
        .and_then(|r| r.as_str().map(str::to_string))
        .is_some_and(|role| role == "user")
}

/// `sliceEndKeepFirstUserMessage(arrKey, n)`.
pub fn slice_end_keep_first_user_message(
    args: &[Value],
    state: &Value,
    missing: &mut MissingKeys,
) -> Result<Value, HydrateError> {
    let key = arg_str(args, 0, "sliceEndKeepFirstUserMessage")?;
    let n = arg_i64(args, 1, "sliceEndKeepFirstUserMessage")?.max(0) as usize;
    let Some(items) = resolve_seq(key, state, missing) else {
        return Ok(Value::Array(Vec::new()));
    };
    let start = items.len().saturating_sub(n);
    let tail = &items[start..];
    if tail.first().is_none_or(is_user_message) {
        return Ok(Value::Array(tail.to_vec()));
    }
    match items[..start].iter().rposition(is_user_message) {
        Some(idx) => {
            let mut out = Vec::with_capacity(tail.len() + 1);
            out.push(items[idx].clone());
            out.extend_from_slice(tail);
            Ok(Value::Array(out))
        }
        None => Ok(Value::Array(tail.to_vec())),
    }
}

/// `extractSlice(arrKey, subPath)`.
pub fn extract_slice(
    args: &[Value],
    state: &Value,
    missing: &mut MissingKeys,
) -> Result<Value, HydrateError> {
    let key = arg_str(args, 0, "extractSlice")?;
    let sub_path = arg_str(args, 1, "extractSlice")?.to_string();
    let Some(items) = resolve_seq(key, state, missing) else {
        return Ok(Value::Array(Vec::new()));
    };
    let out = items
        .iter()
        .filter_map(|item| get_scoped(&sub_path, item))
        .collect();
    Ok(Value::Array(out))
}

/// `dedupeBy(arrKey, field)`.
pub fn dedupe_by(args: &[Value], state: &Value, missing: &mut MissingKeys) -> Result<Value, HydrateError> {
    let key = arg_str(args, 0, "dedupeBy")?;
    let field = arg_str(args, 1, "dedupeBy")?.to_string();
    let Some(items) = resolve_seq(key, state, missing) else {
        return Ok(Value::Array(Vec::new()));
    };
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        match get_scoped(&field, &item) {
            Some(v) => {
                if seen.insert(v.display_string()) {
                    out.push(item);
                }
            }
            None => out.push(item),
        }
    }
    Ok(Value::Array(out))
}

/// `find(arrKey, field, targetKey)`.
pub fn find(args: &[Value], state: &Value, missing: &mut MissingKeys) -> Result<Value, HydrateError> {
    let key = arg_str(args, 0, "find")?;
    let field = arg_str(args, 1, "find")?.to_string();
    let target_key = arg_str(args, 2, "find")?.to_string();
    let Some(items) = resolve_seq(key, state, missing) else {
        return Ok(Value::Null);
    };
    let target = get_scoped(&target_key, state)
        .map(|v| v.display_string())
        .unwrap_or(target_key);
    Ok(items
        .into_iter()
        .find(|item| get_scoped(&field, item).is_some_and(|v| v.display_string() == target))
        .unwrap_or(Value::Null))
}

/// `findByValue(arrKey, field, value)`.
pub fn find_by_value(
    args: &[Value],
    state: &Value,
    missing: &mut MissingKeys,
) -> Result<Value, HydrateError> {
    let key = arg_str(args, 0, "findByValue")?;
    let field = arg_str(args, 1, "findByValue")?.to_string();
    let target = args.get(2).cloned().unwrap_or(Value::Null).display_string();
    let Some(items) = resolve_seq(key, state, missing) else {
        return Ok(Value::Null);
    };
    Ok(items
        .into_iter()
        .find(|item| get_scoped(&field, item).is_some_and(|v| v.display_string() == target))
        .unwrap_or(Value::Null))
}

/// `getAtIndex(arrKey, index)` — index may be a literal or a state path.
pub fn get_at_index(
    args: &[Value],
    state: &Value,
    missing: &mut MissingKeys,
) -> Result<Value, HydrateError> {
    let key = arg_str(args, 0, "getAtIndex")?;
    let index = resolve_index(args.get(1), state);
    let Some(items) = resolve_seq(key, state, missing) else {
        return Ok(Value::Null);
    };
    Ok(items.get(index).cloned().unwrap_or(Value::Null))
}

fn resolve_index(v: Option<&Value>, state: &Value) -> usize {
    let Some(v) = v else { return 0 };
    if let Some(i) = v.as_i64() {
        return i.max(0) as usize;
    }
    if let Some(path) = v.as_str() {
        if let Some(resolved) = get_scoped(path, state).and_then(|v| v.as_i64()) {
            return resolved.max(0) as usize;
        }
    }
    0
}

/// `merge(arrKey1, arrKey2)` — fail-fast; empty sequences are not
/// failures.
pub fn merge(args: &[Value], state: &Value, missing: &mut MissingKeys) -> Result<Value, HydrateError> {
    let key1 = arg_str(args, 0, "merge")?;
    let key2 = arg_str(args, 1, "merge")?;
    let a = resolve_seq(key1, state, missing);
    let b = resolve_seq(key2, state, missing);
    match (a, b) {
        (Some(mut a), Some(b)) => {
            a.extend(b);
            Ok(Value::Array(a))
        }
        _ => Ok(Value::Array(Vec::new())),
    }
}

/// `coalescelist(arrKey)`.
pub fn coalescelist(
    args: &[Value],
    state: &Value,
    _missing: &mut MissingKeys,
) -> Result<Value, HydrateError> {
    let key = arg_str(args, 0, "coalescelist")?;
    Ok(Value::Array(resolve_seq_lenient(key, state).unwrap_or_default()))
}

fn numeric_of(v: &Value) -> Option<f64> {
    match v {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}

fn filter_eq(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    if let (Some(x), Some(y)) = (numeric_of(a), numeric_of(b)) {
        return x == y;
    }
    a.display_string() == b.display_string()
}

/// `filter(listKey, field, op, value)` — `op` in `{"eq", "in"}`; any other
/// token falls back to `eq` (spec §9 open question, intentional legacy
/// behavior — documented, not a diagnosable defect).
pub fn filter(args: &[Value], state: &Value, missing: &mut MissingKeys) -> Result<Value, HydrateError> {
    let key = arg_str(args, 0, "filter")?;
    let field = arg_str(args, 1, "filter")?.to_string();
    let op = arg_str(args, 2, "filter")?;
    let value = args.get(3).cloned().unwrap_or(Value::Null);
    let Some(items) = resolve_seq(key, state, missing) else {
        return Ok(Value::Array(Vec::new()));
    };
    let op = if op == "eq" || op == "in" {
        op
    } else {
        tracing::debug!(requested = %op, "filter: unknown op, defaulting to eq");
        "eq"
    };
    let out = items
        .into_iter()
        .filter(|item| {
            let field_value = get_scoped(&field, item);
            match (op, &field_value) {
                ("eq", Some(fv)) => filter_eq(fv, &value),
                ("in", Some(fv)) => {
                    value.as_sequence().is_some_and(|seq| seq.iter().any(|v| filter_eq(fv, v)))
                }
                _ => false,
            }
        })
        .collect();
    Ok(Value::Array(out))
}

/// `concat(sep, listKey, subField)`.
pub fn concat(args: &[Value], state: &Value, missing: &mut MissingKeys) -> Result<Value, HydrateError> {
    let sep = arg_str(args, 0, "concat")?.to_string();
    let key = arg_str(args, 1, "concat")?;
    let sub_field = arg_str(args, 2, "concat")?.to_string();
    let items = resolve_seq(key, state, missing).unwrap_or_default();
    let parts: Vec<String> = items
        .iter()
        .filter_map(|item| get_scoped(&sub_field, item))
        .map(|v| v.display_string())
        .collect();
    if parts.is_empty() {
        Ok(Value::String(format!("{{{{concat {sep} {key} {sub_field}}}}}")))
    } else {
        Ok(Value::String(parts.join(&sep)))
    }
}

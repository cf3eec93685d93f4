//! `eq`, `ne` — n-ary equality after null-unwrap and deref.

use std::rc::Rc;

use hydrate_core::{HydrateError, Record, Value};

use super::support::fn_err;

fn unwrap_deref(v: &Value) -> Option<Value> {
    let (inner, valid) = v.unwrap_nullable();
    if !valid {
        return None;
    }
    inner.and_then(|v| v.deref())
}

fn is_string_kind(v: &Value) -> bool {
    matches!(v, Value::String(_) | Value::Int(_) | Value::Float(_) | Value::Bool(_))
}

fn pair_eq(a: &Value, b: &Value) -> bool {
    let ua = unwrap_deref(a);
    let ub = unwrap_deref(b);
    match (&ua, &ub) {
        (None, None) => return true,
        (None, Some(Value::String(s))) | (Some(Value::String(s)), None) if s.is_empty() => {
            return true;
        }
        _ => {}
    }
    match (ua, ub) {
        (Some(x), Some(y)) => {
            if x == y {
                true
            } else if is_string_kind(&x) && is_string_kind(&y) {
                x.display_string() == y.display_string()
            } else {
                false
            }
        }
        _ => false,
    }
}

pub fn eq(args: &[Value]) -> Result<Value, HydrateError> {
    if args.len() < 2 {
        return Err(fn_err("eq", "expected at least 2 arguments"));
    }
    Ok(Value::Bool(args.windows(2).all(|pair| pair_eq(&pair[0], &pair[1]))))
}

pub fn ne(args: &[Value]) -> Result<Value, HydrateError> {
    match eq(args)? {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        _ => unreachable!("eq always returns a bool"),
    }
}

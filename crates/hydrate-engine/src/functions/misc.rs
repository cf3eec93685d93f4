//! `genUUID`, `now`, `list`, `noop`, `mergeRaw`.

use hydrate_core::{HydrateError, Value};

use super::support::{arg, fn_err};

pub fn gen_uuid(_args: &[Value]) -> Result<Value, HydrateError> {
    Ok(Value::String(uuid::Uuid::new_v4().to_string()))
}

pub fn now(_args: &[Value]) -> Result<Value, HydrateError> {
    Ok(Value::String(chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()))
}

pub fn list(args: &[Value]) -> Result<Value, HydrateError> {
    Ok(Value::Array(args.to_vec()))
}

pub fn noop(_args: &[Value]) -> Result<Value, HydrateError> {
    Ok(Value::String(String::new()))
}

/// Binary concatenation; the registry's arity entry reserves the name for
/// a future n-ary extension, per spec §9's open-question resolution.
pub fn merge_raw(args: &[Value]) -> Result<Value, HydrateError> {
    let a = arg(args, 0, "mergeRaw")?
        .as_sequence()
        .ok_or_else(|| fn_err("mergeRaw", "argument 0 must be a sequence"))?;
    let b = arg(args, 1, "mergeRaw")?
        .as_sequence()
        .ok_or_else(|| fn_err("mergeRaw", "argument 1 must be a sequence"))?;
    let mut out = a.to_vec();
    out.extend_from_slice(b);
    Ok(Value::Array(out))
}

#[cfg(test)]
mod misc_tests {
    use super::*;

    #[test]
    fn gen_uuid_produces_distinct_v4_strings() {
        let a = gen_uuid(&[]).unwrap();
        let b = gen_uuid(&[]).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.as_str().unwrap().len(), 36);
    }

    #[test]
    fn now_matches_expected_format() {
        let now = now(&[]).unwrap();
        let s = now.as_str().unwrap();
        assert_eq!(s.len(), 20);
        assert!(s.ends_with('Z'));
    }

    #[test]
    fn noop_is_empty_string() {
        assert_eq!(noop(&[]).unwrap(), Value::string(""));
    }

    #[test]
    fn merge_raw_preserves_order_and_length() {
        let a = Value::array([Value::Int(1), Value::Int(2)]);
        let b = Value::array([Value::Int(3)]);
        let merged = merge_raw(&[a, b]).unwrap();
        assert_eq!(
            merged,
            Value::array([Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }
}

//! Structural Walker (C7, spec §4.7): recurses through a template value
//! (string / mapping / sequence / scalar), applying the policy and
//! aggregating path-tagged missing-key reports from every leaf.
//!
//! Missing-key paths accumulate rather than short-circuit: one string
//! leaf's missing variable doesn't stop its siblings from being hydrated.
//! A genuine parse or function-call error does short-circuit — it
//! propagates out of the mapping/sequence currently being walked, per
//! spec §6 ("non-missing-key errors short-circuit the current
//! mapping/sequence").

use indexmap::IndexMap;

use hydrate_core::{HydrateError, MissingKeys, Policy, Value};

use crate::eval;

/// Hydrate `value` against `state` under `policy`, returning the
/// best-effort output together with every missing key encountered,
/// structural-path tagged. Only fatal (non-missing-key) errors return
/// `Err`.
pub fn hydrate(value: &Value, state: &mut Value, policy: &Policy) -> Result<(Value, MissingKeys), HydrateError> {
    if policy.is_raw() {
        return Ok((value.clone(), MissingKeys::new()));
    }

    match value {
        Value::String(s) => {
            let mut missing = MissingKeys::new();
            let out = eval::hydrate_str(s, state, &mut missing)?;
            Ok((out, missing))
        }
        Value::Object(map) => {
            let mut missing = MissingKeys::new();
            let mut out = IndexMap::with_capacity(map.len());
            for (key, v) in map {
                let child_policy = policy.child(key);
                let (child_value, mut child_missing) = hydrate(v, state, &child_policy)?;
                child_missing.prepend_path(&format!("{key}."));
                missing.merge(child_missing);
                out.insert(key.clone(), child_value);
            }
            Ok((Value::Object(out), missing))
        }
        Value::Array(items) => {
            let mut missing = MissingKeys::new();
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let (child_value, mut child_missing) = hydrate(item, state, policy)?;
                child_missing.prepend_path(&format!("[{i}]"));
                missing.merge(child_missing);
                out.push(child_value);
            }
            Ok((Value::Array(out), missing))
        }
        other => Ok((other.clone(), MissingKeys::new())),
    }
}

//! Hydration-behavior policy: a mapping mirroring the template that marks
//! sub-trees as `raw` to skip substitution.

use indexmap::IndexMap;

/// A policy is consulted *at the current mapping*; descending into a
/// sequence forwards the same policy level to every element, and descending
/// into a sub-mapping at key `k` uses `policy[k]` if it is itself a
/// `Nested` policy, else the absent policy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Policy {
    /// Unspecified key: hydrate normally. The default/absent policy.
    #[default]
    Hydrate,
    /// `"raw"` leaf: stop recursion immediately, copy verbatim.
    Raw,
    /// A sub-policy to forward when descending into this key's mapping
    /// value.
    Nested(IndexMap<String, Policy>),
}

impl Policy {
    /// Look up the policy to apply when descending into `key`, per
    /// §4.7: "a scalar `raw` at `policy[k]` stops recursion immediately";
    /// a nested mapping is forwarded; anything else is the absent policy.
    pub fn child(&self, key: &str) -> Policy {
        match self {
            Policy::Nested(map) => map.get(key).cloned().unwrap_or_default(),
            _ => Policy::Hydrate,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Policy::Raw)
    }

    /// Parse a policy from its JSON-like wire encoding: a mapping whose
    /// leaves are exactly the string `"raw"`, recursively.
    pub fn from_value(value: &crate::Value) -> Policy {
        match value {
            crate::Value::String(s) if s == "raw" => Policy::Raw,
            crate::Value::Object(map) => {
                let nested = map
                    .iter()
                    .map(|(k, v)| (k.clone(), Policy::from_value(v)))
                    .collect();
                Policy::Nested(nested)
            }
            _ => Policy::Hydrate,
        }
    }
}

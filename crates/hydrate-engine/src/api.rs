//! Public API (C8, spec §7): the small set of entry points callers use to
//! hydrate a template value, string, mapping, or sequence, plus the
//! diagnostic helpers that don't hydrate anything (`find_template_keys`,
//! `merge_sources`).

use indexmap::IndexMap;

use hydrate_compiler::{lex, Expr};
use hydrate_core::{HydrateError, MissingKeysError, Policy, Value};

use crate::walk;

/// Wraps a hydration result with the compound error it may have produced,
/// while still carrying the best-effort output produced up to that point
/// (spec §6-§7: "hydration still produces a best-effort partial output,
/// returned alongside the error").
#[derive(Debug)]
pub struct Hydrated<T> {
    pub value: T,
    pub error: Option<HydrateError>,
}

impl<T> Hydrated<T> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Hydrate an arbitrary template value (string, mapping, sequence, or
/// scalar) against `state` under `policy`.
pub fn hydrate(value: &Value, state: &mut Value, policy: &Policy) -> Hydrated<Value> {
    match walk::hydrate(value, state, policy) {
        Ok((out, missing)) if missing.is_empty() => Hydrated { value: out, error: None },
        Ok((out, missing)) => {
            let available_keys = top_level_keys(state);
            Hydrated {
                value: out,
                error: Some(HydrateError::MissingKeys(MissingKeysError { missing, available_keys })),
            }
        }
        Err(e) => Hydrated { value: value.clone(), error: Some(e) },
    }
}

/// Hydrate a single template string, returning its rendered text (fast-path
/// native values are coerced to their display string).
pub fn hydrate_string(template: &str, state: &mut Value, policy: &Policy) -> Hydrated<String> {
    let Hydrated { value, error } = hydrate(&Value::string(template), state, policy);
    Hydrated { value: value.display_string(), error }
}

/// Hydrate every value in a mapping, preserving key order.
pub fn hydrate_dict(
    map: &IndexMap<String, Value>,
    state: &mut Value,
    policy: &Policy,
) -> Hydrated<IndexMap<String, Value>> {
    let Hydrated { value, error } = hydrate(&Value::Object(map.clone()), state, policy);
    let out = value.as_mapping().cloned().unwrap_or_default();
    Hydrated { value: out, error }
}

/// Hydrate every value in a sequence, preserving order.
pub fn hydrate_slice(seq: &[Value], state: &mut Value, policy: &Policy) -> Hydrated<Vec<Value>> {
    let Hydrated { value, error } = hydrate(&Value::array(seq.to_vec()), state, policy);
    let out = value.as_sequence().map(<[Value]>::to_vec).unwrap_or_default();
    Hydrated { value: out, error }
}

fn top_level_keys(state: &Value) -> Vec<String> {
    state.as_mapping().map(|m| m.keys().cloned().collect()).unwrap_or_default()
}

/// Walk `value` and collect every root identifier referenced by a
/// placeholder, in first-encounter order, honoring `policy` the same way
/// hydration does (a `raw` subtree's placeholders are never live
/// references). `include_optional` controls whether `{{name?}}` references
/// count.
pub fn find_template_keys(value: &Value, include_optional: bool, policy: &Policy) -> Vec<String> {
    let mut out = Vec::new();
    collect_keys(value, include_optional, policy, &mut out);
    out
}

fn collect_keys(value: &Value, include_optional: bool, policy: &Policy, out: &mut Vec<String>) {
    if policy.is_raw() {
        return;
    }
    match value {
        Value::String(s) => {
            for seg in lex::scan(s) {
                if let lex::Segment::Placeholder(p) = seg {
                    if let Ok(expr) = hydrate_compiler::parse(&p.expr_src) {
                        collect_root_identifiers(&expr, include_optional, out);
                    }
                }
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                collect_keys(v, include_optional, &policy.child(k), out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_keys(item, include_optional, policy, out);
            }
        }
        _ => {}
    }
}

fn collect_root_identifiers(expr: &Expr, include_optional: bool, out: &mut Vec<String>) {
    match expr {
        Expr::Var { path, optional } => {
            if *optional && !include_optional {
                return;
            }
            if let Some(root) = root_identifier(path) {
                if !out.iter().any(|k| k == root) {
                    out.push(root.to_string());
                }
            }
        }
        Expr::Call { args, .. } => {
            for a in args {
                collect_root_identifiers(a, include_optional, out);
            }
        }
        _ => {}
    }
}

fn root_identifier(path: &str) -> Option<&str> {
    let stripped = path.strip_prefix(".Data.").or_else(|| path.strip_prefix("$.Data.")).unwrap_or(path);
    let stripped = stripped.trim_start_matches('.').trim_start_matches('$');
    let root = stripped.split(['.', '[']).next().unwrap_or("");
    if root.is_empty() {
        None
    } else {
        Some(root)
    }
}

/// Right-biased shallow merge of state sources, in priority order (later
/// sources win on key collision) — the "single merged state mapping" input
/// every hydration call expects, assembled from whatever sources the
/// caller's host application keeps separate (spec §2).
pub fn merge_sources(sources: impl IntoIterator<Item = IndexMap<String, Value>>) -> IndexMap<String, Value> {
    let mut out = IndexMap::new();
    for src in sources {
        for (k, v) in src {
            out.insert(k, v);
        }
    }
    out
}

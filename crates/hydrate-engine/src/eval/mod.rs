//! Expression Evaluator (C6, spec §4.6): turns one template string into a
//! hydrated [`Value`], choosing between the fast path (the whole string is
//! a single placeholder — the result keeps its native type) and the full
//! template path (literal text and/or more than one placeholder, embedded
//! flow control — the result is always text, save for the numeric-string
//! coercion below).

mod dispatch;
pub mod flow;

use std::collections::HashMap;

use hydrate_compiler::lex;
use hydrate_core::{HydrateError, MissingKeys, Value};

pub use dispatch::eval_expr;

/// Hydrate one template string against `state`, recording any missing keys
/// into `missing` rather than failing outright (spec §6 — only parse and
/// function-call errors are fatal here).
pub fn hydrate_str(template: &str, state: &mut Value, missing: &mut MissingKeys) -> Result<Value, HydrateError> {
    if let Some(raw) = lex::whole_string_placeholder(template) {
        let expr = hydrate_compiler::compile(&raw.expr_src)
            .map_err(|e| HydrateError::Parse { expr: raw.expr_src.clone(), message: e.message })?;
        let dot = state.clone();
        let mut vars = HashMap::new();
        return eval_expr(&expr, &dot, state, missing, &mut vars);
    }

    let rendered = flow::render(template, state, missing)?;
    Ok(coerce_numeric_string(rendered))
}

/// "Numeric output strings that parse as integers are returned as integers
/// rather than strings" (spec §4.6) — applies to the full template path's
/// rendered output, not just the fast path.
fn coerce_numeric_string(s: String) -> Value {
    match s.parse::<i64>() {
        Ok(i) => Value::Int(i),
        Err(_) => Value::String(s),
    }
}

//! Evaluates a single (already parsed and rewritten) [`Expr`] tree against
//! ambient state, producing a native [`Value`] (spec §4.6).
//!
//! `$v` paths resolve against the local variable scope introduced by
//! `{{$v := expr}}` assignments inside [`super::flow`]; a bare `.` or a
//! `.field` path resolves against the flow evaluator's current dot context
//! instead of global state (`range`/`with` rebind it). Every other bare
//! path resolves against global state, matching the non-scoped design of
//! the rest of the call surface.

use std::collections::HashMap;

use hydrate_compiler::{Expr, StateRef};
use hydrate_core::{path, HydrateError, MissingKeys, Value};

use crate::functions::{self, Callable};

/// Evaluate `expr`. `dot` is the flow evaluator's current context (equal to
/// `state` outside any `range`/`with` body); `state` is the live, mutable
/// state mapping threaded through for stateful/mutating calls; `vars` holds
/// `$name` bindings introduced by `:=`/`=` assignment tags.
pub fn eval_expr(
    expr: &Expr,
    dot: &Value,
    state: &mut Value,
    missing: &mut MissingKeys,
    vars: &mut HashMap<String, Value>,
) -> Result<Value, HydrateError> {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),
        Expr::StateRef(StateRef::Data) => Ok(state.clone()),
        Expr::StateRef(StateRef::MissingKeys) => Ok(Value::Null),
        Expr::Flow(_) => Ok(Value::Null),
        Expr::Var { path: p, optional } => {
            if let Some(name) = p.strip_prefix('$') {
                return Ok(vars.get(name).cloned().unwrap_or(Value::Null));
            }
            if p == "." {
                return Ok(dot.clone());
            }
            if let Some(rest) = p.strip_prefix('.') {
                return Ok(resolve_var(rest, dot, missing, *optional));
            }
            if is_bare_identifier(p) && !state_has_key(state, p) && functions::lookup(p).is_some() {
                return eval_call(p, &[], dot, state, missing, vars);
            }
            Ok(resolve_var(p, state, missing, *optional))
        }
        Expr::Call { head, args } => eval_call(head, args, dot, state, missing, vars),
    }
}

/// Resolve a dotted/bracketed path, honoring the required/optional-missing
/// fallback values of spec §4.5-§4.6: required-but-missing renders as the
/// empty string (not an error — the compound error surfaces separately from
/// the missing-key accumulator), optional-but-missing renders as absence.
fn resolve_var(p: &str, root: &Value, missing: &mut MissingKeys, optional: bool) -> Value {
    if optional {
        let mut scratch = MissingKeys::new();
        return path::get(p, root, &mut scratch).unwrap_or(Value::Null);
    }
    path::get(p, root, missing).unwrap_or_else(|| Value::String(String::new()))
}

fn is_bare_identifier(p: &str) -> bool {
    !p.is_empty() && !p.contains(['.', '[', ']'])
}

fn state_has_key(state: &Value, name: &str) -> bool {
    state.deref().and_then(|v| v.field_of(name)).is_some()
}

/// Dispatch a call against the function registry, stripping the implicit
/// `$.Data`/`$.MissingKeys` tail the rewriter attached (spec §4.5, §9 Open
/// Question #2) before evaluating the remaining argument expressions.
fn eval_call(
    head: &str,
    args: &[Expr],
    dot: &Value,
    state: &mut Value,
    missing: &mut MissingKeys,
    vars: &mut HashMap<String, Value>,
) -> Result<Value, HydrateError> {
    let real_args: &[Expr] = if args.len() >= 2
        && matches!(args[args.len() - 2], Expr::StateRef(StateRef::Data))
        && matches!(args[args.len() - 1], Expr::StateRef(StateRef::MissingKeys))
    {
        &args[..args.len() - 2]
    } else if matches!(args.last(), Some(Expr::StateRef(StateRef::MissingKeys))) {
        &args[..args.len() - 1]
    } else {
        args
    };

    let mut values = Vec::with_capacity(real_args.len());
    for a in real_args {
        values.push(eval_expr(a, dot, state, missing, vars)?);
    }

    match functions::lookup(head) {
        Some(Callable::Basic(f)) => f(&values),
        Some(Callable::Stateful(f)) => f(&values, &*state, missing),
        Some(Callable::Mutating(f)) => f(&values, state, missing),
        None => Err(HydrateError::FunctionCall {
            name: head.to_string(),
            message: "unknown function".to_string(),
        }),
    }
}

#[cfg(test)]
mod dispatch_tests {
    use super::*;

    fn no_vars() -> HashMap<String, Value> {
        HashMap::new()
    }

    #[test]
    fn required_missing_resolves_to_empty_string() {
        let mut state = Value::object([]);
        let mut missing = MissingKeys::new();
        let mut vars = no_vars();
        let dot = state.clone();
        let expr = Expr::var("x", false);
        let v = eval_expr(&expr, &dot, &mut state, &mut missing, &mut vars).unwrap();
        assert_eq!(v, Value::string(""));
        assert_eq!(missing.keys().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn optional_missing_resolves_to_null_without_recording() {
        let mut state = Value::object([]);
        let mut missing = MissingKeys::new();
        let mut vars = no_vars();
        let dot = state.clone();
        let expr = Expr::var("x", true);
        let v = eval_expr(&expr, &dot, &mut state, &mut missing, &mut vars).unwrap();
        assert_eq!(v, Value::Null);
        assert!(missing.is_empty());
    }

    #[test]
    fn dollar_var_reads_local_scope() {
        let mut state = Value::object([]);
        let mut missing = MissingKeys::new();
        let mut vars = no_vars();
        vars.insert("total".to_string(), Value::Int(7));
        let dot = state.clone();
        let expr = Expr::var("$total", false);
        let v = eval_expr(&expr, &dot, &mut state, &mut missing, &mut vars).unwrap();
        assert_eq!(v, Value::Int(7));
    }

    #[test]
    fn dot_path_resolves_against_dot_not_state() {
        let mut state = Value::object([("name".to_string(), Value::string("global"))]);
        let mut missing = MissingKeys::new();
        let mut vars = no_vars();
        let dot = Value::object([("name".to_string(), Value::string("item"))]);
        let expr = Expr::var(".name", false);
        let v = eval_expr(&expr, &dot, &mut state, &mut missing, &mut vars).unwrap();
        assert_eq!(v, Value::string("item"));
    }

    #[test]
    fn bare_identifier_falls_back_to_zero_arg_function() {
        let mut state = Value::object([]);
        let mut missing = MissingKeys::new();
        let mut vars = no_vars();
        let dot = state.clone();
        let expr = Expr::var("noop", false);
        let v = eval_expr(&expr, &dot, &mut state, &mut missing, &mut vars).unwrap();
        assert_eq!(v, Value::string(""));
        assert!(missing.is_empty());
    }

    #[test]
    fn nested_get_root_form_evaluates_with_custom_root() {
        let mut state = Value::object([(
            "resources".to_string(),
            Value::array([Value::object([
                ("id".to_string(), Value::string("memory.resource_id")),
                (
                    "dataset".to_string(),
                    Value::object([("id".to_string(), Value::string("dataset-456"))]),
                ),
            ])]),
        )]);
        let mut missing = MissingKeys::new();
        let mut vars = no_vars();
        let dot = state.clone();
        let expr = hydrate_compiler::compile(
            r#"get "dataset.id" (find "resources" "id" "memory.resource_id")"#,
        )
        .unwrap();
        let v = eval_expr(&expr, &dot, &mut state, &mut missing, &mut vars).unwrap();
        assert_eq!(v, Value::string("dataset-456"));
    }

    #[test]
    fn unknown_function_is_a_fatal_error() {
        let mut state = Value::object([]);
        let mut missing = MissingKeys::new();
        let mut vars = no_vars();
        let dot = state.clone();
        let expr = Expr::call("definitelyNotAFunction", vec![]);
        let err = eval_expr(&expr, &dot, &mut state, &mut missing, &mut vars).unwrap_err();
        assert!(matches!(err, HydrateError::FunctionCall { .. }));
    }
}

//! Expression Rewriter (C5): injects the implicit `(state, missing)` tail
//! arguments that stateful functions need, so templates never spell them
//! out (spec §4.5).
//!
//! This module only rewrites already-parsed call nodes bottom-up; the
//! whole-string preprocess pass (unqualified-variable substitution,
//! optional-absent-to-empty-string) described in spec §4.5 needs the
//! actual state value to resolve names against, so it lives in
//! `hydrate-engine::eval` alongside the rest of the full template path.

use hydrate_core::func_meta;

use crate::ast::{is_flow_keyword, Expr, StateRef};

/// Rewrite `expr` bottom-up, appending implicit tail arguments to every
/// stateful call that doesn't already carry them.
pub fn rewrite(expr: Expr) -> Expr {
    match expr {
        Expr::Call { head, args } => {
            let mut args: Vec<Expr> = args.into_iter().map(rewrite).collect();

            if is_flow_keyword(&head) {
                // "If the head is a keyword, descend into parenthesized
                // children only" — the children are already rewritten
                // above; flow keywords never take an implicit tail.
                return Expr::Call { head, args };
            }

            if func_meta::is_stateful(&head) {
                if head == "get" && is_nested_call_root_form(&args) {
                    if !ends_with_missing_keys(&args) {
                        args.push(Expr::StateRef(StateRef::MissingKeys));
                    }
                } else if !ends_with_data_and_missing_keys(&args) {
                    args.push(Expr::StateRef(StateRef::Data));
                    args.push(Expr::StateRef(StateRef::MissingKeys));
                }
            }

            Expr::Call { head, args }
        }
        // Variables, literals, state refs, and bare flow markers have no
        // children to recurse into.
        other => other,
    }
}

/// Resolved by function *signature*, not textual shape (spec §9 Open
/// Questions): `get`'s one-argument form is what's being invoked when the
/// call carries exactly its declared arity's worth of explicit positional
/// args plus one more that is itself a call — that extra call supplies the
/// traversal root instead of the ambient state.
fn is_nested_call_root_form(args: &[Expr]) -> bool {
    let Some(base_arity) = func_meta::declared_arity("get") else {
        return false;
    };
    args.len() == base_arity + 1 && matches!(args.last(), Some(Expr::Call { .. }))
}

fn ends_with_missing_keys(args: &[Expr]) -> bool {
    matches!(args.last(), Some(Expr::StateRef(StateRef::MissingKeys)))
}

fn ends_with_data_and_missing_keys(args: &[Expr]) -> bool {
    let len = args.len();
    len >= 2
        && matches!(args[len - 2], Expr::StateRef(StateRef::Data))
        && matches!(args[len - 1], Expr::StateRef(StateRef::MissingKeys))
}

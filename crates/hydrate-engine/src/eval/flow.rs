//! The embedded minimal template evaluator (the "full template path"):
//! renders a template string carrying more than a single bare placeholder,
//! interpreting the `if`/`else`/`end`, `range`/`end`, and `with`/`end`
//! block tags plus `$v := expr` / `$v = expr` assignment.
//!
//! Not an embedded `text/template`: Go's template engine reports missing
//! map keys as execution errors whose text has to be pattern-matched back
//! into key names — fragile. Resolving `Expr::Var` directly against the
//! Value Adapter sidesteps that entirely: a missing key is just recorded,
//! never an execution error.
//!
//! Pipelines (`{{a | b}}`) are not supported as a distinct operator: every
//! function call already nests via parenthesized sub-calls (`{{b (a)}}`),
//! which covers what the corpus of templates this engine hydrates needs.
//! `{{else if cond}}` sugar is likewise not supported — nest an explicit
//! `{{if cond}}` inside the `{{else}}` branch instead.

use std::collections::HashMap;

use hydrate_compiler::{lex, Expr};
use hydrate_core::{HydrateError, MissingKeys, Value};

use super::dispatch::eval_expr;

enum Node {
    Text(String),
    Output(Expr),
    Assign(String, Expr),
    If { cond: Expr, then_body: Vec<Node>, else_body: Option<Vec<Node>> },
    Range { list: Expr, body: Vec<Node>, else_body: Option<Vec<Node>> },
    With { cond: Expr, body: Vec<Node>, else_body: Option<Vec<Node>> },
}

enum Terminator {
    Eof,
    Else,
    End,
}

/// Render `template` to a string, threading `state`/`missing` through every
/// placeholder and block it contains.
pub fn render(template: &str, state: &mut Value, missing: &mut MissingKeys) -> Result<String, HydrateError> {
    let segments = apply_whitespace_trim(lex::scan(template));
    let mut pos = 0;
    let (nodes, term) = parse_nodes(&segments, &mut pos, template)?;
    if !matches!(term, Terminator::Eof) {
        return Err(parse_err(template, "unmatched `{{else}}`/`{{end}}`"));
    }

    let mut vars = HashMap::new();
    let dot = state.clone();
    let mut out = String::new();
    exec_nodes(&nodes, &dot, state, missing, &mut vars, &mut out)?;
    Ok(out)
}

fn parse_err(template: &str, message: &str) -> HydrateError {
    HydrateError::Parse { expr: template.to_string(), message: message.to_string() }
}

fn apply_whitespace_trim(segments: Vec<lex::Segment>) -> Vec<lex::Segment> {
    let mut out = segments;
    let trims: Vec<(usize, bool, bool)> = out
        .iter()
        .enumerate()
        .filter_map(|(i, seg)| match seg {
            lex::Segment::Placeholder(p) if p.trim_left || p.trim_right => {
                Some((i, p.trim_left, p.trim_right))
            }
            _ => None,
        })
        .collect();
    for (i, trim_left, trim_right) in trims {
        if trim_left && i > 0 {
            if let lex::Segment::Literal(prev) = &mut out[i - 1] {
                *prev = prev.trim_end().to_string();
            }
        }
        if trim_right && i + 1 < out.len() {
            if let lex::Segment::Literal(next) = &mut out[i + 1] {
                *next = next.trim_start().to_string();
            }
        }
    }
    out
}

enum Tag {
    Output(Expr),
    Assign(String, Expr),
    If(Expr),
    Range(Expr),
    With(Expr),
    Else,
    End,
}

fn classify(expr_src: &str) -> Result<Tag, HydrateError> {
    let trimmed = expr_src.trim();
    if trimmed == "else" {
        return Ok(Tag::Else);
    }
    if trimmed == "end" {
        return Ok(Tag::End);
    }
    if let Some(rest) = trimmed.strip_prefix("if ") {
        return Ok(Tag::If(compile(rest.trim())?));
    }
    if let Some(rest) = trimmed.strip_prefix("range ") {
        return Ok(Tag::Range(compile(rest.trim())?));
    }
    if let Some(rest) = trimmed.strip_prefix("with ") {
        return Ok(Tag::With(compile(rest.trim())?));
    }
    if let Some((name, rhs)) = split_assignment(trimmed) {
        return Ok(Tag::Assign(name.to_string(), compile(rhs)?));
    }
    Ok(Tag::Output(compile(trimmed)?))
}

fn compile(src: &str) -> Result<Expr, HydrateError> {
    hydrate_compiler::compile(src)
        .map_err(|e| HydrateError::Parse { expr: src.to_string(), message: e.message })
}

/// `$name := expr` declares a new binding; `$name = expr` reassigns one
/// already in scope. Both are treated identically here — the flow
/// evaluator keeps a single flat scope for the whole render, not Go's
/// nested block scoping.
fn split_assignment(s: &str) -> Option<(&str, &str)> {
    let name_end = s.find(char::is_whitespace)?;
    let name = &s[..name_end];
    if !name.starts_with('$') || name.len() < 2 {
        return None;
    }
    let rest = s[name_end..].trim_start();
    if let Some(rhs) = rest.strip_prefix(":=") {
        return Some((name, rhs.trim()));
    }
    if let Some(rhs) = rest.strip_prefix('=') {
        if rhs.starts_with('=') {
            return None;
        }
        return Some((name, rhs.trim()));
    }
    None
}

fn parse_nodes(
    segments: &[lex::Segment],
    pos: &mut usize,
    template: &str,
) -> Result<(Vec<Node>, Terminator), HydrateError> {
    let mut nodes = Vec::new();
    loop {
        if *pos >= segments.len() {
            return Ok((nodes, Terminator::Eof));
        }
        match &segments[*pos] {
            lex::Segment::Literal(s) => {
                nodes.push(Node::Text(s.clone()));
                *pos += 1;
            }
            lex::Segment::Placeholder(raw) => {
                let tag = classify(&raw.expr_src)?;
                match tag {
                    Tag::End => {
                        *pos += 1;
                        return Ok((nodes, Terminator::End));
                    }
                    Tag::Else => {
                        *pos += 1;
                        return Ok((nodes, Terminator::Else));
                    }
                    Tag::Output(e) => {
                        nodes.push(Node::Output(e));
                        *pos += 1;
                    }
                    Tag::Assign(name, e) => {
                        nodes.push(Node::Assign(name, e));
                        *pos += 1;
                    }
                    Tag::If(cond) => {
                        *pos += 1;
                        let (then_body, term) = parse_nodes(segments, pos, template)?;
                        let else_body = parse_else_branch(term, segments, pos, template, "if")?;
                        nodes.push(Node::If { cond, then_body, else_body });
                    }
                    Tag::Range(list) => {
                        *pos += 1;
                        let (body, term) = parse_nodes(segments, pos, template)?;
                        let else_body = parse_else_branch(term, segments, pos, template, "range")?;
                        nodes.push(Node::Range { list, body, else_body });
                    }
                    Tag::With(cond) => {
                        *pos += 1;
                        let (body, term) = parse_nodes(segments, pos, template)?;
                        let else_body = parse_else_branch(term, segments, pos, template, "with")?;
                        nodes.push(Node::With { cond, body, else_body });
                    }
                }
            }
        }
    }
}

fn parse_else_branch(
    term: Terminator,
    segments: &[lex::Segment],
    pos: &mut usize,
    template: &str,
    tag: &str,
) -> Result<Option<Vec<Node>>, HydrateError> {
    match term {
        Terminator::End => Ok(None),
        Terminator::Else => {
            let (body, term2) = parse_nodes(segments, pos, template)?;
            match term2 {
                Terminator::End => Ok(Some(body)),
                _ => Err(parse_err(template, &format!("unterminated `{{{{{tag}}}}}` block"))),
            }
        }
        Terminator::Eof => Err(parse_err(template, &format!("unterminated `{{{{{tag}}}}}` block"))),
    }
}

fn exec_nodes(
    nodes: &[Node],
    dot: &Value,
    state: &mut Value,
    missing: &mut MissingKeys,
    vars: &mut HashMap<String, Value>,
    out: &mut String,
) -> Result<(), HydrateError> {
    for node in nodes {
        match node {
            Node::Text(s) => out.push_str(s),
            Node::Output(e) => {
                let v = eval_expr(e, dot, state, missing, vars)?;
                out.push_str(&v.display_string());
            }
            Node::Assign(name, e) => {
                let v = eval_expr(e, dot, state, missing, vars)?;
                vars.insert(name.trim_start_matches('$').to_string(), v);
            }
            Node::If { cond, then_body, else_body } => {
                let v = eval_expr(cond, dot, state, missing, vars)?;
                if v.truthy_value() {
                    exec_nodes(then_body, dot, state, missing, vars, out)?;
                } else if let Some(else_body) = else_body {
                    exec_nodes(else_body, dot, state, missing, vars, out)?;
                }
            }
            Node::With { cond, body, else_body } => {
                let v = eval_expr(cond, dot, state, missing, vars)?;
                if v.truthy_value() {
                    exec_nodes(body, &v, state, missing, vars, out)?;
                } else if let Some(else_body) = else_body {
                    exec_nodes(else_body, dot, state, missing, vars, out)?;
                }
            }
            Node::Range { list, body, else_body } => {
                let v = eval_expr(list, dot, state, missing, vars)?;
                let items: Vec<Value> = v.as_sequence().map(<[Value]>::to_vec).unwrap_or_default();
                if items.is_empty() {
                    if let Some(else_body) = else_body {
                        exec_nodes(else_body, dot, state, missing, vars, out)?;
                    }
                } else {
                    for item in items {
                        exec_nodes(body, &item, state, missing, vars, out)?;
                    }
                }
            }
        }
    }
    Ok(())
}

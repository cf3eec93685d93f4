//! Parses a single placeholder's expression source into an [`Expr`] tree.
//!
//! Tokenization respects single- and double-quoted strings (with `\n \t \r
//! \" \' \\` escapes) and parenthesized sub-expressions — no token split
//! happens inside either, at any nesting depth.
//!
//! This parser treats every multi-token expression uniformly as `head
//! arg1 arg2 …`. For flow-keyword tags that carry a condition or pipeline
//! (`if ne description ""`, `range items`), the caller (the embedded
//! template evaluator in `hydrate-engine::eval::flow`) strips the leading
//! keyword before calling [`parse`] — otherwise `ne description ""` would
//! flatten into three sibling arguments of a call to `if` instead of being
//! recognized as the nested call `ne(description, "")`. `Expr::Flow` is
//! only produced here for bare keyword tags with nothing left to parse
//! (`end`, `else`).

use hydrate_core::Value;

use crate::ast::{is_flow_keyword, Expr, StateRef};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

fn err(message: impl Into<String>) -> ParseError {
    ParseError { message: message.into() }
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn new(src: &str) -> Self {
        Scanner { chars: src.chars().collect(), pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}

/// Parse a complete expression source string (the trimmed content of a
/// `{{…}}` placeholder, or a flow-keyword condition/pipeline with its
/// leading keyword already stripped by the caller).
pub fn parse(src: &str) -> Result<Expr, ParseError> {
    let mut scanner = Scanner::new(src);
    scanner.skip_ws();
    if scanner.at_end() {
        return Err(err("empty expression"));
    }
    let expr = parse_atom(&mut scanner)?;
    scanner.skip_ws();
    if !scanner.at_end() {
        // A bare atom followed by more tokens at the top level is a call
        // whose head is that atom's identifier.
        let head = match expr {
            Expr::Var { path, optional: false } => path,
            _ => return Err(err(format!("unexpected trailing input in `{src}`"))),
        };
        let args = parse_args(&mut scanner)?;
        return Ok(finish_call(head, args));
    }
    Ok(expr)
}

/// Parse one argument position: a parenthesized sub-call, a quoted string,
/// a number/boolean literal, a state reference, or a bare variable path.
fn parse_atom(scanner: &mut Scanner) -> Result<Expr, ParseError> {
    scanner.skip_ws();
    match scanner.peek() {
        Some('(') => {
            scanner.bump();
            scanner.skip_ws();
            let head_token = read_raw_token(scanner)?;
            let args = parse_args(scanner)?;
            scanner.skip_ws();
            if scanner.bump() != Some(')') {
                return Err(err("unterminated parenthesized expression"));
            }
            Ok(finish_call(head_token, args))
        }
        Some('"') | Some('\'') => parse_quoted(scanner),
        Some(_) => {
            let token = read_raw_token(scanner)?;
            Ok(classify_token(&token))
        }
        None => Err(err("unexpected end of expression")),
    }
}

/// Parse a whitespace-separated argument list until `)` or end of input.
fn parse_args(scanner: &mut Scanner) -> Result<Vec<Expr>, ParseError> {
    let mut args = Vec::new();
    loop {
        scanner.skip_ws();
        match scanner.peek() {
            None | Some(')') => break,
            _ => args.push(parse_atom(scanner)?),
        }
    }
    Ok(args)
}

fn finish_call(head: String, args: Vec<Expr>) -> Expr {
    if args.is_empty() {
        if is_flow_keyword(&head) {
            Expr::Flow(head)
        } else {
            classify_bare_head(&head)
        }
    } else {
        Expr::Call { head, args }
    }
}

/// A bare head with no arguments is either a flow keyword, a state
/// reference, or a variable path — never a zero-arity function call
/// (zero-arg calls like `noop`/`genUUID` only occur as call heads when the
/// caller writes them explicitly, which `classify_token` handles by
/// returning a `Var`; the rewriter and evaluator resolve plain `Var` nodes
/// that happen to name a registered function by falling back to a
/// zero-argument call — see `hydrate-engine::eval`).
fn classify_bare_head(head: &str) -> Expr {
    classify_token(head)
}

fn read_raw_token(scanner: &mut Scanner) -> Result<String, ParseError> {
    let mut token = String::new();
    while let Some(c) = scanner.peek() {
        if c.is_whitespace() || c == '(' || c == ')' {
            break;
        }
        token.push(c);
        scanner.pos += 1;
    }
    if token.is_empty() {
        return Err(err("expected a token"));
    }
    Ok(token)
}

fn classify_token(token: &str) -> Expr {
    if token == "$.Data" {
        return Expr::StateRef(StateRef::Data);
    }
    if token == "$.MissingKeys" {
        return Expr::StateRef(StateRef::MissingKeys);
    }
    if token == "true" {
        return Expr::Literal(Value::Bool(true));
    }
    if token == "false" {
        return Expr::Literal(Value::Bool(false));
    }
    if let Some(num) = parse_number(token) {
        return Expr::Literal(num);
    }
    let optional = token.ends_with('?');
    let path = if optional { &token[..token.len() - 1] } else { token };
    Expr::Var { path: path.to_string(), optional }
}

fn parse_number(token: &str) -> Option<Value> {
    let mut rest = token;
    if let Some(stripped) = rest.strip_prefix('-') {
        if stripped.is_empty() || !stripped.chars().next()?.is_ascii_digit() {
            return None;
        }
        rest = stripped;
    } else if !rest.chars().next()?.is_ascii_digit() {
        return None;
    }
    if !rest.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if rest.matches('.').count() > 1 {
        return None;
    }
    if token.contains('.') {
        token.parse::<f64>().ok().map(Value::Float)
    } else {
        token.parse::<i64>().ok().map(Value::Int)
    }
}

fn parse_quoted(scanner: &mut Scanner) -> Result<Expr, ParseError> {
    let quote = scanner.bump().expect("caller checked peek");
    let mut out = String::new();
    loop {
        match scanner.bump() {
            None => return Err(err("unterminated string literal")),
            Some('\\') => match scanner.bump() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('"') => out.push('"'),
                Some('\'') => out.push('\''),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => return Err(err("unterminated escape sequence")),
            },
            Some(c) if c == quote => break,
            Some(c) => out.push(c),
        }
    }
    Ok(Expr::Literal(Value::String(out)))
}

#[cfg(test)]
mod parse_tests {
    use super::*;

    #[test]
    fn parses_bare_variable() {
        assert_eq!(parse("name").unwrap(), Expr::Var { path: "name".into(), optional: false });
    }

    #[test]
    fn parses_optional_variable() {
        assert_eq!(
            parse("required.nested?").unwrap(),
            Expr::Var { path: "required.nested".into(), optional: true }
        );
    }

    #[test]
    fn parses_simple_call() {
        assert_eq!(
            parse(r#"startsWith value "pre""#).unwrap(),
            Expr::call("startsWith", vec![Expr::var("value", false), Expr::Literal(Value::string("pre"))])
        );
    }

    #[test]
    fn parses_nested_call_as_argument() {
        let expr = parse(
            r#"get "dataset.id" (find "resources" "id" "memory.resource_id")"#,
        )
        .unwrap();
        match expr {
            Expr::Call { head, args } => {
                assert_eq!(head, "get");
                assert_eq!(args.len(), 2);
                assert!(matches!(&args[1], Expr::Call { head, .. } if head == "find"));
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn parses_escaped_string_literal() {
        assert_eq!(
            parse(r#"toJSON "line\nbreak""#).unwrap(),
            Expr::call("toJSON", vec![Expr::Literal(Value::string("line\nbreak"))])
        );
    }

    #[test]
    fn parses_integer_and_float_literals() {
        assert_eq!(parse("add 1 2").unwrap(), Expr::call("add", vec![
            Expr::Literal(Value::Int(1)),
            Expr::Literal(Value::Int(2)),
        ]));
        assert_eq!(
            parse("add 1.5 2").unwrap(),
            Expr::call("add", vec![Expr::Literal(Value::Float(1.5)), Expr::Literal(Value::Int(2))])
        );
    }

    #[test]
    fn parses_bare_flow_keyword() {
        assert_eq!(parse("end").unwrap(), Expr::Flow("end".into()));
        assert_eq!(parse("else").unwrap(), Expr::Flow("else".into()));
    }

    #[test]
    fn parses_state_ref_tokens() {
        assert_eq!(parse("$.Data").unwrap(), Expr::StateRef(StateRef::Data));
        assert_eq!(parse("$.MissingKeys").unwrap(), Expr::StateRef(StateRef::MissingKeys));
    }
}

//! `toJSON`, `nilToEmptyString`, `toString`, `truncateString`,
//! `regexReplace`.

use hydrate_core::{HydrateError, Value};

use super::support::arg;

pub fn to_json(args: &[Value]) -> Result<Value, HydrateError> {
    Ok(Value::String(arg(args, 0, "toJSON")?.to_json_or_error_string()))
}

pub fn nil_to_empty_string(args: &[Value]) -> Result<Value, HydrateError> {
    Ok(Value::String(arg(args, 0, "nilToEmptyString")?.display_string()))
}

pub fn to_string(args: &[Value]) -> Result<Value, HydrateError> {
    nil_to_empty_string(args)
}

pub fn truncate_string(args: &[Value]) -> Result<Value, HydrateError> {
    let s = arg(args, 0, "truncateString")?.display_string();
    let n = arg(args, 1, "truncateString")?.as_i64().unwrap_or(0);
    Ok(Value::String(truncate(&s, n)))
}

fn truncate(s: &str, n: i64) -> String {
    if n <= 0 {
        return String::new();
    }
    let chars: Vec<char> = s.chars().collect();
    if (chars.len() as i64) <= n {
        return s.to_string();
    }
    let head: String = chars[..n as usize].iter().collect();
    if n <= 3 {
        head
    } else {
        format!("{head}...")
    }
}

pub fn regex_replace(args: &[Value]) -> Result<Value, HydrateError> {
    let pattern = arg(args, 0, "regexReplace")?.display_string();
    let replacement = arg(args, 1, "regexReplace")?.display_string();
    let s = arg(args, 2, "regexReplace")?.display_string();
    match regex::Regex::new(&pattern) {
        Ok(re) => Ok(Value::String(re.replace_all(&s, replacement.as_str()).into_owned())),
        Err(error) => {
            tracing::warn!(%error, %pattern, "regexReplace: pattern failed to compile");
            Ok(Value::String(s))
        }
    }
}

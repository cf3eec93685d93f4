//! Stateful `incrementCounter`, `incrementCounterBy` — the only two
//! functions that mutate the ambient state rather than merely reading it.

use hydrate_core::{HydrateError, MissingKeys, Value};

use super::object::set_dotted;
use super::support::{arg_i64, arg_str, fn_err};

/// Read the integer-coerced current value at `name` (0 if absent), write
/// `current + by` back at that same (possibly dotted) location in `state`,
/// and return the new value — spec §4.3: "write back into the state
/// mapping they were given", not into a private side-channel.
fn increment_by(state: &mut Value, name: &str, by: i64) -> Result<i64, HydrateError> {
    let mut scratch = MissingKeys::new();
    let current = hydrate_core::path::get(name, state, &mut scratch)
        .and_then(|v| v.as_i64())
        .unwrap_or(0);
    let next = current + by;
    let root = state
        .as_mapping_mut()
        .ok_or_else(|| fn_err("incrementCounter", "state root is not a mapping"))?;
    set_dotted(root, name, Value::Int(next));
    Ok(next)
}

/// `incrementCounter(name)` — increments by 1.
pub fn increment_counter(
    args: &[Value],
    state: &mut Value,
    _missing: &mut MissingKeys,
) -> Result<Value, HydrateError> {
    let name = arg_str(args, 0, "incrementCounter")?.to_string();
    Ok(Value::Int(increment_by(state, &name, 1)?))
}

/// `incrementCounterBy(name, by)`.
pub fn increment_counter_by(
    args: &[Value],
    state: &mut Value,
    _missing: &mut MissingKeys,
) -> Result<Value, HydrateError> {
    let name = arg_str(args, 0, "incrementCounterBy")?.to_string();
    let by = arg_i64(args, 1, "incrementCounterBy")?;
    Ok(Value::Int(increment_by(state, &name, by)?))
}

#[cfg(test)]
mod counter_tests {
    use super::*;

    #[test]
    fn increment_counter_persists_across_calls() {
        let mut state = Value::object([]);
        let mut missing = MissingKeys::new();
        assert_eq!(
            increment_counter(&[Value::string("views")], &mut state, &mut missing).unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            increment_counter(&[Value::string("views")], &mut state, &mut missing).unwrap(),
            Value::Int(2)
        );
    }

    #[test]
    fn increment_counter_by_accumulates_arbitrary_steps() {
        let mut state = Value::object([]);
        let mut missing = MissingKeys::new();
        increment_counter_by(&[Value::string("score"), Value::Int(5)], &mut state, &mut missing).unwrap();
        let result =
            increment_counter_by(&[Value::string("score"), Value::Int(3)], &mut state, &mut missing)
                .unwrap();
        assert_eq!(result, Value::Int(8));
    }

    #[test]
    fn distinct_counters_are_independent() {
        let mut state = Value::object([]);
        let mut missing = MissingKeys::new();
        increment_counter(&[Value::string("a")], &mut state, &mut missing).unwrap();
        increment_counter(&[Value::string("a")], &mut state, &mut missing).unwrap();
        let b = increment_counter(&[Value::string("b")], &mut state, &mut missing).unwrap();
        assert_eq!(b, Value::Int(1));
    }

    #[test]
    fn written_value_is_directly_readable_at_its_own_key() {
        let mut state = Value::object([]);
        let mut missing = MissingKeys::new();
        increment_counter(&[Value::string("views")], &mut state, &mut missing).unwrap();
        assert_eq!(state.field_of("views"), Some(Value::Int(1)));
    }
}

//! `add`, `sub`, `gt`, `lt` — integer arithmetic and comparison with
//! permissive coercion from float/string/nil.

use hydrate_core::{HydrateError, Value};

use super::support::{arg, coerce_int};

pub fn add(args: &[Value]) -> Result<Value, HydrateError> {
    Ok(Value::Int(coerce_int(arg(args, 0, "add")?) + coerce_int(arg(args, 1, "add")?)))
}

pub fn sub(args: &[Value]) -> Result<Value, HydrateError> {
    Ok(Value::Int(coerce_int(arg(args, 0, "sub")?) - coerce_int(arg(args, 1, "sub")?)))
}

pub fn gt(args: &[Value]) -> Result<Value, HydrateError> {
    Ok(Value::Bool(coerce_int(arg(args, 0, "gt")?) > coerce_int(arg(args, 1, "gt")?)))
}

pub fn lt(args: &[Value]) -> Result<Value, HydrateError> {
    Ok(Value::Bool(coerce_int(arg(args, 0, "lt")?) < coerce_int(arg(args, 1, "lt")?)))
}

#[cfg(test)]
mod arith_tests {
    use super::*;

    #[test]
    fn add_coerces_float_and_string() {
        assert_eq!(add(&[Value::Int(1), Value::Float(2.9)]).unwrap(), Value::Int(3));
        assert_eq!(add(&[Value::string("3"), Value::Int(4)]).unwrap(), Value::Int(7));
    }

    #[test]
    fn sub_and_comparisons() {
        assert_eq!(sub(&[Value::Int(5), Value::Int(2)]).unwrap(), Value::Int(3));
        assert_eq!(gt(&[Value::Int(5), Value::Int(2)]).unwrap(), Value::Bool(true));
        assert_eq!(lt(&[Value::Int(5), Value::Int(2)]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn nil_coerces_to_zero() {
        assert_eq!(add(&[Value::Null, Value::Int(5)]).unwrap(), Value::Int(5));
    }
}

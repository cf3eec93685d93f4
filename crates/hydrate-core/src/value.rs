//! Runtime value representation and the capability-based adapter over it.
//!
//! Every other component (path resolver, function library, structural
//! walker) reads values exclusively through the functions in this module —
//! no other module is allowed to `match` directly on a host-provided shape.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A host-provided polymorphic record (struct, database row, ORM model,
/// ...) that the engine can read fields from without knowing its concrete
/// type.
///
/// Implementors are responsible for their own case-insensitive /
/// lower-then-PascalCase field lookup; the engine calls `field` once per
/// path segment and never inspects the record's real type.
pub trait Record: fmt::Debug {
    /// Read a named capability. Returns `None` if the record has no such
    /// field.
    fn field(&self, name: &str) -> Option<Value>;

    /// If this record is an indirect reference (a pointer-like handle),
    /// return the value it forwards to. `None` means this record is a
    /// direct value and `deref` should stop here — unless [`Record::is_nil_ref`]
    /// says otherwise.
    fn deref_target(&self) -> Option<Value> {
        None
    }

    /// Whether this record is an indirect reference that forwards to
    /// nothing (a nil pointer/handle). When true, [`Value::deref`] returns
    /// `None` instead of treating the record as a direct value, so a nil
    /// reference behaves as an absent marker (e.g. `eq(nilPointer, "")`).
    /// Defaults to `false`: most records are direct values, not references.
    fn is_nil_ref(&self) -> bool {
        false
    }

    /// If this record matches the nullable-wrapper record shape (a `valid`
    /// capability plus one typed payload capability), return the inner
    /// value (or `None` if the wrapper is invalid) and the `valid` flag.
    fn as_nullable(&self) -> Option<(Option<Value>, bool)> {
        None
    }
}

/// Runtime value type flowing through the hydrator.
///
/// `Object` uses an order-preserving map so that iteration order (e.g. for
/// `mapToArray`, or for diagnostics listing top-level state keys) matches
/// insertion order rather than an arbitrary hash order.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
    /// Opaque host record, read only through the [`Record`] trait.
    Record(Rc<dyn Record>),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(items.into_iter().collect())
    }

    pub fn object(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Value::Object(entries.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Follow indirect references until a direct value or an absent marker
    /// (`None`) is reached. Non-record values are already direct.
    pub fn deref(&self) -> Option<Value> {
        let mut current = self.clone();
        loop {
            match current {
                Value::Record(ref r) => match r.deref_target() {
                    Some(next) => current = next,
                    None if r.is_nil_ref() => return None,
                    None => return Some(current),
                },
                other => return Some(other),
            }
        }
    }

    /// `asMapping`: present only for true string-keyed mappings.
    pub fn as_mapping(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// `asSequence`: present only for ordered sequences.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// `fieldOf`: read a named capability from a record or mapping.
    ///
    /// For mappings, tries the name as given, then with its first letter
    /// upper-cased (PascalCase fallback), matching the source convention of
    /// state produced by case-insensitive host adapters.
    pub fn field_of(&self, name: &str) -> Option<Value> {
        match self {
            Value::Object(map) => {
                if let Some(v) = map.get(name) {
                    return Some(v.clone());
                }
                map.get(&pascal_case(name)).cloned()
            }
            Value::Record(r) => r.field(name),
            _ => None,
        }
    }

    /// `unwrapNullable`: recognize the record- and mapping-shaped nullable
    /// wrapper, returning the inner value and its validity. Values that
    /// don't match either shape are already direct: `(Some(self), true)`.
    pub fn unwrap_nullable(&self) -> (Option<Value>, bool) {
        match self {
            Value::Record(r) => {
                if let Some((inner, valid)) = r.as_nullable() {
                    return (inner, valid);
                }
                (Some(self.clone()), true)
            }
            Value::Object(map) => {
                let valid_key = map
                    .get("Valid")
                    .or_else(|| map.get("valid"))
                    .and_then(Value::as_bool);
                let Some(valid) = valid_key else {
                    return (Some(self.clone()), true);
                };
                const TYPED_KEYS: &[&str] = &[
                    "String", "string", "Int64", "i64", "Int32", "i32", "Int16", "i16", "Float64",
                    "f64", "Bool", "bool", "Time", "time", "Byte", "byte",
                ];
                let payload = TYPED_KEYS.iter().find_map(|k| map.get(*k).cloned());
                match payload {
                    Some(v) if valid => (Some(v), true),
                    Some(_) => (None, false),
                    None => (Some(self.clone()), true),
                }
            }
            other => (Some(other.clone()), true),
        }
    }

    /// After `unwrapNullable`, the `truthyValue` semantics of §4.3: false
    /// for absent, empty string, empty sequence, empty mapping, boolean
    /// false; true otherwise.
    pub fn truthy_value(&self) -> bool {
        let (unwrapped, valid) = self.unwrap_nullable();
        if !valid {
            return false;
        }
        match unwrapped {
            None => false,
            Some(Value::Null) => false,
            Some(Value::Bool(b)) => b,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(map)) => !map.is_empty(),
            Some(_) => true,
        }
    }

    /// Best-effort string form used by `toString`/`nilToEmptyString` and by
    /// default-string coercion in the public API.
    pub fn display_string(&self) -> String {
        let (unwrapped, valid) = self.unwrap_nullable();
        if !valid {
            return String::new();
        }
        match unwrapped {
            None | Some(Value::Null) => String::new(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Int(i)) => i.to_string(),
            Some(Value::Float(f)) => format_float(f),
            Some(Value::String(s)) => s,
            Some(other) => other
                .to_json()
                .unwrap_or_else(|e| format!("error: {e}")),
        }
    }

    /// `toJSON`: canonical JSON encoding; callers that need the §4.3
    /// fallback string should use [`Value::to_json_or_error_string`].
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_or_error_string(&self) -> String {
        self.to_json()
            .unwrap_or_else(|e| format!("error: {e}"))
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.is_finite() {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

fn pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            // Records have no general structural equality; two record
            // handles are equal only if nothing distinguishes them through
            // the capabilities the engine can observe.
            (Value::Record(_), Value::Record(_)) => false,
            _ => false,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::Record(r) => {
                // Best effort: serialize records we can't introspect as an
                // opaque, stable placeholder rather than failing encoding.
                serializer.serialize_str(&format!("{r:?}"))
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

#[cfg(test)]
mod value_tests {
    use super::*;

    #[derive(Debug)]
    struct NullableRow {
        valid: bool,
        value: Value,
    }

    impl Record for NullableRow {
        fn field(&self, _name: &str) -> Option<Value> {
            None
        }

        fn as_nullable(&self) -> Option<(Option<Value>, bool)> {
            if self.valid {
                Some((Some(self.value.clone()), true))
            } else {
                Some((None, false))
            }
        }
    }

    #[test]
    fn unwrap_nullable_mapping_shape_valid() {
        let v = Value::object([
            ("Valid".to_string(), Value::Bool(true)),
            ("String".to_string(), Value::string("ok")),
        ]);
        let (inner, valid) = v.unwrap_nullable();
        assert!(valid);
        assert_eq!(inner, Some(Value::string("ok")));
    }

    #[test]
    fn unwrap_nullable_mapping_shape_invalid() {
        let v = Value::object([("Valid".to_string(), Value::Bool(false))]);
        let (inner, valid) = v.unwrap_nullable();
        assert!(!valid);
        assert_eq!(inner, None);
    }

    #[derive(Debug)]
    struct NilPointer;

    impl Record for NilPointer {
        fn field(&self, _name: &str) -> Option<Value> {
            None
        }

        fn is_nil_ref(&self) -> bool {
            true
        }
    }

    #[test]
    fn deref_nil_pointer_is_absent() {
        let v = Value::Record(Rc::new(NilPointer));
        assert_eq!(v.deref(), None);
    }

    #[test]
    fn deref_non_ref_record_is_direct() {
        let v = Value::Record(Rc::new(NullableRow { valid: true, value: Value::string("x") }));
        assert!(matches!(v.deref(), Some(Value::Record(_))));
    }

    #[test]
    fn unwrap_nullable_record_shape() {
        let valid = Value::Record(Rc::new(NullableRow {
            valid: true,
            value: Value::string("ok"),
        }));
        assert_eq!(valid.unwrap_nullable(), (Some(Value::string("ok")), true));

        let invalid = Value::Record(Rc::new(NullableRow {
            valid: false,
            value: Value::Null,
        }));
        assert_eq!(invalid.unwrap_nullable(), (None, false));
    }

    #[test]
    fn truthy_value_boundary_cases() {
        assert!(!Value::Null.truthy_value());
        assert!(!Value::string("").truthy_value());
        assert!(!Value::array([]).truthy_value());
        assert!(!Value::object([]).truthy_value());
        assert!(!Value::Bool(false).truthy_value());
        assert!(Value::Bool(true).truthy_value());
        assert!(Value::Int(0).truthy_value());
        assert!(Value::string("0").truthy_value());
    }

    #[test]
    fn field_of_pascal_case_fallback() {
        let v = Value::object([("ResourceId".to_string(), Value::string("res-1"))]);
        assert_eq!(v.field_of("resourceId"), None);
        assert_eq!(v.field_of("ResourceId"), Some(Value::string("res-1")));
    }

    #[test]
    fn eq_treats_int_and_equal_float_as_equal() {
        assert_eq!(Value::Int(3), Value::Float(3.0));
    }

    #[test]
    fn json_roundtrip_from_serde_value() {
        let json = serde_json::json!({"a": 1, "b": [true, null, "x"]});
        let v: Value = json.into();
        match v {
            Value::Object(map) => {
                assert_eq!(map.get("a"), Some(&Value::Int(1)));
                assert_eq!(
                    map.get("b"),
                    Some(&Value::array([
                        Value::Bool(true),
                        Value::Null,
                        Value::string("x")
                    ]))
                );
            }
            _ => panic!("expected object"),
        }
    }
}

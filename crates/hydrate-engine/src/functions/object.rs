//! Stateful `addkey`, `removekey`, `addkeytoall`, `mapToDict`, `mapToArray`.

use indexmap::IndexMap;

use hydrate_core::{HydrateError, MissingKeys, Value};

use super::support::{arg_str, resolve_map, resolve_seq_lenient};

/// Set a (possibly dotted) key on a mapping, creating intermediate
/// mappings as needed. Non-mapping values encountered along the path are
/// overwritten rather than erroring — `addkey` always succeeds.
pub(crate) fn set_dotted(target: &mut IndexMap<String, Value>, path: &str, value: Value) {
    let mut parts = path.splitn(2, '.');
    let head = parts.next().unwrap_or(path);
    match parts.next() {
        Some(rest) => {
            let entry = target.entry(head.to_string()).or_insert_with(|| Value::object([]));
            if entry.as_mapping().is_none() {
                *entry = Value::object([]);
            }
            if let Some(inner) = entry.as_mapping_mut() {
                set_dotted(inner, rest, value);
            }
        }
        None => {
            target.insert(head.to_string(), value);
        }
    }
}

/// `addkey(objKey, key, value)` — `objKey` is a state path, resolved the
/// same way as `arrKey`/`listKey` in every sibling stateful function.
pub fn addkey(args: &[Value], state: &Value, missing: &mut MissingKeys) -> Result<Value, HydrateError> {
    let obj_key = arg_str(args, 0, "addkey")?;
    let key = arg_str(args, 1, "addkey")?.to_string();
    let value = args.get(2).cloned().unwrap_or(Value::Null);
    let mut map = resolve_map(obj_key, state, missing).unwrap_or_default();
    set_dotted(&mut map, &key, value);
    Ok(Value::Object(map))
}

/// `removekey(objKey, key)` — `objKey` is a state path.
pub fn removekey(args: &[Value], state: &Value, missing: &mut MissingKeys) -> Result<Value, HydrateError> {
    let obj_key = arg_str(args, 0, "removekey")?;
    let key = arg_str(args, 1, "removekey")?;
    let mut map = resolve_map(obj_key, state, missing).unwrap_or_default();
    map.shift_remove(key);
    Ok(Value::Object(map))
}

/// `addkeytoall(arrKey, key, value)` — applies `addkey` to every element
/// of a sequence.
pub fn addkeytoall(
    args: &[Value],
    state: &Value,
    missing: &mut MissingKeys,
) -> Result<Value, HydrateError> {
    let list_key = arg_str(args, 0, "addkeytoall")?;
    let key = arg_str(args, 1, "addkeytoall")?.to_string();
    let value = args.get(2).cloned().unwrap_or(Value::Null);
    let Some(items) = super::support::resolve_seq(list_key, state, missing) else {
        return Ok(Value::Array(Vec::new()));
    };
    let out = items
        .into_iter()
        .map(|item| {
            let mut map = item.as_mapping().cloned().unwrap_or_default();
            set_dotted(&mut map, &key, value.clone());
            Value::Object(map)
        })
        .collect();
    Ok(Value::Array(out))
}

/// `mapToDict(listKey, dictKey)` — wraps each element of a plain list in a
/// single-key object `{dictKey: element}`; absent list resolves to an empty
/// sequence and is not recorded as missing.
pub fn map_to_dict(
    args: &[Value],
    state: &Value,
    _missing: &mut MissingKeys,
) -> Result<Value, HydrateError> {
    let list_key = arg_str(args, 0, "mapToDict")?;
    let dict_key = arg_str(args, 1, "mapToDict")?.to_string();
    let items = resolve_seq_lenient(list_key, state).unwrap_or_default();
    let out = items
        .into_iter()
        .map(|item| Value::Object(IndexMap::from([(dict_key.clone(), item)])))
        .collect();
    Ok(Value::Array(out))
}

/// `mapToArray(mapKey)` — turns `{k: v, ...}` into `[{key: k, value: v}, ...]`
/// in unspecified (insertion) order. `mapKey` is a state path.
pub fn map_to_array(
    args: &[Value],
    state: &Value,
    missing: &mut MissingKeys,
) -> Result<Value, HydrateError> {
    let map_key = arg_str(args, 0, "mapToArray")?;
    let out = resolve_map(map_key, state, missing)
        .map(|m| {
            m.iter()
                .map(|(k, v)| {
                    Value::Object(IndexMap::from([
                        ("key".to_string(), Value::string(k.as_str())),
                        ("value".to_string(), v.clone()),
                    ]))
                })
                .collect()
        })
        .unwrap_or_default();
    Ok(Value::Array(out))
}

#[cfg(test)]
mod object_tests {
    use super::*;

    #[test]
    fn addkey_creates_nested_dotted_path() {
        let state = Value::object([("profile".to_string(), Value::object([]))]);
        let mut missing = MissingKeys::new();
        let result = addkey(
            &[Value::string("profile"), Value::string("a.b.c"), Value::Int(1)],
            &state,
            &mut missing,
        )
        .unwrap();
        let map = result.as_mapping().unwrap();
        let a = map.get("a").unwrap().as_mapping().unwrap();
        let b = a.get("b").unwrap().as_mapping().unwrap();
        assert_eq!(b.get("c"), Some(&Value::Int(1)));
    }

    #[test]
    fn addkey_resolves_obj_key_against_state() {
        let state = Value::object([(
            "profile".to_string(),
            Value::object([("a".to_string(), Value::Int(0))]),
        )]);
        let mut missing = MissingKeys::new();
        let result = addkey(
            &[Value::string("profile"), Value::string("b"), Value::Int(2)],
            &state,
            &mut missing,
        )
        .unwrap();
        let map = result.as_mapping().unwrap();
        assert_eq!(map.get("a"), Some(&Value::Int(0)));
        assert_eq!(map.get("b"), Some(&Value::Int(2)));
    }

    #[test]
    fn removekey_drops_only_named_key() {
        let base = Value::object([
            ("x".to_string(), Value::Int(1)),
            ("y".to_string(), Value::Int(2)),
        ]);
        let state = Value::object([("profile".to_string(), base)]);
        let mut missing = MissingKeys::new();
        let result = removekey(&[Value::string("profile"), Value::string("x")], &state, &mut missing).unwrap();
        let map = result.as_mapping().unwrap();
        assert_eq!(map.get("x"), None);
        assert_eq!(map.get("y"), Some(&Value::Int(2)));
    }

    #[test]
    fn addkeytoall_applies_to_every_element() {
        let items = vec![Value::object([]), Value::object([])];
        let state = Value::object([("xs".to_string(), Value::array(items))]);
        let mut missing = MissingKeys::new();
        let result = addkeytoall(
            &[Value::string("xs"), Value::string("flag"), Value::Bool(true)],
            &state,
            &mut missing,
        )
        .unwrap();
        match result {
            Value::Array(items) => {
                for item in items {
                    assert_eq!(item.field_of("flag"), Some(Value::Bool(true)));
                }
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn map_to_dict_wraps_each_element_under_the_given_key() {
        let items = vec![Value::string("a"), Value::string("b")];
        let state = Value::object([("xs".to_string(), Value::array(items))]);
        let mut missing = MissingKeys::new();
        let result =
            map_to_dict(&[Value::string("xs"), Value::string("name")], &state, &mut missing).unwrap();
        assert_eq!(
            result,
            Value::array([
                Value::object([("name".to_string(), Value::string("a"))]),
                Value::object([("name".to_string(), Value::string("b"))]),
            ])
        );
    }

    #[test]
    fn map_to_dict_tolerates_missing_list() {
        let state = Value::object([]);
        let mut missing = MissingKeys::new();
        let result =
            map_to_dict(&[Value::string("missing"), Value::string("id")], &state, &mut missing).unwrap();
        assert_eq!(result, Value::array([]));
        assert!(missing.is_empty());
    }

    #[test]
    fn map_to_array_turns_mapping_entries_into_key_value_objects() {
        let base = Value::object([("a".to_string(), Value::Int(1)), ("b".to_string(), Value::Int(2))]);
        let state = Value::object([("m".to_string(), base)]);
        let mut missing = MissingKeys::new();
        let result = map_to_array(&[Value::string("m")], &state, &mut missing).unwrap();
        match result {
            Value::Array(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(
                    items[0],
                    Value::object([
                        ("key".to_string(), Value::string("a")),
                        ("value".to_string(), Value::Int(1)),
                    ])
                );
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn map_to_array_records_missing_when_key_absent() {
        let state = Value::object([]);
        let mut missing = MissingKeys::new();
        let result = map_to_array(&[Value::string("missing")], &state, &mut missing).unwrap();
        assert_eq!(result, Value::array([]));
        assert!(!missing.is_empty());
    }
}

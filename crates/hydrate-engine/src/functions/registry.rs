//! Static function table: every callable name in the library resolves to
//! exactly one table entry, built once and shared for the process lifetime.

use std::collections::HashMap;
use std::sync::LazyLock;

use hydrate_core::{HydrateError, MissingKeys, Value};

use super::{arith, counter, equality, misc, object, path_ops, predicate, sequence, strings};

pub type BasicFn = fn(&[Value]) -> Result<Value, HydrateError>;
pub type StatefulFn = fn(&[Value], &Value, &mut MissingKeys) -> Result<Value, HydrateError>;
pub type MutatingFn = fn(&[Value], &mut Value, &mut MissingKeys) -> Result<Value, HydrateError>;

pub enum Callable {
    Basic(BasicFn),
    Stateful(StatefulFn),
    Mutating(MutatingFn),
}

static REGISTRY: LazyLock<HashMap<&'static str, Callable>> = LazyLock::new(|| {
    let mut m: HashMap<&'static str, Callable> = HashMap::new();

    // Basic — no state access.
    m.insert("eq", Callable::Basic(equality::eq));
    m.insert("ne", Callable::Basic(equality::ne));
    m.insert("add", Callable::Basic(arith::add));
    m.insert("sub", Callable::Basic(arith::sub));
    m.insert("gt", Callable::Basic(arith::gt));
    m.insert("lt", Callable::Basic(arith::lt));
    m.insert("truthyValue", Callable::Basic(predicate::truthy_value));
    m.insert("len", Callable::Basic(predicate::len));
    m.insert("startsWith", Callable::Basic(predicate::starts_with));
    m.insert("endsWith", Callable::Basic(predicate::ends_with));
    m.insert("toJSON", Callable::Basic(strings::to_json));
    m.insert("nilToEmptyString", Callable::Basic(strings::nil_to_empty_string));
    m.insert("toString", Callable::Basic(strings::to_string));
    m.insert("truncateString", Callable::Basic(strings::truncate_string));
    m.insert("regexReplace", Callable::Basic(strings::regex_replace));
    m.insert("genUUID", Callable::Basic(misc::gen_uuid));
    m.insert("now", Callable::Basic(misc::now));
    m.insert("list", Callable::Basic(misc::list));
    m.insert("noop", Callable::Basic(misc::noop));
    m.insert("mergeRaw", Callable::Basic(misc::merge_raw));

    // Stateful — read ambient state and missing-key tracking, but do not mutate state.
    m.insert("truthy", Callable::Stateful(predicate::truthy));
    m.insert("get", Callable::Stateful(path_ops::get));
    m.insert("coalesce", Callable::Stateful(path_ops::coalesce));
    m.insert("getOrOriginal", Callable::Stateful(path_ops::get_or_original));
    m.insert("slice", Callable::Stateful(sequence::slice));
    m.insert("sliceEnd", Callable::Stateful(sequence::slice_end));
    m.insert(
        "sliceEndKeepFirstUserMessage",
        Callable::Stateful(sequence::slice_end_keep_first_user_message),
    );
    m.insert("extractSlice", Callable::Stateful(sequence::extract_slice));
    m.insert("dedupeBy", Callable::Stateful(sequence::dedupe_by));
    m.insert("find", Callable::Stateful(sequence::find));
    m.insert("findByValue", Callable::Stateful(sequence::find_by_value));
    m.insert("getAtIndex", Callable::Stateful(sequence::get_at_index));
    m.insert("merge", Callable::Stateful(sequence::merge));
    m.insert("coalescelist", Callable::Stateful(sequence::coalescelist));
    m.insert("filter", Callable::Stateful(sequence::filter));
    m.insert("concat", Callable::Stateful(sequence::concat));
    m.insert("addkey", Callable::Stateful(object::addkey));
    m.insert("removekey", Callable::Stateful(object::removekey));
    m.insert("addkeytoall", Callable::Stateful(object::addkeytoall));
    m.insert("mapToDict", Callable::Stateful(object::map_to_dict));
    m.insert("mapToArray", Callable::Stateful(object::map_to_array));

    // Mutating — the only functions that write through `&mut state`.
    m.insert("incrementCounter", Callable::Mutating(counter::increment_counter));
    m.insert("incrementCounterBy", Callable::Mutating(counter::increment_counter_by));

    m
});

pub fn lookup(name: &str) -> Option<&'static Callable> {
    REGISTRY.get(name)
}

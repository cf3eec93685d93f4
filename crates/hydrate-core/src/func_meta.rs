//! Shared function classification metadata.
//!
//! Lives here, below both `hydrate-compiler` and `hydrate-engine`, so the
//! rewriter's implicit-argument injection and the evaluator's call
//! dispatch agree on which functions are stateful and how many explicit
//! arguments each declares, without either crate depending on the other's
//! implementation.

/// `(name, declared arity excluding the implicit `(state, missing)` tail)`
/// for every stateful function in the library (spec §4.3).
pub const STATEFUL_FUNCTIONS: &[(&str, usize)] = &[
    ("get", 1),
    // Listed under "Basic" in the source spec, but it reads ambient state
    // through a scratch accumulator, so it needs the implicit tail too.
    ("truthy", 1),
    ("coalesce", 2),
    ("getOrOriginal", 2),
    ("slice", 3),
    ("sliceEnd", 2),
    ("sliceEndKeepFirstUserMessage", 2),
    ("extractSlice", 2),
    ("dedupeBy", 2),
    ("find", 3),
    ("findByValue", 3),
    ("getAtIndex", 2),
    ("merge", 2),
    ("coalescelist", 1),
    ("addkey", 3),
    ("removekey", 2),
    ("addkeytoall", 3),
    ("mapToDict", 2),
    ("mapToArray", 1),
    ("incrementCounter", 1),
    ("incrementCounterBy", 2),
    ("filter", 4),
    ("concat", 3),
];

pub fn is_stateful(name: &str) -> bool {
    STATEFUL_FUNCTIONS.iter().any(|(n, _)| *n == name)
}

pub fn declared_arity(name: &str) -> Option<usize> {
    STATEFUL_FUNCTIONS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, arity)| *arity)
}

#[cfg(test)]
mod func_meta_tests {
    use super::*;

    #[test]
    fn get_has_single_argument_form() {
        assert_eq!(declared_arity("get"), Some(1));
    }

    #[test]
    fn basic_functions_are_not_stateful() {
        assert!(!is_stateful("eq"));
        assert!(!is_stateful("toJSON"));
    }
}

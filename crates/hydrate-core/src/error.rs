//! Compound error surface and the missing-key accumulator.
//!
//! Small `thiserror`-derived error enums rather than a hand-rolled
//! `Display`/`Error` impl pair.

use indexmap::IndexMap;

/// Insertion-ordered, dedup-by-logical-key set of `(key, structural path)`
/// pairs, built up during path resolution and structural walking.
///
/// First path wins on duplicate keys, matching "ordered by first
/// encounter". Backed by `IndexMap` so both dedup and iteration order come
/// for free.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingKeys {
    entries: IndexMap<String, String>,
}

impl MissingKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Record a missing key with its structural path, first-write-wins.
    pub fn record(&mut self, key: impl Into<String>, path: impl Into<String>) {
        self.entries.entry(key.into()).or_insert_with(|| path.into());
    }

    /// Record a missing key whose path is identical to the key itself (the
    /// common case for top-level lookups before any prefix has been
    /// prepended by the structural walker).
    pub fn record_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        let path = key.clone();
        self.record(key, path);
    }

    /// Prepend a structural-path segment to every recorded path, as done by
    /// the walker when a child mapping/sequence error bubbles up through a
    /// parent key or index.
    pub fn prepend_path(&mut self, prefix: &str) {
        for path in self.entries.values_mut() {
            *path = format!("{prefix}{path}");
        }
    }

    /// Merge another report into this one, first-write-wins per key.
    pub fn merge(&mut self, other: MissingKeys) {
        for (key, path) in other.entries {
            self.entries.entry(key).or_insert(path);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The compound error surface described in spec §6: ordered missing keys,
/// ordered missing structural paths, the set of top-level state keys (for
/// diagnostics), and an underlying cause.
#[derive(Debug, thiserror::Error)]
#[error("missing {} required key(s): {}", .missing.len(), summarize(&.missing))]
pub struct MissingKeysError {
    pub missing: MissingKeys,
    /// Top-level keys available in state, captured for diagnostics.
    pub available_keys: Vec<String>,
}

fn summarize(missing: &MissingKeys) -> String {
    missing.keys().collect::<Vec<_>>().join(", ")
}

/// Top-level error type for the hydrator.
#[derive(Debug, thiserror::Error)]
pub enum HydrateError {
    /// Required keys were missing during resolution. Best-effort partial
    /// output is carried alongside by the caller (see `hydrate_engine`'s
    /// `Hydrated<T>` wrapper), not inside this variant.
    #[error(transparent)]
    MissingKeys(#[from] MissingKeysError),

    /// Malformed placeholder syntax; fatal for the current string.
    #[error("failed to parse expression `{expr}`: {message}")]
    Parse { expr: String, message: String },

    /// Arity/type mismatch between a template call and the function's
    /// declared signature; fatal for the current string.
    #[error("call to `{name}` failed: {message}")]
    FunctionCall { name: String, message: String },

    /// Passthrough for JSON (de)serialization failures that are not
    /// "ignorable diagnostics" per spec §7.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn missing_keys_dedup_first_write_wins() {
        let mut m = MissingKeys::new();
        m.record("x", "a.x");
        m.record("x", "b.x");
        assert_eq!(m.len(), 1);
        assert_eq!(m.paths().collect::<Vec<_>>(), vec!["a.x"]);
    }

    #[test]
    fn prepend_path_rewrites_all_entries() {
        let mut m = MissingKeys::new();
        m.record_key("x");
        m.record_key("y");
        m.prepend_path("a.");
        assert_eq!(m.paths().collect::<Vec<_>>(), vec!["a.x", "a.y"]);
    }

    #[test]
    fn merge_keeps_first_occurrence_across_reports() {
        let mut a = MissingKeys::new();
        a.record("x", "a.x");
        let mut b = MissingKeys::new();
        b.record("x", "b.x");
        b.record("y", "b.y");
        a.merge(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.paths().collect::<Vec<_>>(), vec!["a.x", "b.y"]);
    }
}

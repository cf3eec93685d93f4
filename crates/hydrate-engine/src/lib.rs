//! Function library, expression evaluator, and structural walker for the
//! hydrate templating engine.
//!
//! `hydrate-core` defines the value model and path resolver; `hydrate-compiler`
//! turns placeholder text into rewritten expression trees. This crate ties
//! them together: the ~30-function library (C3), the expression evaluator
//! with its embedded flow sub-evaluator (C6), the policy-aware structural
//! walker (C7), and the public API callers actually use (C8).

pub mod api;
pub mod eval;
pub mod functions;
pub mod walk;

pub use api::{find_template_keys, hydrate, hydrate_dict, hydrate_slice, hydrate_string, merge_sources, Hydrated};
pub use eval::hydrate_str;
pub use functions::{lookup, Callable};

//! Value model, path resolution, and error types shared by the rest of the
//! hydration engine.
//!
//! This crate has no knowledge of placeholder syntax or template
//! functions — it is the substrate (`Value`, `get`, `Policy`,
//! `MissingKeys`) that `hydrate-compiler` and `hydrate-engine` build on.

pub mod error;
pub mod func_meta;
pub mod path;
pub mod policy;
pub mod value;

pub use error::{HydrateError, MissingKeys, MissingKeysError};
pub use path::get;
pub use policy::Policy;
pub use value::{Record, Value};

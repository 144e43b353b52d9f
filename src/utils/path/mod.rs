//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `expand_path`)
//! - [`route`]: Reference path utilities (`is_external_link`, `resolve_relative`)

pub mod fs;
pub mod route;

pub use fs::{expand_path, normalize_path, to_slash_relative};

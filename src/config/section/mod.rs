//! Configuration section definitions.
//!
//! Each module corresponds to a section in `fingerprint.toml`:
//!
//! | Module    | TOML Section | Purpose                                  |
//! |-----------|--------------|------------------------------------------|
//! | `paths`   | `[paths]`    | Source and output directories            |
//! | `rewrite` | `[rewrite]`  | Scanned extensions, naming, exclusions   |
//! | `minify`  | `[minify]`   | HTML/JS/CSS minification toggles         |

mod minify;
mod paths;
mod rewrite;

pub use minify::MinifyConfig;
pub use paths::PathsConfig;
pub use rewrite::{DEFAULT_CONTEXT_PREFIX, RewriteConfig};

//! Asset classification, scanning, naming and minification.

mod kind;
pub mod minify;
mod scan;
pub mod version;

// Types
pub use kind::{AssetKind, sort_for_processing};
pub use version::{NameTemplate, TargetName};

// Scanning (pure functions)
pub use scan::{SourceFile, SourceTree};

// Minification
pub use minify::{AssetMinifier, Minifier};

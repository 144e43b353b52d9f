//! `[paths]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! source = "src/main/webapp"         # Tree to scan and rewrite
//! output = "target/optimized-webapp" # Mirrored output tree
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Source directory (relative to the config file).
    pub source: PathBuf,

    /// Output directory (relative to the config file).
    pub output: PathBuf,

    /// Remove the output directory before building (CLI only).
    #[serde(skip)]
    pub clean: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: "src/main/webapp".into(),
            output: "target/optimized-webapp".into(),
            clean: false,
        }
    }
}

impl PathsConfig {
    pub const OUTPUT: FieldPath = FieldPath::new("paths.output");

    /// Resolve both directories against the project root.
    pub fn normalize(&mut self, root: &Path) {
        self.source = crate::utils::path::expand_path(&self.source, root);
        self.output = crate::utils::path::expand_path(&self.output, root);
    }

    /// Validate normalized paths.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.source == self.output {
            diag.error(Self::OUTPUT, "output directory must differ from the source directory");
        } else if self.output.starts_with(&self.source) {
            diag.error_with_hint(
                Self::OUTPUT,
                "output directory is inside the source directory",
                "the next run would fingerprint its own output; move it out of the source tree",
            );
        }
    }

    /// Template section for `fingerprint init`.
    pub fn template() -> &'static str {
        r#"[paths]
# Tree to scan and rewrite
source = "src/main/webapp"
# Mirrored output tree
output = "target/optimized-webapp"
"#
    }
}

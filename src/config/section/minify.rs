//! `[minify]` section configuration.
//!
//! Minification runs after reference rewriting, at most one minifier per file.
//!
//! # Example
//!
//! ```toml
//! [minify]
//! html = true      # Markup extensions (see `rewrite.markup`)
//! js = true
//! css = true
//! marker = ".min." # Files whose name contains this are left alone
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MinifyConfig {
    pub html: bool,
    pub js: bool,
    pub css: bool,
    /// Name fragment marking an already minified file.
    pub marker: String,
}

impl Default for MinifyConfig {
    fn default() -> Self {
        Self {
            html: true,
            js: true,
            css: true,
            marker: ".min.".into(),
        }
    }
}

impl MinifyConfig {
    pub const MARKER: FieldPath = FieldPath::new("minify.marker");

    /// Toggle all three minifiers at once (`--minify=false`).
    pub fn set_all(&mut self, enable: bool) {
        self.html = enable;
        self.js = enable;
        self.css = enable;
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.marker.is_empty() {
            diag.error_with_hint(
                Self::MARKER,
                "marker must not be empty",
                "an empty marker matches every file and disables js/css minification",
            );
        }
    }

    pub fn template() -> &'static str {
        r#"[minify]
html = true
js = true
css = true
# Files whose name contains the marker are copied without minification
marker = ".min."
"#
    }
}

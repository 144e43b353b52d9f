//! `[rewrite]` section configuration.
//!
//! Controls which files are scanned for references and how fingerprinted
//! names are built.
//!
//! # Example
//!
//! ```toml
//! [rewrite]
//! extensions = ["html", "jsp", "css", "js"]  # Files scanned for references
//! markup = ["html", "jsp"]                   # Rewritten last, minified as HTML
//! exclude = ["/vendor/"]                     # Substrings left unresolved
//! cdn = "https://cdn.example.com"            # Prefix for root-relative targets
//! template = "[hash][name].[ext]"            # Target file name
//! context_prefix = "${pageContext.request.contextPath}"
//! hash = "md5"                               # md5 | blake3
//! manifest = "fingerprint.json"              # Source → target map in output
//! ```

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::asset::NameTemplate;
use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::hash::HashAlgorithm;

/// Template placeholder used by JSP pages for the servlet context path.
pub const DEFAULT_CONTEXT_PREFIX: &str = "${pageContext.request.contextPath}";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Extensions of files scanned for references (case-sensitive).
    pub extensions: Vec<String>,

    /// Markup extensions: processed last and minified as HTML.
    pub markup: Vec<String>,

    /// References containing any of these substrings are not resolved.
    pub exclude: Vec<String>,

    /// URL prefix for rewritten root-relative references.
    pub cdn: Option<String>,

    /// Target file name template (`[hash]`, `[name]`, `[ext]`).
    pub template: String,

    /// Template token stripped before lookup and re-prepended afterwards.
    pub context_prefix: String,

    /// Digest algorithm for fingerprints.
    pub hash: HashAlgorithm,

    /// Manifest file written to the output root (relative path).
    pub manifest: Option<PathBuf>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            extensions: ["html", "jsp", "css", "js"].map(String::from).to_vec(),
            markup: ["html", "jsp"].map(String::from).to_vec(),
            exclude: vec![],
            cdn: None,
            template: NameTemplate::DEFAULT.into(),
            context_prefix: DEFAULT_CONTEXT_PREFIX.into(),
            hash: HashAlgorithm::default(),
            manifest: None,
        }
    }
}

impl RewriteConfig {
    pub const EXTENSIONS: FieldPath = FieldPath::new("rewrite.extensions");
    pub const MARKUP: FieldPath = FieldPath::new("rewrite.markup");
    pub const CDN: FieldPath = FieldPath::new("rewrite.cdn");
    pub const TEMPLATE: FieldPath = FieldPath::new("rewrite.template");
    pub const MANIFEST: FieldPath = FieldPath::new("rewrite.manifest");

    /// Markup extensions as a lookup set.
    pub fn markup_set(&self) -> FxHashSet<&str> {
        self.markup.iter().map(String::as_str).collect()
    }

    /// Whether a reference path is excluded from resolution.
    pub fn is_excluded(&self, reference: &str) -> bool {
        self.exclude
            .iter()
            .any(|needle| !needle.is_empty() && reference.contains(needle.as_str()))
    }

    /// Parsed name template.
    pub fn name_template(&self) -> NameTemplate {
        NameTemplate::new(&self.template)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.extensions.is_empty() {
            diag.error_with_hint(
                Self::EXTENSIONS,
                "no extensions to scan",
                "add at least one extension, e.g. `extensions = [\"html\", \"css\"]`",
            );
        }

        for ext in &self.markup {
            if !self.extensions.contains(ext) {
                diag.error_with_hint(
                    Self::MARKUP,
                    format!("markup extension `{ext}` is not listed in rewrite.extensions"),
                    "markup files are only rewritten when their extension is scanned",
                );
            }
        }

        if !self.template.contains(NameTemplate::HASH) {
            diag.error_with_hint(
                Self::TEMPLATE,
                format!("template `{}` has no `[hash]` placeholder", self.template),
                "without the hash the name never changes when content does",
            );
        }
        if self.template.starts_with(['?', '#']) || self.template.contains('/') {
            diag.error(
                Self::TEMPLATE,
                format!("template `{}` must produce a file name", self.template),
            );
        }

        if let Some(cdn) = &self.cdn
            && !crate::config::util::is_valid_cdn(cdn)
        {
            diag.error_with_hint(
                Self::CDN,
                format!("invalid cdn url `{cdn}`"),
                "use an absolute http(s) url or a protocol-relative `//host` prefix",
            );
        }

        if let Some(manifest) = &self.manifest
            && (manifest.is_absolute() || manifest.as_os_str().is_empty())
        {
            diag.error(
                Self::MANIFEST,
                "manifest must be a relative path inside the output directory",
            );
        }
    }

    pub fn template() -> &'static str {
        r#"[rewrite]
# Files scanned for references (case-sensitive)
extensions = ["html", "jsp", "css", "js"]
# Rewritten after stylesheets and scripts, minified as HTML
markup = ["html", "jsp"]
# References containing any of these substrings are left alone
exclude = []
# Prefix for rewritten root-relative references
# cdn = "https://cdn.example.com"
# Placeholders: [hash] [name] [ext]
template = "[hash][name].[ext]"
context_prefix = "${pageContext.request.contextPath}"
# md5 | blake3
hash = "md5"
# manifest = "fingerprint.json"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors_of(config: &RewriteConfig) -> Vec<FieldPath> {
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        diag.errors().iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_default_is_valid() {
        assert!(errors_of(&RewriteConfig::default()).is_empty());
    }

    #[test]
    fn test_is_excluded() {
        let config = RewriteConfig {
            exclude: vec!["/vendor/".into(), String::new()],
            ..RewriteConfig::default()
        };
        assert!(config.is_excluded("/js/vendor/jquery.js"));
        assert!(!config.is_excluded("/js/app.js"));
    }

    #[test]
    fn test_markup_must_be_scanned() {
        let config = RewriteConfig {
            extensions: vec!["css".into()],
            markup: vec!["html".into()],
            ..RewriteConfig::default()
        };
        assert_eq!(errors_of(&config), vec![RewriteConfig::MARKUP]);
    }

    #[test]
    fn test_template_without_hash() {
        let config = RewriteConfig {
            template: "[name].[ext]".into(),
            ..RewriteConfig::default()
        };
        assert_eq!(errors_of(&config), vec![RewriteConfig::TEMPLATE]);
    }

    #[test]
    fn test_query_template_is_valid() {
        let config = RewriteConfig {
            template: "[name].[ext]?hash=[hash]".into(),
            ..RewriteConfig::default()
        };
        assert!(errors_of(&config).is_empty());
    }

    #[test]
    fn test_invalid_cdn() {
        let config = RewriteConfig {
            cdn: Some("cdn.example.com".into()),
            ..RewriteConfig::default()
        };
        assert_eq!(errors_of(&config), vec![RewriteConfig::CDN]);
    }

    #[test]
    fn test_parse_section() {
        let config: RewriteConfig = toml::from_str(
            r#"
extensions = ["jsp", "css"]
markup = ["jsp"]
hash = "blake3"
cdn = "https://cdn.example.com"
"#,
        )
        .unwrap();
        assert_eq!(config.hash, HashAlgorithm::Blake3);
        assert_eq!(config.cdn.as_deref(), Some("https://cdn.example.com"));
        assert_eq!(config.template, "[hash][name].[ext]");
        assert!(config.markup_set().contains("jsp"));
    }
}

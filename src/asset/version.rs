//! Content-addressed naming for cache busting.
//!
//! A target name is built from a template with three placeholders:
//!
//! | Placeholder | Value                                   |
//! |-------------|-----------------------------------------|
//! | `[hash]`    | Full fingerprint of the file's bytes    |
//! | `[name]`    | File name without its extension         |
//! | `[ext]`     | Extension without the dot               |
//!
//! Any other bracketed token is kept verbatim, so templates can carry syntax
//! this tool does not resolve itself (`[name].[ext]?v=[hash][sv]`).
//!
//! Everything before the first `?` or `#` of the rendered template is the file
//! name on disk. The remainder only appears in rewritten references.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::kind::{base_name, extension};
use crate::utils::hash::Fingerprint;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<dot>\.)?\[(?P<key>[^\[\]]*)\]").expect("valid placeholder regex"));

/// Parsed target name template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate(String);

impl NameTemplate {
    pub const DEFAULT: &'static str = "[hash][name].[ext]";
    pub const HASH: &'static str = "[hash]";

    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Render the target name of `file_name` with the given fingerprint.
    ///
    /// When the file has no extension, a `.` right before `[ext]` is dropped
    /// along with the placeholder.
    pub fn render(&self, fingerprint: &Fingerprint, file_name: &str) -> TargetName {
        let name = base_name(file_name);
        let ext = extension(file_name);

        let rendered = PLACEHOLDER.replace_all(&self.0, |caps: &Captures<'_>| {
            let dot = caps.name("dot").map_or("", |m| m.as_str());
            match (&caps["key"], ext) {
                ("hash", _) => format!("{dot}{fingerprint}"),
                ("name", _) => format!("{dot}{name}"),
                ("ext", Some(ext)) => format!("{dot}{ext}"),
                ("ext", None) => String::new(),
                _ => caps[0].to_string(),
            }
        });
        TargetName(rendered.into_owned())
    }
}

impl Default for NameTemplate {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

/// Rendered target name: a file name plus an optional URL-only suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetName(String);

impl TargetName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part of the name stored on disk.
    pub fn file_name(&self) -> &str {
        self.split().0
    }

    /// URL-only remainder (`?hash=...`), empty for plain names.
    pub fn url_suffix(&self) -> &str {
        self.split().1
    }

    fn split(&self) -> (&str, &str) {
        match self.0.find(['?', '#']) {
            Some(idx) => self.0.split_at(idx),
            None => (&self.0, ""),
        }
    }
}

impl std::fmt::Display for TargetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

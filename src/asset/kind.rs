//! Asset classification and processing order.
//!
//! Candidate files are rewritten leaf-first so that a file's fingerprint is
//! computed over its already rewritten content:
//!
//! ```text
//! Other  →  Stylesheet  →  Script  →  Markup
//! (svg)     (url(...))     ("x.js")   (<link>, <img>, <c:url>)
//! ```
//!
//! This is a heuristic, not a dependency graph. A stylesheet referencing a
//! page, or a script referencing a stylesheet, is resolved against the
//! unrewritten source and reported by the pipeline.

use rustc_hash::FxHashSet;

/// Extension of a file name: the text after the last `.`.
///
/// Case is preserved and multi-dot names are not special-cased
/// (`app.min.js` yields `js`). Returns `None` for a name without a dot.
#[inline]
pub fn extension(file_name: &str) -> Option<&str> {
    file_name.rfind('.').map(|idx| &file_name[idx + 1..])
}

/// Base name without the extension (`app.min` for `app.min.js`).
#[inline]
pub fn base_name(file_name: &str) -> &str {
    file_name
        .rfind('.')
        .map_or(file_name, |idx| &file_name[..idx])
}

/// Kind of candidate file, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetKind {
    /// Scanned file that is neither markup, stylesheet nor script.
    Other,
    /// `.css`
    Stylesheet,
    /// `.js`
    Script,
    /// Extension listed in `rewrite.markup`.
    Markup,
}

impl AssetKind {
    /// Classify a file name against the configured markup extensions.
    ///
    /// Markup wins over the built-in kinds, so `markup = ["css"]` is honored.
    pub fn classify(file_name: &str, markup: &FxHashSet<&str>) -> Self {
        match extension(file_name) {
            Some(ext) if markup.contains(ext) => Self::Markup,
            Some("css") => Self::Stylesheet,
            Some("js") => Self::Script,
            _ => Self::Other,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Other => "other",
            Self::Stylesheet => "css",
            Self::Script => "js",
            Self::Markup => "markup",
        }
    }
}

/// Order candidates for rewriting.
///
/// Stable: files of the same kind keep their discovery order.
pub fn sort_for_processing<T>(
    candidates: &mut [T],
    markup: &FxHashSet<&str>,
    file_name: impl Fn(&T) -> &str,
) {
    candidates.sort_by_key(|c| AssetKind::classify(file_name(c), markup));
}

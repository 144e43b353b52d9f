//! Resource reference decomposition.

use std::fmt;

/// A reference path as written inside a file, split into its parts.
///
/// ```text
/// ${pageContext.request.contextPath}/css/site.css?v=2
/// └────────── context ─────────────┘└── path ───┘└suffix┘
/// ```
///
/// Equality only considers `path`: `/a.css?v=1` and `/a.css#top` name the
/// same resource.
#[derive(Debug, Clone, Copy)]
pub struct ResourceReference<'a> {
    /// Context-path placeholder stripped from the front, re-emitted verbatim.
    pub context: Option<&'a str>,
    pub path: &'a str,
    /// `?query` (with any fragment) or `#fragment`, including the delimiter.
    pub suffix: &'a str,
}

impl<'a> ResourceReference<'a> {
    /// Parse a raw reference.
    ///
    /// The suffix starts at the first `?`. Only a reference without a query is
    /// split at `#`, so `a.png#x?v=1` names the file `a.png#x`.
    pub fn parse(raw: &'a str, context_prefix: &str) -> Self {
        let (context, rest) = match raw.strip_prefix(context_prefix) {
            Some(rest) if !context_prefix.is_empty() => (Some(&raw[..context_prefix.len()]), rest),
            _ => (None, raw),
        };

        let (path, suffix) = match rest.find('?').or_else(|| rest.find('#')) {
            Some(idx) => rest.split_at(idx),
            None => (rest, ""),
        };

        Self {
            context,
            path,
            suffix,
        }
    }

    /// Root-relative (`/img/a.png`, also when behind the context placeholder).
    pub fn is_absolute(&self) -> bool {
        self.path.starts_with('/')
    }
}

impl PartialEq for ResourceReference<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for ResourceReference<'_> {}

impl fmt::Display for ResourceReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.context.unwrap_or(""), self.path, self.suffix)
    }
}

/// Attach a reference's query/fragment to a rendered URL suffix.
///
/// `?hash=1` + `?v=2` joins as `?hash=1&v=2`; everything else concatenates.
pub fn join_suffix(target: &str, reference: &str) -> String {
    match reference.strip_prefix('?') {
        Some(query) if target.starts_with('?') && !target.contains('#') => {
            format!("{target}&{query}")
        }
        _ => format!("{target}{reference}"),
    }
}

//! Reference patterns.
//!
//! Each pattern locates one kind of resource reference in raw text and splits
//! the match into three named groups:
//!
//! ```text
//! <link rel="stylesheet" href="/css/site.css" media="all">
//! └──────── prefix ─────────┘└── path ────┘└─ suffix ───┘
//! ```
//!
//! Only `path` is ever replaced. The markup is never parsed, so a pattern can
//! be swapped for a real tokenizer without touching resolution or caching.

use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

/// Kind of embedded reference, in pass order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefPattern {
    /// `<link ... href="REF" ...>`
    Link,
    /// Any quoted string ending in `.js`, including inline script blocks.
    Script,
    /// `<img ... src="REF" ...>`, skipping templated values containing `{`/`}`.
    Img,
    /// `url(REF)`, `url('REF')`, `url( "REF" )`.
    CssUrl,
    /// `<c:url value="/REF" ...>`, absolute values only.
    JstlUrl,
}

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?P<prefix><link\b[^>]*?\shref\s*=\s*["'])(?P<path>[^"']*?)(?P<suffix>["'][^>]*>)"#)
        .expect("valid link regex")
});

static SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<prefix>["'])(?P<path>[^\s"'<>]*?\.js)(?P<suffix>["'])"#)
        .expect("valid script regex")
});

static IMG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?P<prefix><img\b[^>]*?\ssrc\s*=\s*["'])(?P<path>[^"'{}<>]*?)(?P<suffix>["'][^>]*>)"#)
        .expect("valid img regex")
});

static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?P<prefix>url\(\s*["']?)(?P<path>[^"'()\s]+)(?P<suffix>["']?\s*\))"#)
        .expect("valid url() regex")
});

static JSTL_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<prefix><c:url\b[^>]*?\svalue\s*=\s*["'])(?P<path>/[^"']*?)(?P<suffix>["'][^>]*>)"#)
        .expect("valid c:url regex")
});

impl RefPattern {
    pub const ALL: [Self; 5] = [
        Self::Link,
        Self::Script,
        Self::Img,
        Self::CssUrl,
        Self::JstlUrl,
    ];

    fn regex(self) -> &'static Regex {
        match self {
            Self::Link => &LINK,
            Self::Script => &SCRIPT,
            Self::Img => &IMG,
            Self::CssUrl => &CSS_URL,
            Self::JstlUrl => &JSTL_URL,
        }
    }

    /// Lazily find every reference of this kind, left to right.
    pub fn matches(self, text: &str) -> impl Iterator<Item = RefMatch<'_>> {
        self.regex()
            .captures_iter(text)
            .map(|caps| RefMatch { caps })
    }

    /// Replace the path of every match, keeping all other text verbatim.
    ///
    /// The first error returned by `replace` aborts the pass.
    pub fn rewrite<E>(
        self,
        text: &str,
        mut replace: impl FnMut(&str) -> Result<Replacement, E>,
    ) -> Result<String, E> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for m in self.matches(text) {
            let span = m.span();
            out.push_str(&text[last..span.start]);

            let path = match replace(m.path())? {
                Replacement::Keep => m.path().to_string(),
                Replacement::Path(path) => path,
            };
            let template = format!("${{prefix}}{}${{suffix}}", escape_dollars(&path));
            m.caps.expand(&template, &mut out);

            last = span.end;
        }
        out.push_str(&text[last..]);
        Ok(out)
    }
}

/// Outcome of resolving one matched path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Leave the reference as written.
    Keep,
    /// Substitute this reference.
    Path(String),
}

/// One matched reference.
#[derive(Debug)]
pub struct RefMatch<'t> {
    caps: Captures<'t>,
}

impl<'t> RefMatch<'t> {
    /// Byte range of the whole match.
    pub fn span(&self) -> Range<usize> {
        self.caps.get(0).map_or(0..0, |m| m.range())
    }

    pub fn prefix(&self) -> &'t str {
        self.group("prefix")
    }

    pub fn path(&self) -> &'t str {
        self.group("path")
    }

    pub fn suffix(&self) -> &'t str {
        self.group("suffix")
    }

    fn group(&self, name: &str) -> &'t str {
        self.caps.name(name).map_or("", |m| m.as_str())
    }
}

/// Escape `$` so replacement-template expansion reproduces it literally.
fn escape_dollars(path: &str) -> String {
    path.replace('$', "$$")
}

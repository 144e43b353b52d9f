//! Per-file rewrite: pattern passes, minify decision, write.

use rustc_hash::FxHashSet;
use std::fs;
use std::path::Path;

use super::error::PipelineError;
use super::pattern::RefPattern;
use super::resolve::Resolver;
use super::state::RunState;
use crate::asset::{AssetKind, Minifier, SourceFile};
use crate::config::{FingerprintConfig, MinifyConfig};

pub struct Rewriter<'a, M> {
    resolver: Resolver<'a>,
    minify: &'a MinifyConfig,
    markup: FxHashSet<&'a str>,
    output: &'a Path,
    minifier: &'a M,
}

impl<'a, M: Minifier> Rewriter<'a, M> {
    pub fn new(config: &'a FingerprintConfig, minifier: &'a M) -> Self {
        Self {
            resolver: Resolver::new(config),
            minify: &config.minify,
            markup: config.rewrite.markup_set(),
            output: &config.paths.output,
            minifier,
        }
    }

    /// Rewrite one candidate into the output tree and mark it processed.
    pub fn process(&self, state: &mut RunState, file: &SourceFile) -> Result<(), PipelineError> {
        if state.is_resolved(&file.rel) {
            state.warn(format_args!(
                "{} was referenced before it was rewritten, its fingerprint covers the original content",
                file.rel
            ));
        }

        let bytes =
            fs::read(&file.path).map_err(|err| PipelineError::Read(file.path.clone(), err))?;
        let (mut text, encoding) = TextEncoding::decode(bytes);
        if encoding == TextEncoding::Latin1 {
            crate::debug!("rewrite"; "{} is not UTF-8, reading it as Latin-1", file.rel);
        }

        for pattern in RefPattern::ALL {
            text = pattern.rewrite(&text, |path| self.resolver.resolve(state, &file.rel, path))?;
        }

        let kind = AssetKind::classify(file.file_name(), &self.markup);
        let text = self.minify(state, file, kind, text);

        let to = self.output.join(&file.rel);
        fs::write(&to, encoding.encode(text)).map_err(|err| PipelineError::Write(to, err))?;
        state.mark_processed(file.rel.clone());

        crate::debug!("rewrite"; "{} ({})", file.rel, kind.name());
        Ok(())
    }

    /// Run at most one minifier, after rewriting.
    fn minify(&self, state: &mut RunState, file: &SourceFile, kind: AssetKind, text: String) -> String {
        let result = match kind {
            AssetKind::Markup if self.minify.html => self.minifier.minify_html(&text),
            AssetKind::Markup => return text,
            _ if file.file_name().contains(self.minify.marker.as_str()) => {
                crate::debug!("minify"; "{} is already minified", file.rel);
                return text;
            }
            AssetKind::Stylesheet if self.minify.css => self.minifier.minify_css(&text),
            AssetKind::Script if self.minify.js => self.minifier.minify_js(&text),
            _ => return text,
        };

        result.unwrap_or_else(|| {
            state.warn(format_args!("could not minify {}, keeping it unminified", file.rel));
            text
        })
    }
}

/// How a candidate's bytes were turned into text.
///
/// Latin-1 maps every byte to one char, so a page in a legacy charset
/// round-trips byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextEncoding {
    Utf8,
    Latin1,
}

impl TextEncoding {
    fn decode(bytes: Vec<u8>) -> (String, Self) {
        match String::from_utf8(bytes) {
            Ok(text) => (text, Self::Utf8),
            Err(err) => {
                let text = err.into_bytes().into_iter().map(char::from).collect();
                (text, Self::Latin1)
            }
        }
    }

    /// Chars outside Latin-1 can only come from inserted text; they are
    /// written as UTF-8.
    fn encode(self, text: String) -> Vec<u8> {
        match self {
            Self::Utf8 => text.into_bytes(),
            Self::Latin1 => {
                let mut out = Vec::with_capacity(text.len());
                for c in text.chars() {
                    match u8::try_from(c) {
                        Ok(byte) => out.push(byte),
                        Err(_) => out.extend_from_slice(c.encode_utf8(&mut [0; 4]).as_bytes()),
                    }
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::SourceTree;
    use tempfile::TempDir;

    /// Minifier that tags its output, to observe which one ran.
    struct Tagging;

    impl Minifier for Tagging {
        fn minify_html(&self, source: &str) -> Option<String> {
            Some(format!("html:{source}"))
        }
        fn minify_js(&self, source: &str) -> Option<String> {
            Some(format!("js:{source}"))
        }
        fn minify_css(&self, _source: &str) -> Option<String> {
            None
        }
    }

    fn setup(files: &[(&str, &str)]) -> (TempDir, FingerprintConfig) {
        let dir = TempDir::new().unwrap();
        let mut config = FingerprintConfig::default();
        config.paths.source = dir.path().join("web");
        config.paths.output = dir.path().join("out");
        for (rel, content) in files {
            let path = config.paths.source.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let tree = SourceTree::scan(&config.paths.source).unwrap();
        super::super::reconcile::mirror_dirs(&tree, &config.paths.output).unwrap();
        (dir, config)
    }

    fn file(config: &FingerprintConfig, rel: &str) -> SourceFile {
        SourceFile {
            path: config.paths.source.join(rel),
            rel: rel.into(),
        }
    }

    fn read_out(config: &FingerprintConfig, rel: &str) -> String {
        fs::read_to_string(config.paths.output.join(rel)).unwrap()
    }

    #[test]
    fn test_minify_decision() {
        let (_dir, config) = setup(&[
            ("index.html", "<p></p>"),
            ("js/app.js", "var a;"),
            ("js/lib.min.js", "var b;"),
            ("css/site.css", "a{}"),
        ]);
        let rewriter = Rewriter::new(&config, &Tagging);
        let mut state = RunState::new();

        for rel in ["index.html", "js/app.js", "js/lib.min.js", "css/site.css"] {
            rewriter.process(&mut state, &file(&config, rel)).unwrap();
        }

        assert_eq!(read_out(&config, "index.html"), "html:<p></p>");
        assert_eq!(read_out(&config, "js/app.js"), "js:var a;");
        assert_eq!(read_out(&config, "js/lib.min.js"), "var b;");
        // minifier failure keeps the text and warns
        assert_eq!(read_out(&config, "css/site.css"), "a{}");
        assert_eq!(state.warnings(), 1);
        assert_eq!(state.processed_count(), 4);
    }

    #[test]
    fn test_markup_never_uses_script_minifier() {
        let (_dir, mut config) = setup(&[("page.js.html", "<p></p>")]);
        config.minify.html = false;
        let rewriter = Rewriter::new(&config, &Tagging);
        let mut state = RunState::new();

        rewriter.process(&mut state, &file(&config, "page.js.html")).unwrap();
        assert_eq!(read_out(&config, "page.js.html"), "<p></p>");
    }

    #[test]
    fn test_all_passes_run_in_sequence() {
        let (_dir, mut config) = setup(&[
            ("css/site.css", "a{}"),
            ("js/app.js", "1"),
            ("img/a.png", "png"),
            ("img/b.png", "bpng"),
            (
                "index.jsp",
                r#"<link href="/css/site.css"><script src="<c:url value='/js/app.js'/>"></script>
<img src="/img/a.png"><div style="background:url(/img/b.png)"></div>"#,
            ),
        ]);
        config.minify.set_all(false);
        let rewriter = Rewriter::new(&config, &Tagging);
        let mut state = RunState::new();

        rewriter.process(&mut state, &file(&config, "index.jsp")).unwrap();
        let out = read_out(&config, "index.jsp");

        assert!(!out.contains("\"/css/site.css\""));
        assert!(!out.contains("'/js/app.js'"));
        assert!(!out.contains("\"/img/a.png\""));
        assert!(!out.contains("(/img/b.png)"));
        assert_eq!(state.moves().len(), 4);
        assert_eq!(state.warnings(), 0);
    }

    #[test]
    fn test_text_encoding_round_trip() {
        let bytes = b"<p>caf\xe9 \xff</p>".to_vec();
        let (text, encoding) = TextEncoding::decode(bytes.clone());
        assert_eq!(encoding, TextEncoding::Latin1);
        assert_eq!(text, "<p>caf\u{e9} \u{ff}</p>");
        assert_eq!(encoding.encode(text), bytes);

        let (text, encoding) = TextEncoding::decode("café".as_bytes().to_vec());
        assert_eq!(encoding, TextEncoding::Utf8);
        assert_eq!(encoding.encode(text), "café".as_bytes());
    }

    #[test]
    fn test_reversed_reference_warns() {
        let (_dir, mut config) = setup(&[("a.css", "b{}"), ("index.html", r#"<link href="/a.css">"#)]);
        config.minify.set_all(false);
        let rewriter = Rewriter::new(&config, &Tagging);
        let mut state = RunState::new();

        rewriter.process(&mut state, &file(&config, "index.html")).unwrap();
        rewriter.process(&mut state, &file(&config, "a.css")).unwrap();
        assert_eq!(state.warnings(), 1);
    }
}

//! Reference resolution: find the file, fingerprint it, name its target.
//!
//! Resolution only decides names. It records a [`PendingMove`] per resource
//! and never touches the output tree; the reconciler does that afterwards.
//!
//! [`PendingMove`]: super::state::PendingMove

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use std::borrow::Cow;
use std::path::Path;

use super::error::PipelineError;
use super::pattern::Replacement;
use super::reference::{ResourceReference, join_suffix};
use super::state::{Resolved, RunState};
use crate::asset::NameTemplate;
use crate::config::{FingerprintConfig, RewriteConfig};
use crate::utils::hash::Fingerprint;
use crate::utils::path::route::{is_external_link, resolve_relative, split_file_name};

/// Characters escaped in a rewritten file name.
const FILE_NAME: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub struct Resolver<'a> {
    source: &'a Path,
    output: &'a Path,
    rewrite: &'a RewriteConfig,
    template: NameTemplate,
    cdn: Option<&'a str>,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a FingerprintConfig) -> Self {
        Self {
            source: &config.paths.source,
            output: &config.paths.output,
            rewrite: &config.rewrite,
            template: config.rewrite.name_template(),
            cdn: config.rewrite.cdn.as_deref().map(|cdn| cdn.trim_end_matches('/')),
        }
    }

    /// Resolve one matched reference found in `referrer` (source-relative).
    ///
    /// Missing files and excluded paths yield [`Replacement::Keep`]; only
    /// a failure to read an existing file is an error.
    pub fn resolve(
        &self,
        state: &mut RunState,
        referrer: &str,
        raw: &str,
    ) -> Result<Replacement, PipelineError> {
        let reference = ResourceReference::parse(raw, &self.rewrite.context_prefix);

        if reference.path.is_empty()
            || is_external_link(reference.path)
            || state.is_produced(raw)
        {
            return Ok(Replacement::Keep);
        }
        if self.rewrite.is_excluded(raw) {
            crate::debug!("skip"; "excluded reference `{}` in {}", raw, referrer);
            return Ok(Replacement::Keep);
        }
        if !reference.is_absolute() {
            state.warn(format_args!(
                "relative reference `{reference}` in {referrer}, target will be relative too"
            ));
        }

        let decoded = percent_decode_str(reference.path)
            .decode_utf8()
            .unwrap_or(Cow::Borrowed(reference.path));
        let referrer_dir = split_file_name(referrer).0.trim_end_matches('/');

        let Some(source_rel) = resolve_relative(referrer_dir, &decoded) else {
            state.warn(format_args!(
                "resource file doesn't exist: `{raw}` in {referrer} points outside the source root"
            ));
            return Ok(Replacement::Keep);
        };

        let resolved = match state.cached(&source_rel).cloned() {
            Some(resolved) => resolved,
            None => match self.locate_and_name(state, &source_rel)? {
                Some(resolved) => {
                    crate::debug!("hash"; "{} -> {}", source_rel, resolved.target_rel);
                    state.insert(source_rel, resolved).clone()
                }
                None => {
                    state.warn(format_args!(
                        "resource file doesn't exist: `{raw}` in {referrer}"
                    ));
                    return Ok(Replacement::Keep);
                }
            },
        };

        let emitted = self.emit(&reference, &resolved);
        state.record_produced(emitted.clone());
        Ok(Replacement::Path(emitted))
    }

    /// Fingerprint the file at `source_rel` and name its target.
    ///
    /// Files already rewritten this run are hashed from their output copy.
    fn locate_and_name(
        &self,
        state: &RunState,
        source_rel: &str,
    ) -> Result<Option<Resolved>, PipelineError> {
        let path = if state.is_processed(source_rel) {
            self.output.join(source_rel)
        } else {
            self.source.join(source_rel)
        };
        if source_rel.is_empty() || !path.is_file() {
            return Ok(None);
        }

        let fingerprint = Fingerprint::of_file(self.rewrite.hash, &path)
            .map_err(|err| PipelineError::Read(path.clone(), err))?;

        let (dir, name) = split_file_name(source_rel);
        let target = self.template.render(&fingerprint, name);
        let target_rel = format!("{dir}{}", target.file_name());
        Ok(Some(Resolved { target, target_rel }))
    }

    /// Build the rewritten reference text.
    ///
    /// Keeps the reference's own directory spelling and swaps in the target
    /// file name, percent-encoded only when the reference was. Root-relative
    /// references get the CDN prefix when one is set.
    fn emit(&self, reference: &ResourceReference<'_>, resolved: &Resolved) -> String {
        let (dir, written) = split_file_name(reference.path);
        let name: Cow<'_, str> = if written.contains('%') {
            utf8_percent_encode(resolved.target.file_name(), FILE_NAME).into()
        } else {
            Cow::Borrowed(resolved.target.file_name())
        };

        let prefix = match self.cdn {
            Some(cdn) if reference.is_absolute() => cdn,
            _ => reference.context.unwrap_or(""),
        };
        let suffix = join_suffix(resolved.target.url_suffix(), reference.suffix);
        format!("{prefix}{dir}{name}{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        config: FingerprintConfig,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let mut config = FingerprintConfig::default();
        config.paths.source = dir.path().join("web");
        config.paths.output = dir.path().join("out");
        fs::create_dir_all(config.paths.source.join("img")).unwrap();
        fs::create_dir_all(config.paths.source.join("css")).unwrap();
        fs::write(config.paths.source.join("img/a.png"), b"png").unwrap();
        fs::write(config.paths.source.join("img/my logo.png"), b"logo").unwrap();
        Fixture { _dir: dir, config }
    }

    fn md5(data: &[u8]) -> String {
        Fingerprint::of_bytes(crate::utils::hash::HashAlgorithm::Md5, data).to_string()
    }

    fn path_of(replacement: Replacement) -> String {
        match replacement {
            Replacement::Path(path) => path,
            Replacement::Keep => panic!("expected a rewritten path"),
        }
    }

    #[test]
    fn test_resolve_absolute() {
        let fx = fixture();
        let resolver = Resolver::new(&fx.config);
        let mut state = RunState::new();

        let out = path_of(resolver.resolve(&mut state, "index.html", "/img/a.png").unwrap());
        assert_eq!(out, format!("/img/{}a.png", md5(b"png")));
        assert_eq!(state.moves().len(), 1);
        assert_eq!(state.moves()[0].target_rel, format!("img/{}a.png", md5(b"png")));
    }

    #[test]
    fn test_same_file_different_spelling_shares_target() {
        let fx = fixture();
        let resolver = Resolver::new(&fx.config);
        let mut state = RunState::new();

        let a = path_of(resolver.resolve(&mut state, "index.html", "/img/a.png").unwrap());
        let b = path_of(resolver.resolve(&mut state, "css/site.css", "../img/a.png").unwrap());
        assert_eq!(a, format!("/img/{}a.png", md5(b"png")));
        assert_eq!(b, format!("../img/{}a.png", md5(b"png")));
        assert_eq!(state.moves().len(), 1);
        // one relative-reference warning
        assert_eq!(state.warnings(), 1);
    }

    #[test]
    fn test_context_prefix_and_query_preserved() {
        let fx = fixture();
        let resolver = Resolver::new(&fx.config);
        let mut state = RunState::new();

        let raw = "${pageContext.request.contextPath}/img/a.png?v=3#x";
        let out = path_of(resolver.resolve(&mut state, "index.jsp", raw).unwrap());
        assert_eq!(
            out,
            format!("${{pageContext.request.contextPath}}/img/{}a.png?v=3#x", md5(b"png"))
        );
    }

    #[test]
    fn test_missing_resource_kept_with_warning() {
        let fx = fixture();
        let resolver = Resolver::new(&fx.config);
        let mut state = RunState::new();

        let out = resolver.resolve(&mut state, "index.html", "/img/none.png").unwrap();
        assert_eq!(out, Replacement::Keep);
        assert_eq!(state.warnings(), 1);
        assert!(state.moves().is_empty());

        let out = resolver.resolve(&mut state, "index.html", "../../etc/passwd").unwrap();
        assert_eq!(out, Replacement::Keep);
    }

    #[test]
    fn test_external_and_excluded_skipped() {
        let mut fx = fixture();
        fx.config.rewrite.exclude = vec!["/img/".into()];
        let resolver = Resolver::new(&fx.config);
        let mut state = RunState::new();

        for raw in ["https://example.com/a.js", "//cdn.x/a.js", "data:image/png;base64,AA", "/img/a.png"] {
            assert_eq!(resolver.resolve(&mut state, "index.html", raw).unwrap(), Replacement::Keep);
        }
        assert_eq!(state.warnings(), 0);
    }

    #[test]
    fn test_cdn_replaces_context_for_absolute_only() {
        let mut fx = fixture();
        fx.config.rewrite.cdn = Some("https://cdn.example.com/".into());
        let resolver = Resolver::new(&fx.config);
        let mut state = RunState::new();

        let out = path_of(
            resolver
                .resolve(&mut state, "index.jsp", "${pageContext.request.contextPath}/img/a.png")
                .unwrap(),
        );
        assert_eq!(out, format!("https://cdn.example.com/img/{}a.png", md5(b"png")));

        let out = path_of(resolver.resolve(&mut state, "css/site.css", "../img/a.png").unwrap());
        assert_eq!(out, format!("../img/{}a.png", md5(b"png")));
    }

    #[test]
    fn test_percent_encoded_name() {
        let fx = fixture();
        let resolver = Resolver::new(&fx.config);
        let mut state = RunState::new();

        let out = path_of(resolver.resolve(&mut state, "index.html", "/img/my%20logo.png").unwrap());
        assert_eq!(out, format!("/img/{}my%20logo.png", md5(b"logo")));
        assert_eq!(state.moves()[0].target_rel, format!("img/{}my logo.png", md5(b"logo")));
    }

    #[test]
    fn test_raw_utf8_name_keeps_spelling() {
        let fx = fixture();
        fs::write(fx.config.paths.source.join("img/café.png"), b"cafe").unwrap();
        let resolver = Resolver::new(&fx.config);
        let mut state = RunState::new();

        let out = path_of(resolver.resolve(&mut state, "index.html", "/img/café.png").unwrap());
        assert_eq!(out, format!("/img/{}café.png", md5(b"cafe")));

        let out = path_of(resolver.resolve(&mut state, "index.html", "/img/caf%C3%A9.png").unwrap());
        assert_eq!(out, format!("/img/{}caf%C3%A9.png", md5(b"cafe")));
        assert_eq!(state.moves().len(), 1);
    }

    #[test]
    fn test_fragment_before_query_is_part_of_path() {
        let fx = fixture();
        let resolver = Resolver::new(&fx.config);
        let mut state = RunState::new();

        let out = resolver.resolve(&mut state, "index.html", "/img/a.png#frag?q=1").unwrap();
        assert_eq!(out, Replacement::Keep);
        assert_eq!(state.warnings(), 1);
        assert!(state.moves().is_empty());
    }

    #[test]
    fn test_produced_reference_not_resolved_again() {
        let fx = fixture();
        let resolver = Resolver::new(&fx.config);
        let mut state = RunState::new();

        let out = path_of(resolver.resolve(&mut state, "index.html", "/img/a.png").unwrap());
        let again = resolver.resolve(&mut state, "index.html", &out).unwrap();
        assert_eq!(again, Replacement::Keep);
        assert_eq!(state.warnings(), 0);
    }

    #[test]
    fn test_query_template_joins_query() {
        let mut fx = fixture();
        fx.config.rewrite.template = "[name].[ext]?hash=[hash]".into();
        let resolver = Resolver::new(&fx.config);
        let mut state = RunState::new();

        let out = path_of(resolver.resolve(&mut state, "index.html", "/img/a.png?v=1").unwrap());
        assert_eq!(out, format!("/img/a.png?hash={}&v=1", md5(b"png")));
        assert!(state.moves()[0].is_noop());
    }

    #[test]
    fn test_processed_file_hashed_from_output() {
        let fx = fixture();
        let output = &fx.config.paths.output;
        fs::create_dir_all(output.join("css")).unwrap();
        fs::write(fx.config.paths.source.join("css/site.css"), b"source").unwrap();
        fs::write(output.join("css/site.css"), b"rewritten").unwrap();

        let resolver = Resolver::new(&fx.config);
        let mut state = RunState::new();
        state.mark_processed("css/site.css");

        let out = path_of(resolver.resolve(&mut state, "index.html", "/css/site.css").unwrap());
        assert_eq!(out, format!("/css/{}site.css", md5(b"rewritten")));
    }
}

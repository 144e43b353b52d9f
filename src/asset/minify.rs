//! Asset minification for markup, JS and CSS files.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. Markup is compacted with
//! a handful of whitespace rules, since pages may carry template syntax an
//! HTML parser would reject.

use regex::Regex;
use std::sync::LazyLock;

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier as OxcMinifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

/// Minification capability consumed by the pipeline.
///
/// `None` means the input could not be processed; the caller keeps the
/// unminified text.
pub trait Minifier {
    fn minify_html(&self, source: &str) -> Option<String>;
    fn minify_js(&self, source: &str) -> Option<String>;
    fn minify_css(&self, source: &str) -> Option<String>;
}

/// Built-in minifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetMinifier;

impl Minifier for AssetMinifier {
    fn minify_html(&self, source: &str) -> Option<String> {
        Some(minify_html(source))
    }

    fn minify_js(&self, source: &str) -> Option<String> {
        minify_js(source)
    }

    fn minify_css(&self, source: &str) -> Option<String> {
        minify_css(source)
    }
}

static INPUT_TYPE_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?P<tag><input\b[^>]*?)\s+type\s*=\s*["']text["']"#)
        .expect("valid input regex")
});

/// Blocks whose whitespace is significant.
static PRESERVED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<pre\b.*?</pre\s*>|<textarea\b.*?</textarea\s*>|<script\b.*?</script\s*>")
        .expect("valid block regex")
});

static INTER_TAG_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("valid whitespace regex"));

/// Compact markup.
///
/// - drops the redundant `type="text"` from `<input>` tags
/// - outside `<pre>`, `<textarea>` and `<script>` blocks, removes line
///   breaks and tabs and the whitespace between adjacent tags
pub fn minify_html(source: &str) -> String {
    let source = INPUT_TYPE_TEXT.replace_all(source, "$tag");

    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    for block in PRESERVED_BLOCK.find_iter(&source) {
        out.push_str(&compact(&source[last..block.start()]));
        out.push_str(block.as_str());
        last = block.end();
    }
    out.push_str(&compact(&source[last..]));

    out.trim().to_string()
}

fn compact(segment: &str) -> String {
    let collapsed = INTER_TAG_SPACE.replace_all(segment, "><");
    collapsed.replace(['\n', '\t', '\r'], "")
}

/// Minify JavaScript source code.
pub fn minify_js(source: &str) -> Option<String> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        return None;
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = OxcMinifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Some(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Option<String> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default()).ok()?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .ok()?;
    Some(result.code)
}

//! Pipeline configuration for `fingerprint.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── paths      # [paths]
//! │   ├── rewrite    # [rewrite]
//! │   └── minify     # [minify]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # FingerprintConfig (this file)
//! ```
//!
//! The config file is optional: without one, defaults apply and CLI flags
//! override them. Relative paths resolve against the config file's directory
//! (or the current directory when there is no file).

pub mod section;
pub mod types;
pub mod util;

use util::find_config_file;

pub use section::{DEFAULT_CONTEXT_PREFIX, MinifyConfig, PathsConfig, RewriteConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{BuildArgs, Cli, Commands},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing fingerprint.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FingerprintConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Source and output directories
    #[serde(default)]
    pub paths: PathsConfig,

    /// Reference scanning and naming
    #[serde(default)]
    pub rewrite: RewriteConfig,

    /// Minification toggles
    #[serde(default)]
    pub minify: MinifyConfig,

    /// Show a progress line while rewriting (CLI only)
    #[serde(skip)]
    pub progress: bool,
}

impl FingerprintConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. Its parent directory is
    /// the project root; without a config file the cwd is.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = Some(crate::utils::path::normalize_path(&path));
                config
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", cli.config.display());
                Self {
                    root: cwd.clone(),
                    ..Self::default()
                }
            }
        };

        config.root = crate::utils::path::normalize_path(&config.root);
        config.paths.normalize(&config.root);

        if let Commands::Build { build_args } = &cli.command {
            config.apply_build_args(build_args, &cwd);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply build arguments from CLI.
    ///
    /// CLI paths are relative to the current directory, not the project root.
    fn apply_build_args(&mut self, args: &BuildArgs, cwd: &Path) {
        crate::logger::set_verbose(args.verbose);
        self.progress = !args.verbose;

        if let Some(source) = &args.source {
            self.paths.source = crate::utils::path::expand_path(source, cwd);
        }
        if let Some(output) = &args.output {
            self.paths.output = crate::utils::path::expand_path(output, cwd);
        }
        self.paths.clean = args.clean;

        if let Some(enable) = args.minify {
            self.minify.set_all(enable);
        }
        if let Some(cdn) = &args.cdn {
            self.rewrite.cdn = Some(cdn.clone());
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.paths.validate(&mut diag);
        self.rewrite.validate(&mut diag);
        self.minify.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Commented default config for `fingerprint init`.
    pub fn template() -> String {
        let mut out = format!(
            "# fingerprint configuration file (v{})\n\n",
            env!("CARGO_PKG_VERSION")
        );
        for section in [
            PathsConfig::template(),
            RewriteConfig::template(),
            MinifyConfig::template(),
        ] {
            out.push_str(section);
            out.push('\n');
        }
        out
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::hash::HashAlgorithm;

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(FingerprintConfig::from_str("[paths\nsource = \"web\"").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = FingerprintConfig::default();
        assert!(config.config_path.is_none());
        assert_eq!(config.rewrite.template, "[hash][name].[ext]");
        assert_eq!(config.rewrite.hash, HashAlgorithm::Md5);
        assert!(config.minify.html);
        assert!(!config.progress);
    }

    #[test]
    fn test_partial_sections() {
        let config = FingerprintConfig::from_str(
            r#"
[paths]
source = "web"

[minify]
js = false
"#,
        )
        .unwrap();
        assert_eq!(config.paths.source, PathBuf::from("web"));
        assert_eq!(config.paths.output, PathBuf::from("target/optimized-webapp"));
        assert!(!config.minify.js);
        assert!(config.minify.css);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[paths]\nsource = \"web\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = FingerprintConfig::parse_with_ignored(content).unwrap();
        assert_eq!(config.paths.source, PathBuf::from("web"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_template_round_trips() {
        let (config, ignored) =
            FingerprintConfig::parse_with_ignored(&FingerprintConfig::template()).unwrap();
        assert!(ignored.is_empty(), "template has unknown fields: {ignored:?}");
        assert_eq!(config.rewrite.markup, vec!["html", "jsp"]);
        assert_eq!(config.rewrite.context_prefix, DEFAULT_CONTEXT_PREFIX);
    }

    #[test]
    fn test_apply_build_args() {
        let mut config = FingerprintConfig::default();
        let args = BuildArgs {
            source: Some("web".into()),
            minify: Some(false),
            cdn: Some("https://cdn.example.com".into()),
            clean: true,
            ..BuildArgs::default()
        };
        config.apply_build_args(&args, Path::new("/nonexistent/cwd"));

        assert_eq!(config.paths.source, PathBuf::from("/nonexistent/cwd/web"));
        assert!(config.paths.clean);
        assert!(!config.minify.html && !config.minify.js && !config.minify.css);
        assert_eq!(config.rewrite.cdn.as_deref(), Some("https://cdn.example.com"));
        assert!(config.progress);
    }

    #[test]
    fn test_validate_reports_all_sections() {
        let mut config = FingerprintConfig::default();
        config.paths.source = "/p/web".into();
        config.paths.output = "/p/web".into();
        config.rewrite.template = "[name].[ext]".into();

        let err = config.validate().unwrap_err();
        let Some(ConfigError::Diagnostics(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics");
        };
        assert_eq!(diag.len(), 2);
    }
}

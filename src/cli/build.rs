//! Build command: run the pipeline and report.

use anyhow::{Context, Result};

use crate::{
    asset::AssetMinifier,
    config::FingerprintConfig,
    log,
    pipeline::{Pipeline, RunReport},
    utils::plural_count,
};

/// Rewrite the source tree into the output tree.
pub fn build(config: &FingerprintConfig) -> Result<RunReport> {
    let paths = &config.paths;
    log!(
        "build";
        "{} -> {} ({})",
        paths.source.display(),
        paths.output.display(),
        config.rewrite.hash
    );

    let report = Pipeline::new(config, AssetMinifier)
        .run()
        .context("fingerprint build failed")?;

    if report.is_empty() {
        return Ok(report);
    }

    log!(
        "build";
        "rewrote {}, fingerprinted {} ({} moved), copied {}",
        plural_count(report.rewritten, "file"),
        plural_count(report.resources, "resource"),
        report.moved,
        plural_count(report.copied, "file")
    );
    if report.warnings > 0 {
        log!("warning"; "{}", plural_count(report.warnings, "warning"));
    }
    Ok(report)
}

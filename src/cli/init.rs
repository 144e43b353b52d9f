//! Init command: write a commented default `fingerprint.toml`.

use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

use crate::{config::FingerprintConfig, log};

/// Default config filename
pub const CONFIG_FILE: &str = "fingerprint.toml";

/// Write the config template into `dir`, creating it if needed.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn init(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !force {
        bail!(
            "{} already exists, use --force to overwrite",
            path.display()
        );
    }

    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    fs::write(&path, FingerprintConfig::template())
        .with_context(|| format!("failed to write {}", path.display()))?;

    log!("init"; "wrote {}", path.display());
    Ok(())
}

//! Hash command: print fingerprints without touching any tree.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::{asset::TargetName, config::FingerprintConfig, utils::hash::Fingerprint};

/// Fingerprint of one file and the name it would be renamed to.
#[derive(Debug)]
pub struct HashLine {
    pub path: PathBuf,
    pub fingerprint: Fingerprint,
    pub target: TargetName,
}

/// Fingerprint each file with the configured algorithm and template.
pub fn hash_files(config: &FingerprintConfig, files: &[PathBuf]) -> Result<Vec<HashLine>> {
    let template = config.rewrite.name_template();
    files
        .iter()
        .map(|path| {
            let fingerprint = Fingerprint::of_file(config.rewrite.hash, path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let target = template.render(&fingerprint, &file_name(path));
            Ok(HashLine {
                path: path.clone(),
                fingerprint,
                target,
            })
        })
        .collect()
}

/// Print `<fingerprint>  <path> -> <target>` per file.
pub fn print_hashes(config: &FingerprintConfig, files: &[PathBuf]) -> Result<()> {
    for line in hash_files(config, files)? {
        println!(
            "{}  {} -> {}",
            line.fingerprint,
            line.path.display(),
            line.target
        );
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_hash_files() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("site.css");
        fs::write(&file, "abc").unwrap();

        let lines = hash_files(&FingerprintConfig::default(), &[file]).unwrap();
        assert_eq!(lines[0].fingerprint.as_str(), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(
            lines[0].target.as_str(),
            "900150983cd24fb0d6963f7d28e17f72site.css"
        );
    }

    #[test]
    fn test_hash_missing_file() {
        let missing = PathBuf::from("/nonexistent/a.css");
        assert!(hash_files(&FingerprintConfig::default(), &[missing]).is_err());
    }
}

//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Check whether a CDN prefix can be prepended to a root-relative path.
///
/// Accepts absolute `http`/`https` URLs (parsed with the `url` crate) and
/// protocol-relative `//host` prefixes.
///
/// # Examples
/// ```ignore
/// is_valid_cdn("https://cdn.example.com")      -> true
/// is_valid_cdn("https://cdn.example.com/app")  -> true
/// is_valid_cdn("//cdn.example.com")            -> true
/// is_valid_cdn("cdn.example.com")              -> false
/// is_valid_cdn("ftp://cdn.example.com")        -> false
/// ```
pub fn is_valid_cdn(cdn: &str) -> bool {
    if let Some(rest) = cdn.strip_prefix("//") {
        return url::Url::parse(&format!("https://{rest}")).is_ok_and(|u| u.has_host());
    }
    url::Url::parse(cdn)
        .is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/webapp/src/main/  ← cwd
/// /home/user/webapp/fingerprint.toml  ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_valid_cdn() {
        assert!(is_valid_cdn("https://cdn.example.com"));
        assert!(is_valid_cdn("http://cdn.example.com:8080/static"));
        assert!(is_valid_cdn("//cdn.example.com"));
        assert!(!is_valid_cdn("cdn.example.com"));
        assert!(!is_valid_cdn("ftp://cdn.example.com"));
        assert!(!is_valid_cdn(""));
    }

    #[test]
    fn test_find_config_file_absolute() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("fingerprint.toml");
        fs::write(&config, "").unwrap();

        assert_eq!(find_config_file(&config), Some(config.clone()));
        assert_eq!(find_config_file(&dir.path().join("missing.toml")), None);
    }
}

//! Output tree reconciliation.
//!
//! ```text
//! before rewrite   clean (optional) → mirror directories
//! after rewrite    deep copy untouched files → apply pending moves → manifest
//! ```
//!
//! Directories are created up front, so neither the rewrite pass nor the copy
//! pass ever creates parents.

use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use super::error::PipelineError;
use super::state::{PendingMove, RunState};
use crate::asset::SourceTree;

/// Remove the output directory if it exists.
pub fn clean_output(output: &Path) -> Result<(), PipelineError> {
    if output.exists() {
        fs::remove_dir_all(output).map_err(|err| PipelineError::Clean(output.to_path_buf(), err))?;
        crate::debug!("clean"; "removed {}", output.display());
    }
    Ok(())
}

/// Create the output root and every source directory below it, top-down.
pub fn mirror_dirs(tree: &SourceTree, output: &Path) -> Result<(), PipelineError> {
    create_dir(output)?;
    for dir in &tree.dirs {
        create_dir(&output.join(dir))?;
    }
    Ok(())
}

fn create_dir(path: &Path) -> Result<(), PipelineError> {
    fs::create_dir_all(path).map_err(|err| PipelineError::CreateDir(path.to_path_buf(), err))
}

/// Copy every file that was not rewritten. Returns the number of files copied.
pub fn deep_copy(tree: &SourceTree, output: &Path, state: &RunState) -> Result<usize, PipelineError> {
    let mut copied = 0;
    for file in tree.files.iter().filter(|f| !state.is_processed(&f.rel)) {
        let to = output.join(&file.rel);
        fs::copy(&file.path, &to).map_err(|source| PipelineError::Copy {
            from: file.path.clone(),
            to: to.clone(),
            source,
        })?;
        crate::debug!("copy"; "{}", file.rel);
        copied += 1;
    }
    Ok(copied)
}

/// Rename each resolved file to its fingerprinted name.
///
/// A move is skipped when the name does not change or nothing sits at the
/// original path. An existing target (from an earlier run) is replaced.
/// Returns the number of files moved.
pub fn apply_moves(moves: &[PendingMove], output: &Path) -> Result<usize, PipelineError> {
    let mut moved = 0;
    for mv in moves.iter().filter(|mv| !mv.is_noop()) {
        let from = output.join(&mv.source_rel);
        if !from.is_file() {
            continue;
        }
        let to = output.join(&mv.target_rel);
        fs::rename(&from, &to).map_err(|source| PipelineError::Move {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;
        crate::debug!("move"; "{} -> {}", mv.source_rel, mv.target_rel);
        moved += 1;
    }
    Ok(moved)
}

/// Write `{ "source_rel": "target_rel", ... }` in resolution order.
pub fn write_manifest(moves: &[PendingMove], path: &Path) -> Result<(), PipelineError> {
    let map: Map<String, Value> = moves
        .iter()
        .map(|mv| (mv.source_rel.clone(), Value::String(mv.target_rel.clone())))
        .collect();

    let json = serde_json::to_string_pretty(&Value::Object(map))
        .map_err(|err| PipelineError::Manifest(path.to_path_buf(), err.into()))?;

    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    fs::write(path, json + "\n").map_err(|err| PipelineError::Manifest(path.to_path_buf(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mv(source_rel: &str, target_rel: &str) -> PendingMove {
        PendingMove {
            source_rel: source_rel.into(),
            target_rel: target_rel.into(),
        }
    }

    #[test]
    fn test_mirror_and_copy_skip_processed() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        let out = dir.path().join("out");
        fs::create_dir_all(src.join("a/b")).unwrap();
        fs::write(src.join("a/b/x.txt"), "x").unwrap();
        fs::write(src.join("index.html"), "source").unwrap();

        let tree = SourceTree::scan(&src).unwrap();
        mirror_dirs(&tree, &out).unwrap();
        assert!(out.join("a/b").is_dir());

        fs::write(out.join("index.html"), "rewritten").unwrap();
        let mut state = RunState::new();
        state.mark_processed("index.html");

        assert_eq!(deep_copy(&tree, &out, &state).unwrap(), 1);
        assert_eq!(fs::read_to_string(out.join("a/b/x.txt")).unwrap(), "x");
        assert_eq!(fs::read_to_string(out.join("index.html")).unwrap(), "rewritten");
    }

    #[test]
    fn test_apply_moves() {
        let dir = TempDir::new().unwrap();
        let out = dir.path();
        fs::create_dir_all(out.join("img")).unwrap();
        fs::write(out.join("img/a.png"), "new").unwrap();
        fs::write(out.join("img/1a.png"), "stale").unwrap();

        let moves = [
            mv("img/a.png", "img/1a.png"),
            mv("img/gone.png", "img/2gone.png"),
            mv("img/q.png", "img/q.png"),
        ];
        assert_eq!(apply_moves(&moves, out).unwrap(), 1);
        assert!(!out.join("img/a.png").exists());
        assert_eq!(fs::read_to_string(out.join("img/1a.png")).unwrap(), "new");
    }

    #[test]
    fn test_clean_output() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(out.join("old")).unwrap();
        clean_output(&out).unwrap();
        assert!(!out.exists());
        // missing directory is fine
        clean_output(&out).unwrap();
    }

    #[test]
    fn test_write_manifest_keeps_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("meta/fingerprint.json");
        let moves = [mv("css/z.css", "css/1z.css"), mv("css/a.css", "css/2a.css")];
        write_manifest(&moves, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.find("z.css").unwrap() < content.find("a.css").unwrap());
        let parsed: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["css/a.css"], "css/2a.css");
    }
}

//! Source tree scanning (pure, no side effects).

use jwalk::WalkDir;
use std::path::{Path, PathBuf};

use super::kind::extension;
use crate::pipeline::PipelineError;
use crate::utils::path::to_slash_relative;

/// A file discovered under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path in the source tree
    pub path: PathBuf,
    /// Source-relative path with `/` separators (`css/site.css`)
    pub rel: String,
}

impl SourceFile {
    /// File name component of the relative path.
    pub fn file_name(&self) -> &str {
        self.rel.rsplit('/').next().unwrap_or(&self.rel)
    }
}

/// Everything under the source root, split into directories and files.
///
/// Both lists are in sorted depth-first order, parents before children.
#[derive(Debug, Default)]
pub struct SourceTree {
    pub dirs: Vec<String>,
    pub files: Vec<SourceFile>,
}

impl SourceTree {
    /// Walk `root`, following symlinks.
    ///
    /// Any entry that cannot be read (including a directory whose listing
    /// fails, or a dangling symlink) aborts the walk with its path.
    pub fn scan(root: &Path) -> Result<Self, PipelineError> {
        let mut tree = Self::default();

        for entry in WalkDir::new(root).sort(true).skip_hidden(false).follow_links(true) {
            let mut entry = entry.map_err(|err| walk_error(root, err))?;
            if let Some(err) = entry.read_children_error.take() {
                return Err(walk_error(root, err));
            }
            if entry.depth() == 0 {
                continue;
            }
            let path = entry.path();
            let Some(rel) = to_slash_relative(&path, root) else {
                continue;
            };

            if entry.file_type().is_dir() {
                tree.dirs.push(rel);
            } else if entry.file_type().is_file() {
                tree.files.push(SourceFile { path, rel });
            }
        }

        Ok(tree)
    }

    /// Files whose extension is in `extensions` (case-sensitive), in discovery order.
    pub fn candidates(&self, extensions: &[String]) -> Vec<SourceFile> {
        self.files
            .iter()
            .filter(|file| {
                extension(file.file_name()).is_some_and(|ext| extensions.iter().any(|e| e == ext))
            })
            .cloned()
            .collect()
    }
}

fn walk_error(root: &Path, err: jwalk::Error) -> PipelineError {
    let path = err.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
    PipelineError::Read(path, err.into())
}

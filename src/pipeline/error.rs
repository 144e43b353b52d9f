//! Fatal pipeline errors.
//!
//! Anything here aborts the run. Missing resources and relative references are
//! warnings and never reach this type.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("source `{0}` is not a directory")]
    SourceNotDir(PathBuf),

    #[error("output `{0}` exists and is not a directory")]
    OutputNotDir(PathBuf),

    #[error("failed to create directory `{0}`")]
    CreateDir(PathBuf, #[source] io::Error),

    #[error("failed to read `{0}`")]
    Read(PathBuf, #[source] io::Error),

    #[error("failed to write `{0}`")]
    Write(PathBuf, #[source] io::Error),

    #[error("failed to copy `{from}` to `{to}`")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to move `{from}` to `{to}`")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to clean output directory `{0}`")]
    Clean(PathBuf, #[source] io::Error),

    #[error("failed to write manifest `{0}`")]
    Manifest(PathBuf, #[source] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_names_path_and_cause() {
        let err = PipelineError::Read(
            PathBuf::from("/w/css/site.css"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/w/css/site.css"));
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("denied"));
    }

    #[test]
    fn test_move_error_names_both_paths() {
        let err = PipelineError::Move {
            from: PathBuf::from("out/a.png"),
            to: PathBuf::from("out/123a.png"),
            source: io::Error::other("busy"),
        };
        let display = err.to_string();
        assert!(display.contains("out/a.png") && display.contains("out/123a.png"));
    }
}

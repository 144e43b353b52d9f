//! Fingerprinting pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  discover   SourceTree::scan → candidates → sort         │
//! ├──────────────────────────────────────────────────────────┤
//! │  prepare    clean (optional) → mirror directories        │
//! ├──────────────────────────────────────────────────────────┤
//! │  rewrite    per candidate, in order:                     │
//! │             link → script → img → css-url → jstl-url     │
//! │             → minify → write → mark processed            │
//! ├──────────────────────────────────────────────────────────┤
//! │  reconcile  deep copy → pending moves → manifest         │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Resolution and placement are two phases: resolving a reference only
//! fixes its target name and queues a move. Files reach their fingerprinted
//! path in the reconcile phase, after every reference is known.

mod error;
mod pattern;
mod reconcile;
mod reference;
mod resolve;
mod rewrite;
mod state;


pub use error::PipelineError;
pub use state::PendingMove;

use crate::asset::{Minifier, SourceTree, sort_for_processing};
use crate::config::FingerprintConfig;
use crate::logger::ProgressLine;
use rewrite::Rewriter;
use state::RunState;

/// Summary of one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Candidate files rewritten.
    pub rewritten: usize,
    /// Distinct resources fingerprinted.
    pub resources: usize,
    /// Files copied verbatim.
    pub copied: usize,
    /// Files renamed to their fingerprinted name.
    pub moved: usize,
    pub warnings: usize,
    /// Resolved source path → target path, in resolution order.
    pub moves: Vec<PendingMove>,
}

impl RunReport {
    /// Nothing to do: no candidate files were found.
    pub fn is_empty(&self) -> bool {
        self.rewritten == 0
    }
}

/// One pipeline run over a source tree.
pub struct Pipeline<'a, M> {
    config: &'a FingerprintConfig,
    minifier: M,
}

impl<'a, M: Minifier> Pipeline<'a, M> {
    pub fn new(config: &'a FingerprintConfig, minifier: M) -> Self {
        Self { config, minifier }
    }

    pub fn run(&self) -> Result<RunReport, PipelineError> {
        let paths = &self.config.paths;
        let rewrite = &self.config.rewrite;

        if !paths.source.is_dir() {
            return Err(PipelineError::SourceNotDir(paths.source.clone()));
        }
        if paths.output.exists() && !paths.output.is_dir() {
            return Err(PipelineError::OutputNotDir(paths.output.clone()));
        }

        let tree = SourceTree::scan(&paths.source)?;
        let mut candidates = tree.candidates(&rewrite.extensions);
        if candidates.is_empty() {
            crate::log!("build"; "no files matching {:?} in {}", rewrite.extensions, paths.source.display());
            return Ok(RunReport::default());
        }
        sort_for_processing(&mut candidates, &rewrite.markup_set(), |f| f.file_name());

        if paths.clean {
            reconcile::clean_output(&paths.output)?;
        }
        reconcile::mirror_dirs(&tree, &paths.output)?;

        let mut state = RunState::new();
        let rewriter = Rewriter::new(self.config, &self.minifier);
        let progress = self
            .config
            .progress
            .then(|| ProgressLine::new("rewrite", candidates.len()));

        for file in &candidates {
            rewriter.process(&mut state, file)?;
            if let Some(progress) = &progress {
                progress.inc();
            }
        }
        if let Some(progress) = progress {
            progress.finish();
        }

        let copied = reconcile::deep_copy(&tree, &paths.output, &state)?;
        let moved = reconcile::apply_moves(state.moves(), &paths.output)?;

        if let Some(manifest) = &rewrite.manifest {
            let path = paths.output.join(manifest);
            reconcile::write_manifest(state.moves(), &path)?;
            crate::debug!("build"; "manifest written to {}", path.display());
        }

        Ok(RunReport {
            rewritten: state.processed_count(),
            resources: state.moves().len(),
            copied,
            moved,
            warnings: state.warnings(),
            moves: state.moves().to_vec(),
        })
    }
}

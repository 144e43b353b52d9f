//! Per-run pipeline state.
//!
//! Owned by one [`Pipeline`](super::Pipeline) run and dropped with it, so
//! repeated runs in one process never share a cache.

use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

use crate::asset::TargetName;

/// A resolved resource: where it is and where it has to end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Rendered target name, including any URL-only suffix.
    pub target: TargetName,
    /// Source-relative path of the fingerprinted file.
    pub target_rel: String,
}

/// Deferred rename inside the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub source_rel: String,
    pub target_rel: String,
}

impl PendingMove {
    /// Whether the file keeps its name (query-only templates).
    pub fn is_noop(&self) -> bool {
        self.source_rel == self.target_rel
    }
}

#[derive(Debug, Default)]
pub struct RunState {
    /// Resolved source-relative path → target. One entry per resource.
    cache: FxHashMap<String, Resolved>,
    /// Candidates already rewritten into the output tree.
    processed: FxHashSet<String>,
    /// One per cache entry, in resolution order.
    moves: Vec<PendingMove>,
    /// Rewritten references this run emitted, as written into files.
    produced: FxHashSet<String>,
    warnings: usize,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached(&self, source_rel: &str) -> Option<&Resolved> {
        self.cache.get(source_rel)
    }

    /// Record a first resolution and queue its move.
    ///
    /// A path already in the cache keeps its first target.
    pub fn insert(&mut self, source_rel: String, resolved: Resolved) -> &Resolved {
        self.cache.entry(source_rel).or_insert_with_key(|source_rel| {
            self.moves.push(PendingMove {
                source_rel: source_rel.clone(),
                target_rel: resolved.target_rel.clone(),
            });
            resolved
        })
    }

    pub fn is_resolved(&self, source_rel: &str) -> bool {
        self.cache.contains_key(source_rel)
    }

    pub fn mark_processed(&mut self, source_rel: impl Into<String>) {
        self.processed.insert(source_rel.into());
    }

    pub fn is_processed(&self, source_rel: &str) -> bool {
        self.processed.contains(source_rel)
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    pub fn record_produced(&mut self, reference: String) {
        self.produced.insert(reference);
    }

    pub fn is_produced(&self, reference: &str) -> bool {
        self.produced.contains(reference)
    }

    pub fn moves(&self) -> &[PendingMove] {
        &self.moves
    }

    /// Log a non-fatal diagnostic and count it.
    pub fn warn(&mut self, message: fmt::Arguments<'_>) {
        self.warnings += 1;
        crate::warn!("{message}");
    }

    pub fn warnings(&self) -> usize {
        self.warnings
    }
}

//! Training progress logging.
//!
//! [`TrainingLogger`] filters by [`Verbosity`] and emits `tracing` events, so
//! output goes wherever the application's subscriber sends it.

use std::time::Instant;

use super::BuildStats;

/// How much the trainer reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Only degenerate-data warnings.
    Warning,
    /// Start and finish summaries.
    Info,
    /// Per-tree statistics.
    Debug,
}

/// Verbosity-gated logger for one training run.
#[derive(Debug)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    started: Option<Instant>,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            started: None,
        }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[inline]
    fn enabled(&self, level: Verbosity) -> bool {
        self.verbosity >= level
    }

    /// Free-form message at `Info`.
    pub fn info(&self, message: &str) {
        if self.enabled(Verbosity::Info) {
            tracing::info!("{message}");
        }
    }

    /// Free-form message at `Warning`.
    pub fn warn(&self, message: &str) {
        if self.enabled(Verbosity::Warning) {
            tracing::warn!("{message}");
        }
    }

    pub fn start_training(&mut self, num_trees: usize, num_rows: usize, num_features: usize) {
        self.started = Some(Instant::now());
        if self.enabled(Verbosity::Info) {
            tracing::info!(num_trees, num_rows, num_features, "training random binary forest");
        }
    }

    pub fn log_tree(&self, tree: usize, stats: &BuildStats) {
        if self.enabled(Verbosity::Debug) {
            tracing::debug!(
                tree,
                internal_nodes = stats.internal_nodes,
                leaves = stats.leaves,
                max_depth = stats.max_depth,
                largest_leaf = stats.largest_leaf,
                forced_leaves = stats.forced_leaves,
                vote_fallbacks = stats.vote_fallbacks,
                "tree built"
            );
        }
    }

    /// Warn about leaves that could not be split because their rows are identical.
    pub fn log_forced_leaves(&self, forced_leaves: usize, num_trees: usize) {
        if forced_leaves > 0 && self.enabled(Verbosity::Warning) {
            tracing::warn!(
                forced_leaves,
                num_trees,
                "duplicate rows kept together in oversized leaves"
            );
        }
    }

    pub fn finish_training(&mut self, total_nodes: usize) {
        let elapsed = self.started.take().map(|t| t.elapsed());
        if self.enabled(Verbosity::Info) {
            let elapsed_ms = elapsed.map_or(0, |d| d.as_millis());
            tracing::info!(total_nodes, elapsed_ms, "training finished");
        }
    }
}

//! Feature sampling for node rules.
//!
//! Each internal node draws `num_features_to_compare` distinct features. If
//! every drawn feature is constant over the node's rows, further batches are
//! drawn from the features not yet tried, so a node only becomes degenerate
//! once every feature has been ruled out.

use rand::Rng;

/// Golden-ratio increment used to spread per-tree seeds.
const SEED_MIX: u64 = 0x9E3779B97F4A7C15;

/// Seed of tree `tree_idx` derived from the forest seed.
///
/// Depends only on the pair, so trees are identical however they are
/// scheduled across threads.
#[inline]
pub fn tree_seed(seed: u64, tree_idx: usize) -> u64 {
    seed.wrapping_add((tree_idx as u64).wrapping_mul(SEED_MIX))
}

/// Draws batches of distinct features by partial Fisher-Yates.
///
/// The pool is reshuffled lazily: a batch swaps `k` uniformly chosen
/// untried features to the front of the untried region.
#[derive(Debug, Clone)]
pub struct FeatureSampler {
    pool: Vec<u32>,
    drawn: usize,
    batch_size: usize,
}

impl FeatureSampler {
    /// # Panics
    ///
    /// Panics if `batch_size` is 0.
    pub fn new(num_features: usize, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");
        Self {
            pool: (0..num_features as u32).collect(),
            drawn: 0,
            batch_size,
        }
    }

    /// Start a new node: every feature is untried again.
    #[inline]
    pub fn reset(&mut self) {
        self.drawn = 0;
    }

    /// Features not yet drawn for the current node.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.pool.len() - self.drawn
    }

    /// Draw the next batch, or `None` once every feature has been drawn.
    ///
    /// The last batch may be shorter than `batch_size`.
    pub fn next_batch<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&[u32]> {
        let n = self.pool.len();
        if self.drawn >= n {
            return None;
        }
        let start = self.drawn;
        let end = (start + self.batch_size).min(n);
        for i in start..end {
            let j = rng.gen_range(i..n);
            self.pool.swap(i, j);
        }
        self.drawn = end;
        Some(&self.pool[start..end])
    }
}

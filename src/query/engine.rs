//! Query engine: per-tree traversal, aggregation and batch fan-out.

use super::results::{DedupResults, ForestResults, Neighbor};
use super::traversal::leaf_rows_for;
use crate::data::{checked_len, DataError};
use crate::distance::rerank;
use crate::repr::{ForestView, RandomBinaryForest};
use crate::training::Parallelism;

/// Batches smaller than this per thread run sequentially.
const MIN_QUERIES_PER_THREAD: usize = 16;

/// Errors raised by malformed query input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("query has {got} features, forest expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("batch holds {got} values, expected {expected} (num_queries x num_features)")]
    BatchLengthMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Data(#[from] DataError),
}

/// Answers candidate queries against any [`ForestView`].
///
/// Single queries run on the calling thread. Batch queries fan out over rayon
/// according to the parallelism hint and return results in input order.
///
/// # Example
///
/// ```
/// use rbforest::data::FeatureStore;
/// use rbforest::query::QueryEngine;
/// use rbforest::{ForestTrainer, RbfConfig};
///
/// let store = FeatureStore::from_row_major(&[0, 0, 0, 1, 10, 10, 10, 11], 4, 2).unwrap();
/// let config = RbfConfig::builder()
///     .num_rows(4)
///     .num_features(2)
///     .num_features_to_compare(2)
///     .num_trees(5)
///     .tree_depth(3)
///     .leaf_size(1)
///     .build()
///     .unwrap();
/// let forest = ForestTrainer::new(config).train(store).unwrap();
///
/// let engine = QueryEngine::new(&forest);
/// let dedup = engine.query_dedup(&[10, 10]).unwrap();
/// assert!(dedup.contains(2));
/// assert!(!dedup.contains(0) && !dedup.contains(1));
/// ```
#[derive(Debug)]
pub struct QueryEngine<'f, F: ForestView> {
    forest: &'f F,
    parallelism: Parallelism,
}

impl<'f, F: ForestView> QueryEngine<'f, F> {
    /// Engine that runs batches sequentially.
    pub fn new(forest: &'f F) -> Self {
        Self {
            forest,
            parallelism: Parallelism::Sequential,
        }
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    #[inline]
    pub fn forest(&self) -> &'f F {
        self.forest
    }

    #[inline]
    pub fn parallelism(&self) -> Parallelism {
        self.parallelism
    }

    // ------------------------------------------------------------------
    // Single queries
    // ------------------------------------------------------------------

    /// Candidates of every tree, in tree order.
    pub fn query_all(&self, point: &[u8]) -> Result<ForestResults, QueryError> {
        self.check_point(point)?;
        Ok(self.collect(point))
    }

    /// Union of all trees' candidates in first-seen order.
    pub fn query_dedup(&self, point: &[u8]) -> Result<DedupResults, QueryError> {
        self.check_point(point)?;
        Ok(self.collect(point).dedup())
    }

    /// Deduplicated candidates ranked by exact distance, truncated to `k`.
    pub fn query_nearest(&self, point: &[u8], k: Option<usize>) -> Result<Vec<Neighbor>, QueryError> {
        self.check_point(point)?;
        Ok(self.nearest(point, k)?)
    }

    // ------------------------------------------------------------------
    // Batch queries
    // ------------------------------------------------------------------

    /// [`query_all`](Self::query_all) for each row of a row-major batch.
    pub fn batch_query_all(&self, points: &[u8], num_queries: usize) -> Result<Vec<ForestResults>, QueryError> {
        self.run_batch(points, num_queries, |point| self.collect(point))
    }

    /// [`query_dedup`](Self::query_dedup) for each row of a row-major batch.
    pub fn batch_query_dedup(&self, points: &[u8], num_queries: usize) -> Result<Vec<DedupResults>, QueryError> {
        self.run_batch(points, num_queries, |point| self.collect(point).dedup())
    }

    /// [`query_nearest`](Self::query_nearest) for each row of a row-major batch.
    pub fn batch_query_nearest(
        &self,
        points: &[u8],
        num_queries: usize,
        k: Option<usize>,
    ) -> Result<Vec<Vec<Neighbor>>, QueryError> {
        self.run_batch(points, num_queries, |point| self.nearest(point, k))?
            .into_iter()
            .collect::<Result<_, _>>()
            .map_err(QueryError::from)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn check_point(&self, point: &[u8]) -> Result<(), QueryError> {
        let expected = self.forest.num_features();
        if point.len() != expected {
            return Err(QueryError::DimensionMismatch {
                expected,
                got: point.len(),
            });
        }
        Ok(())
    }

    fn collect(&self, point: &[u8]) -> ForestResults {
        let n_trees = self.forest.n_trees();
        let mut results = ForestResults::with_capacity(n_trees, 0);
        for t in 0..n_trees {
            results.push_tree(leaf_rows_for(self.forest.tree(t), point));
        }
        results
    }

    fn nearest(&self, point: &[u8], k: Option<usize>) -> Result<Vec<Neighbor>, DataError> {
        let dedup = self.collect(point).dedup();
        rerank(self.forest.reference(), point, dedup.rows(), k)
    }

    fn run_batch<T, Q>(&self, points: &[u8], num_queries: usize, query: Q) -> Result<Vec<T>, QueryError>
    where
        T: Send,
        Q: Fn(&[u8]) -> T + Sync + Send,
    {
        let dim = self.forest.num_features();
        let expected = checked_len(num_queries, dim)?;
        if points.len() != expected {
            return Err(QueryError::BatchLengthMismatch {
                expected,
                got: points.len(),
            });
        }
        let parallelism = self
            .parallelism
            .correct_for_workload(num_queries, MIN_QUERIES_PER_THREAD);
        Ok(parallelism.maybe_par_map(num_queries, |i| query(&points[i * dim..(i + 1) * dim])))
    }
}

impl RandomBinaryForest {
    /// Query engine using the forest's configured parallelism.
    pub fn query_engine(&self) -> QueryEngine<'_, Self> {
        QueryEngine::new(self).with_parallelism(self.config().parallelism())
    }
}

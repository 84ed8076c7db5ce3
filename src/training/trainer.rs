//! Forest training: validate, then build every tree.

use std::sync::Arc;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use super::builder::{BuildStats, TreeBuilder, TreeParams};
use super::logger::TrainingLogger;
use super::parallelism::run_with_threads;
use super::sampling::tree_seed;
use crate::config::{ConfigError, RbfConfig};
use crate::data::{DataError, FeatureStore};
use crate::repr::{RandomBinaryForest, RandomBinaryTree};

/// Errors raised before any tree is built.
#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid feature data: {0}")]
    Data(#[from] DataError),

    #[error("store is {rows}x{features}, config expects {expected_rows}x{expected_features}")]
    StoreShapeMismatch {
        rows: usize,
        features: usize,
        expected_rows: usize,
        expected_features: usize,
    },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Trains a [`RandomBinaryForest`] from an [`RbfConfig`].
///
/// Tree `i` is built from its own generator seeded with
/// `tree_seed(config.seed, i)`, so the result does not depend on `n_threads`.
///
/// # Example
///
/// ```
/// use rbforest::data::FeatureStore;
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
/// assert_eq!(forest.n_trees(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct ForestTrainer {
    config: RbfConfig,
}

impl ForestTrainer {
    pub fn new(config: RbfConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &RbfConfig {
        &self.config
    }

    /// Train a forest over `store`.
    ///
    /// # Errors
    ///
    /// Fails without building anything if the config is invalid, disagrees
    /// with the store's shape, or a dedicated thread pool cannot be created.
    pub fn train(&self, store: impl Into<Arc<FeatureStore>>) -> Result<RandomBinaryForest, TrainError> {
        let store = store.into();
        self.check(&store)?;

        let config = &self.config;
        let mut logger = TrainingLogger::new(config.verbosity);
        logger.start_training(config.num_trees, store.num_rows(), store.num_features());

        let built: Vec<(RandomBinaryTree, BuildStats)> = run_with_threads(config.n_threads, |parallelism| {
            parallelism
                .correct_for_workload(config.num_trees, 1)
                .maybe_par_map(config.num_trees, |idx| self.build_tree(&store, idx))
        })?;

        let mut trees = Vec::with_capacity(built.len());
        let mut forced_leaves = 0;
        for (idx, (tree, stats)) in built.into_iter().enumerate() {
            logger.log_tree(idx, &stats);
            forced_leaves += stats.forced_leaves;
            trees.push(tree);
        }
        logger.log_forced_leaves(forced_leaves, config.num_trees);

        let forest = RandomBinaryForest::new(config.clone(), trees, store);
        logger.finish_training(forest.total_nodes());
        Ok(forest)
    }

    fn check(&self, store: &FeatureStore) -> Result<(), TrainError> {
        self.config.validate()?;
        let (rows, features) = (store.num_rows(), store.num_features());
        if rows != self.config.num_rows || features != self.config.num_features {
            return Err(TrainError::StoreShapeMismatch {
                rows,
                features,
                expected_rows: self.config.num_rows,
                expected_features: self.config.num_features,
            });
        }
        Ok(())
    }

    fn build_tree(&self, store: &FeatureStore, idx: usize) -> (RandomBinaryTree, BuildStats) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(tree_seed(self.config.seed, idx));
        TreeBuilder::new(store, TreeParams::from(&self.config)).build(&mut rng)
    }
}

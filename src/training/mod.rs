//! Forest construction.
//!
//! - [`ForestTrainer`]: validates the config and builds every tree
//! - [`TreeBuilder`]: builds one tree from an injected RNG
//! - [`SplitFinder`] / [`FeatureHistogram`]: derive a node's rule
//! - [`RowPartitioner`]: in-place partitioning of the row index
//! - [`FeatureSampler`]: distinct feature batches per node
//! - [`Parallelism`]: thread hint for the per-tree fan-out
//! - [`TrainingLogger`]: verbosity-gated progress events

mod builder;
mod logger;
mod parallelism;
mod partition;
mod sampling;
mod split;
mod trainer;

pub use builder::{BuildStats, TreeBuilder, TreeParams};
pub use logger::{TrainingLogger, Verbosity};
pub use parallelism::{run_with_threads, Parallelism};
pub use partition::RowPartitioner;
pub use sampling::{tree_seed, FeatureSampler};
pub use split::{FeatureHistogram, FeatureSplit, NodeSplit, SplitFinder, SplitStrategy, NUM_BINS};
pub use trainer::{ForestTrainer, TrainError};

//! Forest configuration with builder pattern.
//!
//! [`RbfConfig`] holds every parameter of a training run. It is built with the
//! `bon` builder and validated once in [`build`](RbfConfigBuilder::build), so a
//! config that exists is always usable.
//!
//! # Example
//!
//! ```
//! use rbforest::RbfConfig;
//!
//! let config = RbfConfig::builder()
//!     .num_rows(1_000)
//!     .num_features(64)
//!     .num_features_to_compare(8)
//!     .num_trees(10)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.leaf_size, 8);
//!
//! // num_features_to_compare may not exceed num_features
//! let err = RbfConfig::builder()
//!     .num_rows(10)
//!     .num_features(4)
//!     .num_features_to_compare(5)
//!     .build();
//! assert!(err.is_err());
//! ```

use bon::Builder;

use crate::training::{Parallelism, SplitStrategy, Verbosity};

/// Errors raised when validating an [`RbfConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("num_trees must be at least 1")]
    ZeroTrees,

    #[error("tree_depth must be at least 1")]
    ZeroDepth,

    #[error("leaf_size must be at least 1")]
    ZeroLeafSize,

    #[error("num_rows must be at least 1")]
    ZeroRows,

    #[error("num_features must be at least 1")]
    ZeroFeatures,

    #[error("num_features_to_compare must be in [1, {num_features}], got {value}")]
    FeaturesToCompareOutOfRange { value: usize, num_features: usize },
}

/// Configuration of a random binary forest.
///
/// Shape fields (`num_rows`, `num_features`) describe the dataset the forest
/// is trained on and are checked against the feature store at training time.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(derive(Clone, Debug), finish_fn(vis = "", name = __build_internal))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RbfConfig {
    /// Number of trees in the forest. Default: 20.
    #[builder(default = 20)]
    pub num_trees: usize,

    /// Maximum depth of a leaf; the root is at depth 0. Default: 16.
    #[builder(default = 16)]
    pub tree_depth: usize,

    /// Nodes with at most this many rows become leaves. Default: 8.
    #[builder(default = 8)]
    pub leaf_size: usize,

    /// Number of records in the dataset.
    pub num_rows: usize,

    /// Width of every record.
    pub num_features: usize,

    /// Features sampled per internal node.
    pub num_features_to_compare: usize,

    /// Base seed; each tree derives its own stream from it. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,

    /// How a node's rule is derived from the sampled features.
    #[builder(default)]
    #[cfg_attr(feature = "serde", serde(default))]
    pub split_strategy: SplitStrategy,

    /// Worker threads: 0 uses the global rayon pool, 1 builds sequentially.
    #[builder(default)]
    #[cfg_attr(feature = "serde", serde(default))]
    pub n_threads: usize,

    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    #[cfg_attr(feature = "serde", serde(default))]
    pub verbosity: Verbosity,
}

impl<S: rbf_config_builder::IsComplete> RbfConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any count is zero or
    /// `num_features_to_compare` falls outside `[1, num_features]`.
    pub fn build(self) -> Result<RbfConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl RbfConfig {
    /// Check every field; also used on deserialized configs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_trees == 0 {
            return Err(ConfigError::ZeroTrees);
        }
        if self.tree_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.leaf_size == 0 {
            return Err(ConfigError::ZeroLeafSize);
        }
        if self.num_rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        if self.num_features == 0 {
            return Err(ConfigError::ZeroFeatures);
        }
        if self.num_features_to_compare == 0 || self.num_features_to_compare > self.num_features {
            return Err(ConfigError::FeaturesToCompareOutOfRange {
                value: self.num_features_to_compare,
                num_features: self.num_features,
            });
        }
        Ok(())
    }

    /// Parallelism hint derived from `n_threads`.
    #[inline]
    pub fn parallelism(&self) -> Parallelism {
        Parallelism::from_threads(self.n_threads)
    }
}

//! Construction of a single random binary tree.

use rand::Rng;

use super::partition::RowPartitioner;
use super::sampling::FeatureSampler;
use super::split::{SplitFinder, SplitStrategy};
use crate::config::RbfConfig;
use crate::data::FeatureStore;
use crate::repr::{Node, NodeId, PartitionRule, RandomBinaryTree};

/// Per-tree construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    pub tree_depth: usize,
    pub leaf_size: usize,
    pub num_features_to_compare: usize,
    pub split_strategy: SplitStrategy,
}

impl From<&RbfConfig> for TreeParams {
    fn from(config: &RbfConfig) -> Self {
        Self {
            tree_depth: config.tree_depth,
            leaf_size: config.leaf_size,
            num_features_to_compare: config.num_features_to_compare,
            split_strategy: config.split_strategy,
        }
    }
}

/// Counters gathered while building one tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub internal_nodes: usize,
    pub leaves: usize,
    /// Leaves above `leaf_size` whose rows no feature can separate.
    pub forced_leaves: usize,
    /// Majority votes that routed every row one way and were replaced by a threshold.
    pub vote_fallbacks: usize,
    pub max_depth: usize,
    pub largest_leaf: usize,
}

/// Builds trees over one feature store, reusing scratch buffers between trees.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256PlusPlus;
/// use rbforest::data::FeatureStore;
/// use rbforest::training::{SplitStrategy, TreeBuilder, TreeParams};
///
/// let store = FeatureStore::from_row_major(&[0, 0, 0, 1, 10, 10, 10, 11], 4, 2).unwrap();
/// let params = TreeParams {
///     tree_depth: 3,
///     leaf_size: 1,
///     num_features_to_compare: 2,
///     split_strategy: SplitStrategy::BestFeature,
/// };
/// let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
/// let (tree, stats) = TreeBuilder::new(&store, params).build(&mut rng);
/// assert_eq!(tree.tree_size(), stats.internal_nodes + stats.leaves);
/// assert!(tree.validate(4, 2).is_ok());
/// ```
#[derive(Debug)]
pub struct TreeBuilder<'a> {
    store: &'a FeatureStore,
    params: TreeParams,
    sampler: FeatureSampler,
    finder: SplitFinder,
}

/// Pending node: arena slot, row range, depth.
struct Frame {
    node: NodeId,
    start: usize,
    end: usize,
    depth: usize,
}

impl<'a> TreeBuilder<'a> {
    /// # Panics
    ///
    /// Panics if `num_features_to_compare` is 0.
    pub fn new(store: &'a FeatureStore, params: TreeParams) -> Self {
        Self {
            store,
            params,
            sampler: FeatureSampler::new(store.num_features(), params.num_features_to_compare),
            finder: SplitFinder::new(),
        }
    }

    /// Build one tree over every row of the store.
    ///
    /// All randomness comes from `rng`, so the same generator state yields the
    /// same tree.
    pub fn build<R: Rng + ?Sized>(&mut self, rng: &mut R) -> (RandomBinaryTree, BuildStats) {
        let num_rows = self.store.num_rows();
        let mut partitioner = RowPartitioner::new(num_rows);
        let mut stats = BuildStats::default();

        let mut nodes = vec![placeholder()];
        let mut stack = vec![Frame {
            node: 0,
            start: 0,
            end: num_rows,
            depth: 0,
        }];

        while let Some(Frame { node, start, end, depth }) = stack.pop() {
            let len = end - start;
            let split = if depth >= self.params.tree_depth || len <= self.params.leaf_size {
                None
            } else {
                let split = self.split_node(&mut partitioner, start, end, rng, &mut stats);
                if split.is_none() {
                    stats.forced_leaves += 1;
                }
                split
            };

            match split {
                Some((rule, mid)) => {
                    let first = nodes.len() as NodeId;
                    nodes.push(placeholder());
                    nodes.push(placeholder());
                    nodes[node as usize] = Node::Internal {
                        rule,
                        first,
                        second: first + 1,
                    };
                    stats.internal_nodes += 1;
                    stack.push(Frame {
                        node: first + 1,
                        start: mid,
                        end,
                        depth: depth + 1,
                    });
                    stack.push(Frame {
                        node: first,
                        start,
                        end: mid,
                        depth: depth + 1,
                    });
                }
                None => {
                    nodes[node as usize] = Node::Leaf {
                        start: start as u32,
                        end: end as u32,
                        depth: depth as u32,
                    };
                    stats.leaves += 1;
                    stats.max_depth = stats.max_depth.max(depth);
                    stats.largest_leaf = stats.largest_leaf.max(len);
                }
            }
        }

        (RandomBinaryTree::from_parts(partitioner.into_indices(), nodes), stats)
    }

    /// Find a rule that sends at least one row each way and apply it.
    ///
    /// Draws feature batches until one yields a usable rule; `None` means no
    /// feature varies over the node's rows.
    fn split_node<R: Rng + ?Sized>(
        &mut self,
        partitioner: &mut RowPartitioner,
        start: usize,
        end: usize,
        rng: &mut R,
        stats: &mut BuildStats,
    ) -> Option<(PartitionRule, usize)> {
        let separates = |mid: usize| mid > start && mid < end;

        self.sampler.reset();
        while let Some(batch) = self.sampler.next_batch(rng) {
            let rows = partitioner.rows(start..end);
            let Some(found) = self.finder.find(self.store, rows, batch, self.params.split_strategy) else {
                continue;
            };

            let mid = partitioner.partition(start..end, &found.rule, self.store);
            if separates(mid) {
                return Some((found.rule, mid));
            }

            // A vote can route every row one way; the best single cut cannot.
            stats.vote_fallbacks += 1;
            let fallback = found.fallback_rule();
            let mid = partitioner.partition(start..end, &fallback, self.store);
            return separates(mid).then_some((fallback, mid));
        }
        None
    }
}

#[inline]
fn placeholder() -> Node {
    Node::Leaf {
        start: 0,
        end: 0,
        depth: 0,
    }
}

//! Row partitioning for tree construction.
//!
//! A single buffer holds every row index. Each node owns a contiguous range of
//! it; applying a node's rule partitions that range in place so the rows
//! routed `First` precede the rows routed `Second`.
//!
//! ```text
//! Root owns all rows:
//!   indices: [0, 1, 2, 3, 4, 5, 6, 7]   range 0..8
//!
//! Rule sends rows 0, 2, 4, 6 first:
//!   indices: [0, 2, 4, 6, 1, 3, 5, 7]   first 0..4, second 4..8
//! ```
//!
//! The finished buffer becomes the tree's row index.

use std::ops::Range;

use crate::data::FeatureStore;
use crate::repr::{Branch, PartitionRule};

/// Owns the row index buffer while a tree is built.
#[derive(Debug, Clone)]
pub struct RowPartitioner {
    indices: Box<[u32]>,
}

impl RowPartitioner {
    /// Buffer holding `0..num_rows` in order.
    pub fn new(num_rows: usize) -> Self {
        Self {
            indices: (0..num_rows as u32).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Rows currently in `range`.
    #[inline]
    pub fn rows(&self, range: Range<usize>) -> &[u32] {
        &self.indices[range]
    }

    /// Partition `range` by `rule`.
    ///
    /// Returns the split point `mid`: rows in `range.start..mid` go first and
    /// rows in `mid..range.end` go second.
    pub fn partition(&mut self, range: Range<usize>, rule: &PartitionRule, store: &FeatureStore) -> usize {
        match *rule {
            PartitionRule::Threshold { feature, threshold } => {
                let column = store.column(feature as usize);
                self.partition_by(range, |row| column[row as usize] <= threshold)
            }
            PartitionRule::MajorityVote { .. } => {
                self.partition_by(range, |row| rule.branch(&store.row(row as usize)) == Branch::First)
            }
        }
    }

    /// Move rows satisfying `goes_first` to the front of `range`.
    fn partition_by(&mut self, range: Range<usize>, goes_first: impl Fn(u32) -> bool) -> usize {
        let mut first_end = range.start;
        for i in range {
            let row = self.indices[i];
            if goes_first(row) {
                self.indices.swap(i, first_end);
                first_end += 1;
            }
        }
        first_end
    }

    /// Hand the buffer over as the tree's row index.
    pub fn into_indices(self) -> Vec<u32> {
        self.indices.into_vec()
    }
}

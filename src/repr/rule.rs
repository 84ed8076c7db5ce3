//! Partition rules stored in internal nodes.

use crate::data::RowView;

/// Side of a partition a vector is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    First,
    Second,
}

impl Branch {
    #[inline]
    fn from_le(value: u8, threshold: u8) -> Self {
        if value <= threshold {
            Branch::First
        } else {
            Branch::Second
        }
    }
}

/// Comparison evaluated at an internal node.
///
/// The same rule routes rows during construction and query vectors during
/// traversal, so a row always lands in the leaf that holds it. Both variants
/// are total over the `u8` domain: values never seen during training route
/// deterministically.
///
/// # Example
///
/// ```
/// use rbforest::repr::{Branch, PartitionRule};
///
/// let rule = PartitionRule::threshold(1, 5);
/// assert_eq!(rule.branch(&[200u8, 5][..]), Branch::First);
/// assert_eq!(rule.branch(&[0u8, 6][..]), Branch::Second);
///
/// // two of three features vote First
/// let vote = PartitionRule::majority_vote(vec![0, 1, 2], vec![10, 10, 10]);
/// assert_eq!(vote.branch(&[1u8, 2, 99][..]), Branch::First);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionRule {
    /// `First` iff `v[feature] <= threshold`.
    Threshold { feature: u32, threshold: u8 },

    /// Each feature votes `First` iff `v[f] <= thresholds[i]`; `First` wins
    /// with at least half the votes.
    MajorityVote {
        features: Box<[u32]>,
        thresholds: Box<[u8]>,
    },
}

impl PartitionRule {
    #[inline]
    pub fn threshold(feature: u32, threshold: u8) -> Self {
        Self::Threshold { feature, threshold }
    }

    /// # Panics
    ///
    /// Panics if the lists are empty or differ in length.
    pub fn majority_vote(features: Vec<u32>, thresholds: Vec<u8>) -> Self {
        assert!(!features.is_empty(), "majority vote needs at least one feature");
        assert_eq!(features.len(), thresholds.len(), "one threshold per feature");
        Self::MajorityVote {
            features: features.into_boxed_slice(),
            thresholds: thresholds.into_boxed_slice(),
        }
    }

    /// Route a vector.
    #[inline]
    pub fn branch<R: RowView + ?Sized>(&self, row: &R) -> Branch {
        match self {
            Self::Threshold { feature, threshold } => Branch::from_le(row.feature(*feature as usize), *threshold),
            Self::MajorityVote { features, thresholds } => {
                let first_votes = features
                    .iter()
                    .zip(thresholds.iter())
                    .filter(|&(&f, &t)| row.feature(f as usize) <= t)
                    .count();
                if first_votes * 2 >= features.len() {
                    Branch::First
                } else {
                    Branch::Second
                }
            }
        }
    }

    /// Features the rule reads.
    pub fn features(&self) -> &[u32] {
        match self {
            Self::Threshold { feature, .. } => std::slice::from_ref(feature),
            Self::MajorityVote { features, .. } => features,
        }
    }
}

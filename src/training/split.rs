//! Split finding over 256-bin feature histograms.
//!
//! For one feature the best split is a 1-D two-means cut: the threshold that
//! maximizes the reduction of within-partition squared deviation,
//!
//! ```text
//! gain = S_l^2 / n_l + S_r^2 / n_r - S^2 / n
//! ```
//!
//! where `S` is the sum of values and `n` the count on each side. Only cuts
//! between two occupied bins are considered; the threshold is placed halfway
//! across the gap so unseen values route to the nearer side.

use crate::data::FeatureStore;
use crate::repr::PartitionRule;

/// Number of distinct `u8` feature values.
pub const NUM_BINS: usize = 256;

/// How an internal node's rule is derived from the sampled features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SplitStrategy {
    /// Single feature with the largest gain.
    #[default]
    BestFeature,
    /// Every informative sampled feature votes at its own best threshold.
    MajorityVote,
}

/// Best cut of one feature over a node's rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSplit {
    pub feature: u32,
    /// Values `<= threshold` go first.
    pub threshold: u8,
    pub gain: f64,
    pub first_count: u32,
    pub second_count: u32,
}

/// Value counts of one feature over a set of rows.
#[derive(Debug, Clone)]
pub struct FeatureHistogram {
    counts: Box<[u32; NUM_BINS]>,
}

impl Default for FeatureHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureHistogram {
    pub fn new() -> Self {
        Self {
            counts: Box::new([0; NUM_BINS]),
        }
    }

    /// Count `column[row]` for every row, replacing previous contents.
    pub fn build(&mut self, column: &[u8], rows: &[u32]) {
        self.counts.fill(0);
        for &row in rows {
            self.counts[column[row as usize] as usize] += 1;
        }
    }

    #[inline]
    pub fn count(&self, value: u8) -> u32 {
        self.counts[value as usize]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Best two-means cut, or `None` when fewer than two values occur.
    ///
    /// Ties keep the lowest threshold.
    pub fn best_split(&self, feature: u32) -> Option<FeatureSplit> {
        let (n, s) = self
            .counts
            .iter()
            .enumerate()
            .fold((0u64, 0f64), |(n, s), (v, &c)| (n + c as u64, s + (v as f64) * c as f64));
        if n == 0 {
            return None;
        }
        let baseline = s * s / n as f64;

        let mut best: Option<FeatureSplit> = None;
        // (last occupied value, prefix count, prefix sum) up to and including it
        let mut prev: Option<(usize, u64, f64)> = None;
        let (mut n_l, mut s_l) = (0u64, 0f64);

        for (w, &c) in self.counts.iter().enumerate() {
            if c == 0 {
                continue;
            }
            if let Some((v, pn, ps)) = prev {
                let n_r = n - pn;
                let s_r = s - ps;
                let gain = ps * ps / pn as f64 + s_r * s_r / n_r as f64 - baseline;
                if best.map_or(true, |b| gain > b.gain) {
                    best = Some(FeatureSplit {
                        feature,
                        threshold: ((v + w - 1) / 2) as u8,
                        gain,
                        first_count: pn as u32,
                        second_count: n_r as u32,
                    });
                }
            }
            n_l += c as u64;
            s_l += (w as f64) * c as f64;
            prev = Some((w, n_l, s_l));
        }
        best
    }
}

/// Rule chosen for a node, with the single best cut as a fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSplit {
    pub rule: PartitionRule,
    pub best: FeatureSplit,
}

impl NodeSplit {
    /// Threshold rule of the best single feature.
    pub fn fallback_rule(&self) -> PartitionRule {
        PartitionRule::threshold(self.best.feature, self.best.threshold)
    }
}

/// Derives node rules from a batch of sampled features.
#[derive(Debug, Clone, Default)]
pub struct SplitFinder {
    histogram: FeatureHistogram,
    candidates: Vec<FeatureSplit>,
}

impl SplitFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rule for `rows` from the features in `batch`.
    ///
    /// Returns `None` when every feature in the batch is constant over `rows`.
    pub fn find(
        &mut self,
        store: &FeatureStore,
        rows: &[u32],
        batch: &[u32],
        strategy: SplitStrategy,
    ) -> Option<NodeSplit> {
        self.candidates.clear();
        for &feature in batch {
            self.histogram.build(store.column(feature as usize), rows);
            if let Some(split) = self.histogram.best_split(feature) {
                self.candidates.push(split);
            }
        }

        let best = *self
            .candidates
            .iter()
            .reduce(|a, b| if b.gain > a.gain { b } else { a })?;

        let rule = match strategy {
            SplitStrategy::MajorityVote if self.candidates.len() > 1 => PartitionRule::majority_vote(
                self.candidates.iter().map(|c| c.feature).collect(),
                self.candidates.iter().map(|c| c.threshold).collect(),
            ),
            _ => PartitionRule::threshold(best.feature, best.threshold),
        };
        Some(NodeSplit { rule, best })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn histogram_of(values: &[u8]) -> FeatureHistogram {
        let rows: Vec<u32> = (0..values.len() as u32).collect();
        let mut hist = FeatureHistogram::new();
        hist.build(values, &rows);
        hist
    }

    #[test]
    fn build_counts_only_selected_rows() {
        let column = [5u8, 5, 9, 5, 9];
        let mut hist = FeatureHistogram::new();
        hist.build(&column, &[0, 2, 4]);
        assert_eq!(hist.count(5), 1);
        assert_eq!(hist.count(9), 2);
        assert_eq!(hist.total(), 3);

        hist.build(&column, &[1]);
        assert_eq!(hist.count(9), 0);
        assert_eq!(hist.total(), 1);
    }

    #[test]
    fn constant_feature_has_no_split() {
        assert_eq!(histogram_of(&[7, 7, 7]).best_split(0), None);
        assert_eq!(FeatureHistogram::new().best_split(0), None);
    }

    #[test]
    fn two_values_split_in_the_middle_of_the_gap() {
        let split = histogram_of(&[0, 0, 10, 10]).best_split(3).unwrap();
        assert_eq!(split.feature, 3);
        assert_eq!(split.threshold, 4);
        assert_eq!(split.first_count, 2);
        assert_eq!(split.second_count, 2);
        // (0^2/2 + 20^2/2) - 20^2/4
        assert_relative_eq!(split.gain, 100.0);
    }

    #[test]
    fn adjacent_values_split_at_lower_value() {
        let split = histogram_of(&[3, 4]).best_split(0).unwrap();
        assert_eq!(split.threshold, 3);
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        let split = histogram_of(&[0, 255]).best_split(0).unwrap();
        assert_eq!(split.threshold, 127);
    }

    #[test]
    fn picks_the_widest_gap_between_clusters() {
        // clusters {1, 2, 3} and {200, 201}
        let split = histogram_of(&[1, 2, 3, 200, 201]).best_split(0).unwrap();
        assert_eq!(split.first_count, 3);
        assert!(split.threshold >= 3 && split.threshold < 200);
    }

    #[test]
    fn finder_prefers_informative_feature() {
        // feature 0 constant, feature 1 two clusters, feature 2 weak spread
        let row_major = [
            5u8, 0, 10, //
            5, 1, 11, //
            5, 100, 12, //
            5, 101, 13,
        ];
        let store = FeatureStore::from_row_major(&row_major, 4, 3).unwrap();
        let rows = [0u32, 1, 2, 3];
        let mut finder = SplitFinder::new();

        let split = finder.find(&store, &rows, &[0, 1, 2], SplitStrategy::BestFeature).unwrap();
        assert_eq!(split.best.feature, 1);
        assert!(matches!(split.rule, PartitionRule::Threshold { feature: 1, .. }));

        assert!(finder.find(&store, &rows, &[0], SplitStrategy::BestFeature).is_none());
    }

    #[test]
    fn finder_builds_vote_over_informative_features() {
        let row_major = [
            0u8, 0, 7, //
            0, 0, 7, //
            50, 90, 7, //
            60, 99, 7,
        ];
        let store = FeatureStore::from_row_major(&row_major, 4, 3).unwrap();
        let rows = [0u32, 1, 2, 3];
        let mut finder = SplitFinder::new();

        let split = finder.find(&store, &rows, &[2, 0, 1], SplitStrategy::MajorityVote).unwrap();
        match &split.rule {
            PartitionRule::MajorityVote { features, .. } => assert_eq!(&features[..], &[0, 1]),
            other => panic!("expected majority vote, got {other:?}"),
        }

        // a single informative feature degrades to a threshold
        let single = finder.find(&store, &rows, &[2, 1], SplitStrategy::MajorityVote).unwrap();
        assert!(matches!(single.rule, PartitionRule::Threshold { feature: 1, .. }));
        assert_eq!(single.fallback_rule(), single.rule);
    }
}

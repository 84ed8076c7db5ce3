//! Query result containers.

use std::collections::HashMap;

// ============================================================================
// ForestResults
// ============================================================================

/// Candidate rows of one query, per tree.
///
/// Stored flat: tree `i` owns `rows[offsets[i]..offsets[i + 1]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForestResults {
    rows: Vec<u32>,
    offsets: Vec<usize>,
}

impl Default for ForestResults {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            offsets: vec![0],
        }
    }
}

impl ForestResults {
    pub(crate) fn with_capacity(n_trees: usize, rows: usize) -> Self {
        let mut offsets = Vec::with_capacity(n_trees + 1);
        offsets.push(0);
        Self {
            rows: Vec::with_capacity(rows),
            offsets,
        }
    }

    /// Append the candidates of the next tree.
    pub fn push_tree(&mut self, rows: &[u32]) {
        self.rows.extend_from_slice(rows);
        self.offsets.push(self.rows.len());
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Candidates from tree `tree`.
    #[inline]
    pub fn tree_results(&self, tree: usize) -> &[u32] {
        &self.rows[self.offsets[tree]..self.offsets[tree + 1]]
    }

    #[inline]
    pub fn tree_count(&self, tree: usize) -> usize {
        self.offsets[tree + 1] - self.offsets[tree]
    }

    /// Per-tree candidate counts in tree order.
    pub fn counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.offsets.windows(2).map(|w| w[1] - w[0])
    }

    /// Sum of per-tree counts.
    #[inline]
    pub fn total_count(&self) -> usize {
        self.rows.len()
    }

    /// Per-tree candidate slices in tree order.
    pub fn iter(&self) -> impl Iterator<Item = &[u32]> + '_ {
        (0..self.n_trees()).map(move |t| self.tree_results(t))
    }

    /// All candidates concatenated in tree order, duplicates included.
    #[inline]
    pub fn as_flat(&self) -> &[u32] {
        &self.rows
    }

    pub fn contains(&self, row: u32) -> bool {
        self.rows.contains(&row)
    }

    /// Union of all trees' candidates in first-seen order.
    pub fn dedup(&self) -> DedupResults {
        DedupResults::from_rows(&self.rows)
    }
}

// ============================================================================
// DedupResults
// ============================================================================

/// Distinct candidate rows of one query.
///
/// Rows appear in first-seen order: trees in index order, rows in leaf
/// order. `hits[i]` counts the trees that returned `rows[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupResults {
    rows: Vec<u32>,
    hits: Vec<u32>,
}

impl DedupResults {
    pub(crate) fn from_rows(candidates: &[u32]) -> Self {
        let mut position: HashMap<u32, usize> = HashMap::with_capacity(candidates.len());
        let mut rows = Vec::new();
        let mut hits = Vec::new();
        for &row in candidates {
            let idx = *position.entry(row).or_insert_with(|| {
                rows.push(row);
                hits.push(0);
                rows.len() - 1
            });
            hits[idx] += 1;
        }
        Self { rows, hits }
    }

    /// Number of distinct rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn rows(&self) -> &[u32] {
        &self.rows
    }

    #[inline]
    pub fn hits(&self) -> &[u32] {
        &self.hits
    }

    /// `(row, hits)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.rows.iter().copied().zip(self.hits.iter().copied())
    }

    pub fn contains(&self, row: u32) -> bool {
        self.rows.contains(&row)
    }

    pub fn into_rows(self) -> Vec<u32> {
        self.rows
    }
}

// ============================================================================
// Neighbor
// ============================================================================

/// A candidate scored by exact squared L2 distance to the query.
///
/// Ordered by distance, then row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Neighbor {
    pub distance: u64,
    pub row: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ForestResults {
        let mut results = ForestResults::default();
        results.push_tree(&[4, 1]);
        results.push_tree(&[]);
        results.push_tree(&[1, 7, 4]);
        results
    }

    #[test]
    fn per_tree_slices_and_counts() {
        let results = sample();
        assert_eq!(results.n_trees(), 3);
        assert_eq!(results.tree_results(0), &[4, 1]);
        assert!(results.tree_results(1).is_empty());
        assert_eq!(results.tree_count(2), 3);
        assert_eq!(results.counts().collect::<Vec<_>>(), vec![2, 0, 3]);
        assert_eq!(results.total_count(), 5);
        assert_eq!(results.iter().count(), 3);
        assert!(results.contains(7));
        assert!(!results.contains(2));
    }

    #[test]
    fn dedup_keeps_first_seen_order_and_counts_hits() {
        let dedup = sample().dedup();
        assert_eq!(dedup.rows(), &[4, 1, 7]);
        assert_eq!(dedup.hits(), &[2, 2, 1]);
        assert_eq!(dedup.iter().collect::<Vec<_>>(), vec![(4, 2), (1, 2), (7, 1)]);
        assert_eq!(dedup.len(), 3);
    }

    #[test]
    fn empty_results() {
        let results = ForestResults::default();
        assert_eq!(results.n_trees(), 0);
        assert_eq!(results.total_count(), 0);
        assert!(results.dedup().is_empty());
    }

    #[test]
    fn neighbors_order_by_distance_then_row() {
        let mut neighbors = vec![
            Neighbor { distance: 5, row: 1 },
            Neighbor { distance: 2, row: 9 },
            Neighbor { distance: 2, row: 3 },
        ];
        neighbors.sort();
        let rows: Vec<u32> = neighbors.iter().map(|n| n.row).collect();
        assert_eq!(rows, vec![3, 9, 1]);
    }
}

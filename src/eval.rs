//! Label voting over query candidates.
//!
//! Turns candidate rows into a predicted label, for classification-style
//! evaluation of the index. Ties go to the smallest label.

use std::collections::BTreeMap;

use crate::data::DataError;
use crate::query::{ForestResults, Neighbor};

/// Most frequent label among all per-tree candidates, duplicates counted.
///
/// Returns `None` when there are no candidates.
///
/// # Panics
///
/// Panics if a candidate row has no entry in `labels`.
pub fn plurality_label<L: Copy + Ord>(results: &ForestResults, labels: &[L]) -> Option<L> {
    vote(results.as_flat().iter().map(|&row| labels[row as usize]))
}

/// Most frequent label among the first `k` reranked neighbors.
///
/// # Panics
///
/// Panics if a neighbor row has no entry in `labels`.
pub fn nearest_label<L: Copy + Ord>(neighbors: &[Neighbor], labels: &[L], k: usize) -> Option<L> {
    vote(neighbors.iter().take(k).map(|n| labels[n.row as usize]))
}

/// Fraction of positions where `predicted` equals `expected`; 0 for empty input.
///
/// # Errors
///
/// [`DataError::LengthMismatch`] if the slices differ in length.
pub fn accuracy<L: PartialEq>(predicted: &[L], expected: &[L]) -> Result<f64, DataError> {
    if predicted.len() != expected.len() {
        return Err(DataError::LengthMismatch {
            expected: expected.len(),
            got: predicted.len(),
        });
    }
    if expected.is_empty() {
        return Ok(0.0);
    }
    let correct = predicted.iter().zip(expected).filter(|(p, e)| p == e).count();
    Ok(correct as f64 / expected.len() as f64)
}

fn vote<L: Ord>(labels: impl Iterator<Item = L>) -> Option<L> {
    let mut counts: BTreeMap<L, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let mut best: Option<(L, usize)> = None;
    for (label, count) in counts {
        if best.as_ref().map_or(true, |&(_, c)| count > c) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label)
}

//! Exact squared Euclidean distance between byte vectors, and reranking.

use crate::data::{DataError, FeatureStore, RowView};
use crate::query::Neighbor;

/// Sum of squared per-feature differences.
///
/// Accumulates in `u64`; the largest possible value for `n` features is
/// `n * 255^2`.
///
/// # Errors
///
/// [`DataError::LengthMismatch`] if the vectors differ in length.
///
/// # Example
///
/// ```
/// use rbforest::l2_square_dist;
///
/// assert_eq!(l2_square_dist(&[0, 3], &[4, 0]).unwrap(), 25);
/// assert!(l2_square_dist(&[0], &[0, 0]).is_err());
/// ```
pub fn l2_square_dist(a: &[u8], b: &[u8]) -> Result<u64, DataError> {
    if a.len() != b.len() {
        return Err(DataError::LengthMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(&x, &y)| squared_diff(x, y)).sum())
}

#[inline]
fn squared_diff(x: u8, y: u8) -> u64 {
    let d = x.abs_diff(y) as u64;
    d * d
}

/// Squared distance between a query and any row view of the same width.
#[inline]
pub(crate) fn l2_square_dist_view<R: RowView + ?Sized>(point: &[u8], row: &R) -> u64 {
    debug_assert_eq!(point.len(), row.n_features());
    point
        .iter()
        .enumerate()
        .map(|(f, &x)| squared_diff(x, row.feature(f)))
        .sum()
}

/// Score `candidates` against `point` and keep the `k` closest.
///
/// Output is sorted by distance, ties by row index; `None` keeps every
/// candidate.
///
/// # Errors
///
/// [`DataError::LengthMismatch`] if `point` is not as wide as the store,
/// [`DataError::RowOutOfBounds`] if a candidate is not a row of the store.
pub fn rerank(
    store: &FeatureStore,
    point: &[u8],
    candidates: &[u32],
    k: Option<usize>,
) -> Result<Vec<Neighbor>, DataError> {
    if point.len() != store.num_features() {
        return Err(DataError::LengthMismatch {
            expected: store.num_features(),
            got: point.len(),
        });
    }
    let num_rows = store.num_rows();
    let mut neighbors = Vec::with_capacity(candidates.len());
    for &row in candidates {
        if row as usize >= num_rows {
            return Err(DataError::RowOutOfBounds {
                row: row as usize,
                num_rows,
            });
        }
        neighbors.push(Neighbor {
            distance: l2_square_dist_view(point, &store.row(row as usize)),
            row,
        });
    }

    if let Some(k) = k {
        if k < neighbors.len() {
            neighbors.select_nth_unstable(k);
            neighbors.truncate(k);
        }
    }
    neighbors.sort_unstable();
    Ok(neighbors)
}

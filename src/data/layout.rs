//! Memory layouts for dense feature matrices.
//!
//! A dataset is a `num_rows x num_features` grid of bytes. It arrives from
//! callers row-major (one record after another) but tree construction scans a
//! single feature across many rows, so the [`FeatureStore`](super::FeatureStore)
//! keeps it column-major:
//!
//! - [`RowMajor`]: `index = row * num_cols + col`
//! - [`ColMajor`]: `index = col * num_rows + row`
//!
//! Layout is a type parameter on [`DenseMatrix`](super::DenseMatrix), so the
//! index arithmetic is monomorphized away.

use std::iter::FusedIterator;

mod sealed {
    pub trait Sealed {}
}

/// Matrix memory layout.
///
/// Sealed: only [`RowMajor`] and [`ColMajor`] exist.
pub trait Layout: sealed::Sealed + Copy + Default + std::fmt::Debug + Send + Sync + 'static {
    /// Convert `(row, col)` to a linear offset.
    fn index(row: usize, col: usize, num_rows: usize, num_cols: usize) -> usize;

    /// Distance between neighbours along the non-contiguous axis.
    fn stride(num_rows: usize, num_cols: usize) -> usize;

    /// Length of one contiguous run (a row for `RowMajor`, a column for `ColMajor`).
    fn contiguous_len(num_rows: usize, num_cols: usize) -> usize;
}

/// Row-major layout: each record is contiguous.
///
/// ```text
/// Logical:     Memory:
/// [a b c]      [a b c d e f]
/// [d e f]       ^row0^ ^row1^
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowMajor;

impl sealed::Sealed for RowMajor {}

impl Layout for RowMajor {
    #[inline]
    fn index(row: usize, col: usize, _num_rows: usize, num_cols: usize) -> usize {
        row * num_cols + col
    }

    #[inline]
    fn stride(_num_rows: usize, num_cols: usize) -> usize {
        num_cols
    }

    #[inline]
    fn contiguous_len(_num_rows: usize, num_cols: usize) -> usize {
        num_cols
    }
}

/// Column-major layout: each feature is contiguous.
///
/// ```text
/// Logical:     Memory:
/// [a b c]      [a d b e c f]
/// [d e f]       ^f0 ^f1 ^f2
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColMajor;

impl sealed::Sealed for ColMajor {}

impl Layout for ColMajor {
    #[inline]
    fn index(row: usize, col: usize, num_rows: usize, _num_cols: usize) -> usize {
        col * num_rows + row
    }

    #[inline]
    fn stride(num_rows: usize, _num_cols: usize) -> usize {
        num_rows
    }

    #[inline]
    fn contiguous_len(num_rows: usize, _num_cols: usize) -> usize {
        num_rows
    }
}

/// Iterator stepping through a slice with a fixed stride.
///
/// Walks the non-contiguous axis: a column of a row-major matrix or a row of
/// a column-major one.
#[derive(Debug, Clone)]
pub struct StridedIter<'a, T> {
    data: &'a [T],
    pos: usize,
    stride: usize,
    remaining: usize,
}

impl<'a, T> StridedIter<'a, T> {
    /// Iterate `count` elements of `data` starting at `start`, `stride` apart.
    #[inline]
    pub fn new(data: &'a [T], start: usize, stride: usize, count: usize) -> Self {
        Self {
            data,
            pos: start,
            stride,
            remaining: count,
        }
    }
}

impl<'a, T> Iterator for StridedIter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = &self.data[self.pos];
        self.pos += self.stride;
        self.remaining -= 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for StridedIter<'_, T> {}
impl<T> FusedIterator for StridedIter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_and_col_major_offsets_agree_on_element() {
        // 3 rows x 2 features; element (row 2, feature 1)
        assert_eq!(RowMajor::index(2, 1, 3, 2), 5);
        assert_eq!(ColMajor::index(2, 1, 3, 2), 5);
        // element (row 1, feature 0)
        assert_eq!(RowMajor::index(1, 0, 3, 2), 2);
        assert_eq!(ColMajor::index(1, 0, 3, 2), 1);
    }

    #[test]
    fn strides_follow_layout() {
        assert_eq!(RowMajor::stride(4, 3), 3);
        assert_eq!(RowMajor::contiguous_len(4, 3), 3);
        assert_eq!(ColMajor::stride(4, 3), 4);
        assert_eq!(ColMajor::contiguous_len(4, 3), 4);
    }

    #[test]
    fn strided_iter_walks_a_record_of_a_column_major_buffer() {
        // 3 rows x 2 features, column-major: f0 = [1, 2, 3], f1 = [7, 8, 9]
        let data = [1u8, 2, 3, 7, 8, 9];
        let row1: Vec<u8> = StridedIter::new(&data, 1, 3, 2).copied().collect();
        assert_eq!(row1, vec![2, 8]);
    }

    #[test]
    fn strided_iter_reports_exact_size() {
        let data = [0u8; 12];
        let mut iter = StridedIter::new(&data, 2, 4, 3);
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
    }
}

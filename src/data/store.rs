//! The column-major feature store shared by training and reranking.

use ndarray::ArrayView2;

use super::dense::{transpose, ColMatrix};
use super::error::DataError;
use super::traits::StridedRowView;

/// Largest row count a store accepts.
///
/// Row indices and node ids are `u32`; a tree over `n` rows can hold up to
/// `2n - 1` nodes, so `n` is capped at `2^31`.
pub const MAX_ROWS: usize = 1 << 31;

/// Immutable dataset of byte features, stored column-major.
///
/// Tree construction histograms one feature over many rows at a time, which
/// is a sequential scan of [`column`](Self::column) in this layout. Records are
/// still reachable through the strided [`row`](Self::row) view.
///
/// # Example
///
/// ```
/// use rbforest::data::{FeatureStore, RowView};
///
/// // 3 records x 2 features, row-major input
/// let store = FeatureStore::from_row_major(&[0, 1, 10, 11, 20, 21], 3, 2).unwrap();
/// assert_eq!(store.column(1), &[1, 11, 21]);
/// assert_eq!(store.row(2).feature(0), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureStore {
    matrix: ColMatrix<u8>,
}

impl FeatureStore {
    /// Wrap a buffer that is already column-major (`feature * num_rows + row`).
    pub fn from_col_major(data: Vec<u8>, num_rows: usize, num_features: usize) -> Result<Self, DataError> {
        if num_rows > MAX_ROWS {
            return Err(DataError::TooManyRows {
                num_rows,
                max: MAX_ROWS,
            });
        }
        let matrix = ColMatrix::from_vec(data, num_rows, num_features)?;
        Ok(Self { matrix })
    }

    /// Transpose a row-major buffer (`row * num_features + feature`) into a store.
    pub fn from_row_major(data: &[u8], num_rows: usize, num_features: usize) -> Result<Self, DataError> {
        let col_major = transpose(data, num_rows, num_features)?;
        Self::from_col_major(col_major, num_rows, num_features)
    }

    /// Copy a `[num_rows, num_features]` ndarray view of any memory order.
    pub fn from_ndarray(view: ArrayView2<'_, u8>) -> Result<Self, DataError> {
        let (num_rows, num_features) = view.dim();
        let mut data = Vec::with_capacity(view.len());
        for column in view.columns() {
            data.extend(column.iter().copied());
        }
        Self::from_col_major(data, num_rows, num_features)
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.matrix.num_rows()
    }

    #[inline]
    pub fn num_features(&self) -> usize {
        self.matrix.num_cols()
    }

    /// Values of one feature across all rows.
    #[inline]
    pub fn column(&self, feature: usize) -> &[u8] {
        self.matrix.col_slice(feature)
    }

    /// Strided view of one record.
    ///
    /// # Panics
    ///
    /// Panics if `row >= num_rows`.
    #[inline]
    pub fn row(&self, row: usize) -> StridedRowView<'_> {
        assert!(row < self.num_rows(), "row {row} out of bounds ({})", self.num_rows());
        StridedRowView::new(self.matrix.as_slice(), row, self.num_rows(), self.num_features())
    }

    /// Value of `feature` for `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= num_rows` or `feature >= num_features`.
    #[inline]
    pub fn value(&self, row: usize, feature: usize) -> u8 {
        assert!(row < self.num_rows(), "row {row} out of bounds ({})", self.num_rows());
        self.column(feature)[row]
    }

    /// Copy one record into `buf`.
    ///
    /// # Errors
    ///
    /// [`DataError::LengthMismatch`] if `buf.len() != num_features`.
    pub fn copy_row(&self, row: usize, buf: &mut [u8]) -> Result<(), DataError> {
        if buf.len() != self.num_features() {
            return Err(DataError::LengthMismatch {
                expected: self.num_features(),
                got: buf.len(),
            });
        }
        for (slot, value) in buf.iter_mut().zip(self.row(row).iter()) {
            *slot = value;
        }
        Ok(())
    }

    /// Column-major backing buffer.
    #[inline]
    pub fn as_col_major(&self) -> &[u8] {
        self.matrix.as_slice()
    }

    /// Row-major copy of the dataset.
    pub fn to_row_major(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.as_col_major().len());
        for row in 0..self.num_rows() {
            out.extend(self.row(row).iter());
        }
        out
    }
}

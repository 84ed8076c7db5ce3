//! Dense matrix with a compile-time layout, and layout conversion.

use std::marker::PhantomData;

use super::error::{check_shape, DataError};
use super::layout::{ColMajor, Layout, RowMajor, StridedIter};

/// Dense matrix with configurable memory layout.
///
/// # Generic Parameters
///
/// - `T`: element type (default `u8`, the feature encoding)
/// - `L`: memory layout (default [`RowMajor`])
///
/// # Example
///
/// ```
/// use rbforest::data::{ColMajor, DenseMatrix, RowMajor};
///
/// let rm = DenseMatrix::<u8, RowMajor>::from_vec(vec![1, 2, 3, 4, 5, 6], 2, 3).unwrap();
/// assert_eq!(rm.row_slice(1), &[4, 5, 6]);
///
/// let cm: DenseMatrix<u8, ColMajor> = rm.to_layout();
/// assert_eq!(cm.col_slice(0), &[1, 4]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseMatrix<T = u8, L: Layout = RowMajor> {
    data: Box<[T]>,
    num_rows: usize,
    num_cols: usize,
    _layout: PhantomData<L>,
}

/// Row-major matrix (records contiguous).
pub type RowMatrix<T = u8> = DenseMatrix<T, RowMajor>;

/// Column-major matrix (features contiguous).
pub type ColMatrix<T = u8> = DenseMatrix<T, ColMajor>;

impl<T, L: Layout> DenseMatrix<T, L> {
    /// Take ownership of `data`, laid out according to `L`.
    ///
    /// # Errors
    ///
    /// [`DataError::ShapeMismatch`] if `data.len() != num_rows * num_cols`.
    pub fn from_vec(data: Vec<T>, num_rows: usize, num_cols: usize) -> Result<Self, DataError> {
        check_shape(data.len(), num_rows, num_cols)?;
        Ok(Self {
            data: data.into_boxed_slice(),
            num_rows,
            num_cols,
            _layout: PhantomData,
        })
    }

    /// Underlying buffer in layout order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume the matrix, returning the buffer in layout order.
    pub fn into_vec(self) -> Vec<T> {
        self.data.into_vec()
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[inline]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Element at `(row, col)`, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.num_rows || col >= self.num_cols {
            return None;
        }
        Some(&self.data[L::index(row, col, self.num_rows, self.num_cols)])
    }
}

impl<T: Copy, L: Layout> DenseMatrix<T, L> {
    /// Copy into a matrix with layout `L2`.
    pub fn to_layout<L2: Layout>(&self) -> DenseMatrix<T, L2> {
        let mut data = self.data.to_vec();
        for row in 0..self.num_rows {
            for col in 0..self.num_cols {
                data[L2::index(row, col, self.num_rows, self.num_cols)] =
                    self.data[L::index(row, col, self.num_rows, self.num_cols)];
            }
        }
        DenseMatrix {
            data: data.into_boxed_slice(),
            num_rows: self.num_rows,
            num_cols: self.num_cols,
            _layout: PhantomData,
        }
    }
}

impl<T> DenseMatrix<T, RowMajor> {
    /// Contiguous slice of one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= num_rows`.
    #[inline]
    pub fn row_slice(&self, row: usize) -> &[T] {
        let start = row * self.num_cols;
        &self.data[start..start + self.num_cols]
    }

    /// Strided iterator over one column.
    #[inline]
    pub fn col_iter(&self, col: usize) -> StridedIter<'_, T> {
        assert!(col < self.num_cols, "column {col} out of bounds ({})", self.num_cols);
        StridedIter::new(&self.data, col, self.num_cols, self.num_rows)
    }
}

impl<T> DenseMatrix<T, ColMajor> {
    /// Contiguous slice of one column.
    ///
    /// # Panics
    ///
    /// Panics if `col >= num_cols`.
    #[inline]
    pub fn col_slice(&self, col: usize) -> &[T] {
        let start = col * self.num_rows;
        &self.data[start..start + self.num_rows]
    }

    /// Strided iterator over one row.
    #[inline]
    pub fn row_iter(&self, row: usize) -> StridedIter<'_, T> {
        assert!(row < self.num_rows, "row {row} out of bounds ({})", self.num_rows);
        StridedIter::new(&self.data, row, self.num_rows, self.num_cols)
    }
}

impl<T: Copy> From<&DenseMatrix<T, RowMajor>> for DenseMatrix<T, ColMajor> {
    fn from(matrix: &DenseMatrix<T, RowMajor>) -> Self {
        matrix.to_layout()
    }
}

impl<T: Copy> From<&DenseMatrix<T, ColMajor>> for DenseMatrix<T, RowMajor> {
    fn from(matrix: &DenseMatrix<T, ColMajor>) -> Self {
        matrix.to_layout()
    }
}

/// Transpose a `rows x cols` row-major buffer into column-major order.
///
/// Element `(row r, col c)` moves from `r * cols + c` to `c * rows + r`.
/// Applying it again with the dimensions swapped restores the input.
///
/// # Errors
///
/// [`DataError::ShapeMismatch`] if `input.len() != rows * cols`.
///
/// # Example
///
/// ```
/// let col_major = rbforest::data::transpose(&[1u8, 2, 3, 4, 5, 6], 2, 3).unwrap();
/// assert_eq!(col_major, vec![1, 4, 2, 5, 3, 6]);
/// ```
pub fn transpose<T: Copy>(input: &[T], rows: usize, cols: usize) -> Result<Vec<T>, DataError> {
    check_shape(input.len(), rows, cols)?;
    let mut output = Vec::with_capacity(input.len());
    for col in 0..cols {
        output.extend((0..rows).map(|row| input[row * cols + col]));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_rejects_wrong_length() {
        let err = RowMatrix::<u8>::from_vec(vec![0; 5], 2, 3).unwrap_err();
        assert!(matches!(err, DataError::ShapeMismatch { expected: 6, got: 5, .. }));
    }

    #[test]
    fn get_respects_layout_and_bounds() {
        let cm = ColMatrix::<u8>::from_vec(vec![1, 2, 3, 4, 5, 6], 3, 2).unwrap();
        assert_eq!(cm.get(0, 1), Some(&4));
        assert_eq!(cm.get(2, 0), Some(&3));
        assert_eq!(cm.get(3, 0), None);
        assert_eq!(cm.get(0, 2), None);
    }

    #[test]
    fn to_layout_preserves_elements() {
        let rm = RowMatrix::<u8>::from_vec(vec![1, 2, 3, 4, 5, 6], 2, 3).unwrap();
        let cm: ColMatrix<u8> = (&rm).into();
        assert_eq!(cm.as_slice(), &[1, 4, 2, 5, 3, 6]);
        for row in 0..2 {
            for col in 0..3 {
                assert_eq!(rm.get(row, col), cm.get(row, col));
            }
        }
        let back: RowMatrix<u8> = (&cm).into();
        assert_eq!(back, rm);
    }

    #[test]
    fn row_and_column_access() {
        let rm = RowMatrix::<u8>::from_vec(vec![1, 2, 3, 4, 5, 6], 2, 3).unwrap();
        assert_eq!(rm.row_slice(0), &[1, 2, 3]);
        assert_eq!(rm.col_iter(2).copied().collect::<Vec<_>>(), vec![3, 6]);

        let cm: ColMatrix<u8> = rm.to_layout();
        assert_eq!(cm.col_slice(1), &[2, 5]);
        assert_eq!(cm.row_iter(1).copied().collect::<Vec<_>>(), vec![4, 5, 6]);
    }

    #[test]
    fn transpose_moves_each_element() {
        let rows = 3;
        let cols = 4;
        let input: Vec<u8> = (0..12).collect();
        let output = transpose(&input, rows, cols).unwrap();
        for r in 0..rows {
            for c in 0..cols {
                assert_eq!(output[c * rows + r], input[r * cols + c]);
            }
        }
    }

    #[test]
    fn transpose_twice_is_identity() {
        let input: Vec<u8> = (0..20).map(|x| x * 7).collect();
        let once = transpose(&input, 4, 5).unwrap();
        let twice = transpose(&once, 5, 4).unwrap();
        assert_eq!(twice, input);
    }

    #[test]
    fn transpose_rejects_size_mismatch() {
        assert!(matches!(
            transpose(&[1u8, 2, 3], 2, 2),
            Err(DataError::ShapeMismatch { expected: 4, got: 3, .. })
        ));
    }

    #[test]
    fn transpose_empty_is_empty() {
        assert_eq!(transpose::<u8>(&[], 0, 5).unwrap(), Vec::<u8>::new());
    }
}

//! Read access to a single feature vector.

/// A single feature vector: a query point or one record of a dataset.
///
/// Partition rules and distances are written against this trait so the same
/// code serves contiguous query slices and strided records of a column-major
/// [`FeatureStore`](super::FeatureStore).
pub trait RowView {
    /// Number of features in the vector.
    fn n_features(&self) -> usize;

    /// Value of feature `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= n_features()`.
    fn feature(&self, idx: usize) -> u8;
}

impl RowView for [u8] {
    #[inline]
    fn n_features(&self) -> usize {
        self.len()
    }

    #[inline]
    fn feature(&self, idx: usize) -> u8 {
        self[idx]
    }
}

impl RowView for Vec<u8> {
    #[inline]
    fn n_features(&self) -> usize {
        self.len()
    }

    #[inline]
    fn feature(&self, idx: usize) -> u8 {
        self[idx]
    }
}

impl<const N: usize> RowView for [u8; N] {
    #[inline]
    fn n_features(&self) -> usize {
        N
    }

    #[inline]
    fn feature(&self, idx: usize) -> u8 {
        self[idx]
    }
}

/// One record of a column-major buffer, read with stride `num_rows`.
#[derive(Debug, Clone, Copy)]
pub struct StridedRowView<'a> {
    data: &'a [u8],
    row: usize,
    stride: usize,
    len: usize,
}

impl<'a> StridedRowView<'a> {
    #[inline]
    pub(crate) fn new(data: &'a [u8], row: usize, stride: usize, len: usize) -> Self {
        Self {
            data,
            row,
            stride,
            len,
        }
    }

    /// Iterate the record's values in feature order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = u8> + 'a {
        let data = self.data;
        let (row, stride) = (self.row, self.stride);
        (0..self.len).map(move |f| data[row + f * stride])
    }

    /// Copy the record into a contiguous vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.iter().collect()
    }
}

impl RowView for StridedRowView<'_> {
    #[inline]
    fn n_features(&self) -> usize {
        self.len
    }

    #[inline]
    fn feature(&self, idx: usize) -> u8 {
        assert!(idx < self.len, "feature {idx} out of bounds ({})", self.len);
        self.data[self.row + idx * self.stride]
    }
}

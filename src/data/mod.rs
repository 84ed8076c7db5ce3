//! Feature data: layouts, dense matrices and the column-major feature store.
//!
//! Callers hand over row-major byte buffers (one record per row). Training
//! scans one feature across many rows, so the dataset is transposed once into
//! a [`FeatureStore`] and shared read-only from then on.

mod dense;
mod error;
mod layout;
mod store;
mod traits;

pub use dense::{transpose, ColMatrix, DenseMatrix, RowMatrix};
pub use error::DataError;
pub(crate) use error::checked_len;
pub use layout::{ColMajor, Layout, RowMajor, StridedIter};
pub use store::{FeatureStore, MAX_ROWS};
pub use traits::{RowView, StridedRowView};

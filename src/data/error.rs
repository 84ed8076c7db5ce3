//! Error types for feature buffers and vectors.

/// Errors raised when a buffer or vector does not fit the declared shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    #[error("buffer length {got} does not match {num_rows}x{num_cols} (expected {expected})")]
    ShapeMismatch {
        expected: usize,
        got: usize,
        num_rows: usize,
        num_cols: usize,
    },

    #[error("vector length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("matrix dimensions {num_rows}x{num_cols} overflow usize")]
    DimensionOverflow { num_rows: usize, num_cols: usize },

    #[error("too many rows: {num_rows} exceeds the supported maximum of {max}")]
    TooManyRows { num_rows: usize, max: usize },

    #[error("row {row} out of bounds ({num_rows} rows)")]
    RowOutOfBounds { row: usize, num_rows: usize },
}

/// Compute `num_rows * num_cols`, reporting overflow instead of wrapping.
#[inline]
pub(crate) fn checked_len(num_rows: usize, num_cols: usize) -> Result<usize, DataError> {
    num_rows
        .checked_mul(num_cols)
        .ok_or(DataError::DimensionOverflow { num_rows, num_cols })
}

/// Ensure a buffer holds exactly `num_rows * num_cols` elements.
#[inline]
pub(crate) fn check_shape(got: usize, num_rows: usize, num_cols: usize) -> Result<(), DataError> {
    let expected = checked_len(num_rows, num_cols)?;
    if got != expected {
        return Err(DataError::ShapeMismatch {
            expected,
            got,
            num_rows,
            num_cols,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_shape_accepts_exact_length() {
        assert_eq!(check_shape(6, 2, 3), Ok(()));
        assert_eq!(check_shape(0, 0, 3), Ok(()));
    }

    #[test]
    fn check_shape_reports_mismatch() {
        let err = check_shape(5, 2, 3).unwrap_err();
        assert_eq!(
            err,
            DataError::ShapeMismatch {
                expected: 6,
                got: 5,
                num_rows: 2,
                num_cols: 3
            }
        );
        assert!(err.to_string().contains("2x3"));
    }

    #[test]
    fn checked_len_detects_overflow() {
        assert!(matches!(
            checked_len(usize::MAX, 2),
            Err(DataError::DimensionOverflow { .. })
        ));
    }
}

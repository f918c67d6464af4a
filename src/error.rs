//! Error types for lanemath conversions.
//!
//! Numeric kernels never fail: out-of-domain inputs produce documented
//! undefined results instead of errors. The only fallible operations are the
//! checked conversions at the edge of the API (slices into fixed-size values,
//! checked matrix inversion, parsing).

use std::num::ParseFloatError;

use thiserror::Error;

/// Errors that can occur when converting into lanemath value types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LaneError {
    /// A slice did not hold exactly the number of lanes the target type needs.
    #[error("length mismatch: expected {expected} lanes, got {actual}")]
    LengthMismatch {
        /// Lane count of the target type.
        expected: usize,
        /// Length of the provided slice.
        actual: usize,
    },
    /// `try_inverse` was called on a matrix whose determinant is zero.
    #[error("matrix is singular (determinant {determinant})")]
    SingularMatrix {
        /// The determinant that was computed, as f64.
        determinant: f64,
    },
    /// A string could not be parsed as a half-precision float.
    #[error("invalid half-precision literal: {0}")]
    ParseHalf(#[from] ParseFloatError),
}

/// Result type alias for lanemath operations.
pub type Result<T> = std::result::Result<T, LaneError>;

/// Creates a length mismatch error.
pub fn length_mismatch(expected: usize, actual: usize) -> LaneError {
    LaneError::LengthMismatch { expected, actual }
}

/// Creates a singular matrix error.
pub fn singular_matrix(determinant: f64) -> LaneError {
    LaneError::SingularMatrix { determinant }
}

/// Checks that `actual` equals the lane count of the destination type.
#[inline]
pub(crate) fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(length_mismatch(expected, actual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_display() {
        let error = length_mismatch(4, 3);
        let display = format!("{error}");
        assert!(display.contains("length mismatch"));
        assert!(display.contains("expected 4"));
        assert!(display.contains("got 3"));
    }

    #[test]
    fn test_singular_matrix_display() {
        let error = singular_matrix(0.0);
        let display = format!("{error}");
        assert!(display.contains("singular"));
        assert!(display.contains("determinant 0"));
    }

    #[test]
    fn test_parse_half_from_parse_float_error() {
        let parse_error = "one point five".parse::<f32>().unwrap_err();
        let error: LaneError = parse_error.into();
        assert!(matches!(error, LaneError::ParseHalf(_)));
        assert!(format!("{error}").contains("invalid half-precision literal"));
    }

    #[test]
    fn test_check_len() {
        assert!(check_len(3, 3).is_ok());
        assert_eq!(check_len(3, 2), Err(length_mismatch(3, 2)));
    }

    #[test]
    fn test_error_trait_implementation() {
        let error = length_mismatch(2, 5);

        let _: &dyn std::error::Error = &error;

        assert!(std::error::Error::source(&error).is_none());
    }
}

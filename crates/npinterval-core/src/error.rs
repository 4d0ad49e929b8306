//! Error taxonomy for interval operations.
//!
//! NaN is deliberately absent: a NaN-valued interval is a regular value that
//! propagates through arithmetic and never raises.

use crate::Interval;
use thiserror::Error;

/// Errors produced by interval construction, array kernels and registration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntervalError {
    /// Operand containers have incompatible shapes.
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },

    /// Checked division by an interval that contains zero.
    #[error("Division by zero-containing interval {divisor}")]
    DivisionByZero { divisor: Interval },

    /// Direct construction with `lower > upper`.
    #[error("Invalid interval: lower bound {lower} > upper bound {upper}")]
    InvariantViolation { lower: f64, upper: f64 },

    /// A dtype name is already claimed in the registry.
    #[error("Conflicting registration: dtype '{name}' is already registered")]
    ConflictingRegistration { name: String },

    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Too many dimensions for subdivision: {dims} (2^{dims} orthants)")]
    TooManyDimensions { dims: usize },

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
}

impl IntervalError {
    /// Create a ShapeMismatch error.
    ///
    /// Identical shapes indicate a bug in the caller's compatibility check.
    #[track_caller]
    pub fn shape_mismatch(expected: Vec<usize>, got: Vec<usize>) -> Self {
        debug_assert_ne!(
            expected, got,
            "ShapeMismatch created with identical shapes"
        );
        IntervalError::ShapeMismatch { expected, got }
    }
}

pub type Result<T> = std::result::Result<T, IntervalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_helper() {
        let err = IntervalError::shape_mismatch(vec![2, 3], vec![3, 2]);
        match err {
            IntervalError::ShapeMismatch { expected, got } => {
                assert_eq!(expected, vec![2, 3]);
                assert_eq!(got, vec![3, 2]);
            }
            _ => panic!("Expected ShapeMismatch"),
        }
    }

    #[test]
    #[should_panic(expected = "identical shapes")]
    #[cfg(debug_assertions)]
    fn test_shape_mismatch_identical_shapes_is_a_bug() {
        let _ = IntervalError::shape_mismatch(vec![4], vec![4]);
    }

    #[test]
    fn test_error_display() {
        let err = IntervalError::InvariantViolation {
            lower: 2.0,
            upper: 1.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid interval: lower bound 2 > upper bound 1"
        );

        let err = IntervalError::DivisionByZero {
            divisor: Interval::new(-1.0, 1.0).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Division by zero-containing interval [-1, 1]"
        );

        let err = IntervalError::ConflictingRegistration {
            name: "interval".to_string(),
        };
        assert!(err.to_string().contains("'interval'"));
    }
}

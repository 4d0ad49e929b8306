//! Size and health measures for interval arrays.

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

use crate::array::IntervalArray;
use crate::convert::get_lu;

/// How per-element widths are reduced to a single number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthNorm {
    /// `sqrt(sum(w_i^2))`.
    #[default]
    Euclidean,
    /// `max(w_i)`.
    Max,
    /// `sum(w_i)`.
    Sum,
}

/// Width of every element, `upper - lower` rounded up.
pub fn widths(array: &IntervalArray) -> ArrayD<f64> {
    array.as_array().mapv(|x| x.width())
}

/// Euclidean norm of the element widths, divided by `scale` when given.
///
/// Empty arrays have width 0; any NaN width makes the result NaN.
pub fn width(array: &IntervalArray, scale: Option<f64>) -> f64 {
    width_with_norm(array, WidthNorm::Euclidean, scale)
}

pub fn width_with_norm(array: &IntervalArray, norm: WidthNorm, scale: Option<f64>) -> f64 {
    let mut total = 0.0_f64;
    for w in array.iter().map(|x| x.width()) {
        if w.is_nan() {
            return f64::NAN;
        }
        total = match norm {
            WidthNorm::Euclidean => total.hypot(w),
            WidthNorm::Max => total.max(w),
            WidthNorm::Sum => total + w,
        };
    }
    match scale {
        Some(s) => total / s,
        None => total,
    }
}

/// Largest element width.
pub fn max_width(array: &IntervalArray) -> f64 {
    width_with_norm(array, WidthNorm::Max, None)
}

/// True iff any lower or upper bound is NaN.
pub fn has_nan(array: &IntervalArray) -> bool {
    let (lower, upper) = get_lu(array);
    lower.iter().chain(upper.iter()).any(|b| b.is_nan())
}

impl IntervalArray {
    /// See [`width`].
    pub fn width(&self, scale: Option<f64>) -> f64 {
        width(self, scale)
    }

    pub fn widths(&self) -> ArrayD<f64> {
        widths(self)
    }

    pub fn has_nan(&self) -> bool {
        has_nan(self)
    }
}

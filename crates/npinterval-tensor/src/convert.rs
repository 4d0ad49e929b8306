//! Conversion between interval arrays and plain float representations.
//!
//! Three float forms are supported:
//! - a lower/upper pair of same-shape arrays,
//! - a single stacked array with a trailing axis of length 2 (`[..., 0]` lower,
//!   `[..., 1]` upper),
//! - a center/perturbation pair (`[c - p, c + p]`).
//!
//! Building intervals from lower/upper data is tolerant: a reversed pair is
//! swapped rather than rejected. Direct [`Interval::new`] stays strict.

use ndarray::{ArrayD, ArrayViewD, Axis, Dimension, IxDyn, Zip};
use npinterval_core::rounding::{add_up, sub_down};
use npinterval_core::{Interval, IntervalError, Result};

use crate::array::IntervalArray;

/// Pair bounds into intervals, swapping reversed pairs.
fn pair_bounds(lower: ArrayViewD<'_, f64>, upper: ArrayViewD<'_, f64>) -> Result<IntervalArray> {
    if lower.shape() != upper.shape() {
        return Err(IntervalError::shape_mismatch(
            lower.shape().to_vec(),
            upper.shape().to_vec(),
        ));
    }
    let data = Zip::from(&lower)
        .and(&upper)
        .map_collect(|&l, &u| Interval::from_unordered(l, u));
    Ok(IntervalArray::new(data))
}

/// Split into `(lower, upper)` arrays of the source shape.
pub fn get_lu(array: &IntervalArray) -> (ArrayD<f64>, ArrayD<f64>) {
    let data = array.as_array();
    (data.mapv(Interval::lower), data.mapv(Interval::upper))
}

/// Stacked form: shape `array.shape() + [2]`.
pub fn as_lu(array: &IntervalArray) -> ArrayD<f64> {
    let data = array.as_array();
    let ndim = data.ndim();
    let mut shape = data.shape().to_vec();
    shape.push(2);
    ArrayD::from_shape_fn(IxDyn(&shape), |ix| {
        let x = data[&ix.slice()[..ndim]];
        if ix[ndim] == 0 {
            x.lower()
        } else {
            x.upper()
        }
    })
}

/// Build intervals from separate bound arrays of identical shape.
pub fn get_iarray(lower: &ArrayD<f64>, upper: &ArrayD<f64>) -> Result<IntervalArray> {
    pair_bounds(lower.view(), upper.view())
}

/// Inverse of [`as_lu`]; the trailing axis must have length 2.
pub fn as_iarray(lu: &ArrayD<f64>) -> Result<IntervalArray> {
    match lu.shape().last() {
        Some(2) => {}
        _ => {
            return Err(IntervalError::InvalidShape(format!(
                "stacked bounds need a trailing axis of length 2, got shape {:?}",
                lu.shape()
            )))
        }
    }
    let axis = Axis(lu.ndim() - 1);
    pair_bounds(lu.index_axis(axis, 0), lu.index_axis(axis, 1))
}

/// Build `[c - p, c + p]` per element, rounded outward.
///
/// NaN inputs give NaN-valued intervals. A negative perturbation would
/// describe a reversed interval and is rejected.
pub fn from_cent_pert(center: &ArrayD<f64>, perturbation: &ArrayD<f64>) -> Result<IntervalArray> {
    if center.shape() != perturbation.shape() {
        return Err(IntervalError::shape_mismatch(
            center.shape().to_vec(),
            perturbation.shape().to_vec(),
        ));
    }
    if let Some((&c, &p)) = center
        .iter()
        .zip(perturbation.iter())
        .find(|&(_, &p)| p < 0.0)
    {
        return Err(IntervalError::InvariantViolation {
            lower: c - p,
            upper: c + p,
        });
    }
    let data = Zip::from(center)
        .and(perturbation)
        .map_collect(|&c, &p| {
            if c.is_nan() || p.is_nan() {
                Interval::NAN
            } else {
                Interval::new_unchecked(sub_down(c, p), add_up(c, p))
            }
        });
    Ok(IntervalArray::new(data))
}

/// Split into `(center, perturbation)`, derived from [`get_lu`].
///
/// The perturbation is rounded up, so re-centering encloses the source up to
/// the rounding of the midpoint.
pub fn get_cent_pert(array: &IntervalArray) -> (ArrayD<f64>, ArrayD<f64>) {
    let (lower, upper) = get_lu(array);
    let center = Zip::from(&lower)
        .and(&upper)
        .map_collect(|&l, &u| l.midpoint(u));
    let perturbation = Zip::from(&lower)
        .and(&upper)
        .map_collect(|&l, &u| Interval::from_unordered(l, u).radius());
    (center, perturbation)
}

impl IntervalArray {
    pub fn to_lower_upper(&self) -> (ArrayD<f64>, ArrayD<f64>) {
        get_lu(self)
    }

    pub fn from_lower_upper(lower: &ArrayD<f64>, upper: &ArrayD<f64>) -> Result<IntervalArray> {
        get_iarray(lower, upper)
    }

    pub fn to_stacked_lu(&self) -> ArrayD<f64> {
        as_lu(self)
    }

    pub fn from_stacked_lu(lu: &ArrayD<f64>) -> Result<IntervalArray> {
        as_iarray(lu)
    }

    pub fn to_center_perturbation(&self) -> (ArrayD<f64>, ArrayD<f64>) {
        get_cent_pert(self)
    }

    pub fn from_center_perturbation(
        center: &ArrayD<f64>,
        perturbation: &ArrayD<f64>,
    ) -> Result<IntervalArray> {
        from_cent_pert(center, perturbation)
    }
}

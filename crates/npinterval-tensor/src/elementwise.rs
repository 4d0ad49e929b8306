//! Broadcasting elementwise kernels.
//!
//! Kernels allocate a fresh output array and never write to their inputs.
//! Above [`ElementwiseConfig::parallel_threshold`] output elements the work is
//! split across the rayon pool via ndarray's parallel `Zip`; the result is
//! identical to the serial path.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

use ndarray::{ArrayD, IxDyn, Zip};
use npinterval_core::{Interval, IntervalError, Result};
use tracing::trace;

use crate::config::ElementwiseConfig;

/// Element types the generic loops are instantiated for.
///
/// Both `f64` and [`Interval`] implement it, so one kernel serves plain
/// float arrays and interval arrays alike.
pub trait ElementwiseScalar:
    Copy
    + Debug
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    fn minimum(self, other: Self) -> Self;
    fn maximum(self, other: Self) -> Self;
    fn is_nan(self) -> bool;

    fn equal(self, other: Self) -> bool;
    fn not_equal(self, other: Self) -> bool;
    fn less(self, other: Self) -> bool;
    fn less_equal(self, other: Self) -> bool;
    fn greater(self, other: Self) -> bool;
    fn greater_equal(self, other: Self) -> bool;
}

impl ElementwiseScalar for Interval {
    #[inline]
    fn minimum(self, other: Self) -> Self {
        Interval::minimum(self, other)
    }

    #[inline]
    fn maximum(self, other: Self) -> Self {
        Interval::maximum(self, other)
    }

    #[inline]
    fn is_nan(self) -> bool {
        Interval::is_nan(self)
    }

    #[inline]
    fn equal(self, other: Self) -> bool {
        Interval::equal(self, other)
    }

    #[inline]
    fn not_equal(self, other: Self) -> bool {
        Interval::not_equal(self, other)
    }

    #[inline]
    fn less(self, other: Self) -> bool {
        Interval::less(self, other)
    }

    #[inline]
    fn less_equal(self, other: Self) -> bool {
        Interval::less_equal(self, other)
    }

    #[inline]
    fn greater(self, other: Self) -> bool {
        Interval::greater(self, other)
    }

    #[inline]
    fn greater_equal(self, other: Self) -> bool {
        Interval::greater_equal(self, other)
    }
}

/// NaN-propagating, like the interval lattice operations.
impl ElementwiseScalar for f64 {
    #[inline]
    fn minimum(self, other: Self) -> Self {
        if self.is_nan() || other.is_nan() {
            f64::NAN
        } else {
            self.min(other)
        }
    }

    #[inline]
    fn maximum(self, other: Self) -> Self {
        if self.is_nan() || other.is_nan() {
            f64::NAN
        } else {
            self.max(other)
        }
    }

    #[inline]
    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }

    #[inline]
    fn equal(self, other: Self) -> bool {
        self == other
    }

    #[inline]
    fn not_equal(self, other: Self) -> bool {
        !self.is_nan() && !other.is_nan() && self != other
    }

    #[inline]
    fn less(self, other: Self) -> bool {
        self < other
    }

    #[inline]
    fn less_equal(self, other: Self) -> bool {
        self <= other
    }

    #[inline]
    fn greater(self, other: Self) -> bool {
        self > other
    }

    #[inline]
    fn greater_equal(self, other: Self) -> bool {
        self >= other
    }
}

/// Combine two shapes under NumPy broadcasting rules.
///
/// Shapes are right-aligned; each dimension pair must be equal or contain a 1.
pub fn broadcast_shapes(a: &[usize], b: &[usize]) -> Result<Vec<usize>> {
    let ndim = a.len().max(b.len());
    let mut out = vec![0; ndim];
    for i in 0..ndim {
        let da = if i < ndim - a.len() { 1 } else { a[i - (ndim - a.len())] };
        let db = if i < ndim - b.len() { 1 } else { b[i - (ndim - b.len())] };
        out[i] = match (da, db) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            _ => return Err(IntervalError::shape_mismatch(a.to_vec(), b.to_vec())),
        };
    }
    Ok(out)
}

/// Apply `f` to broadcast pairs of elements from `a` and `b`.
pub fn zip_with<A, B, R, F>(
    a: &ArrayD<A>,
    b: &ArrayD<B>,
    config: &ElementwiseConfig,
    f: F,
) -> Result<ArrayD<R>>
where
    A: Copy + Send + Sync,
    B: Copy + Send + Sync,
    R: Send,
    F: Fn(A, B) -> R + Send + Sync,
{
    let shape = broadcast_shapes(a.shape(), b.shape())?;
    let dim = IxDyn(&shape);
    let av = a
        .broadcast(dim.clone())
        .ok_or_else(|| IntervalError::shape_mismatch(shape.clone(), a.shape().to_vec()))?;
    let bv = b
        .broadcast(dim)
        .ok_or_else(|| IntervalError::shape_mismatch(shape.clone(), b.shape().to_vec()))?;

    let len = av.len();
    let out = if config.use_parallel(len) {
        trace!(len, shape = ?shape, "parallel binary kernel");
        Zip::from(&av)
            .and(&bv)
            .par_map_collect(|&x, &y| f(x, y))
    } else {
        Zip::from(&av).and(&bv).map_collect(|&x, &y| f(x, y))
    };
    Ok(out)
}

/// Apply `f` to every element of `a`.
pub fn map_with<A, R, F>(a: &ArrayD<A>, config: &ElementwiseConfig, f: F) -> ArrayD<R>
where
    A: Copy + Send + Sync,
    R: Send,
    F: Fn(A) -> R + Send + Sync,
{
    if config.use_parallel(a.len()) {
        trace!(len = a.len(), "parallel unary kernel");
        Zip::from(a).par_map_collect(|&x| f(x))
    } else {
        Zip::from(a).map_collect(|&x| f(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_broadcast_shapes() {
        assert_eq!(broadcast_shapes(&[2, 3], &[2, 3]).unwrap(), vec![2, 3]);
        assert_eq!(broadcast_shapes(&[2, 3], &[3]).unwrap(), vec![2, 3]);
        assert_eq!(broadcast_shapes(&[4, 1], &[1, 5]).unwrap(), vec![4, 5]);
        assert_eq!(broadcast_shapes(&[], &[7]).unwrap(), vec![7]);
        assert_eq!(broadcast_shapes(&[0], &[1]).unwrap(), vec![0]);
    }

    #[test]
    fn test_broadcast_shapes_mismatch() {
        let err = broadcast_shapes(&[2, 3], &[4]).unwrap_err();
        assert_eq!(
            err,
            IntervalError::ShapeMismatch {
                expected: vec![2, 3],
                got: vec![4]
            }
        );
    }

    #[test]
    fn test_zip_with_broadcasts_row() {
        let a = arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn();
        let b = arr1(&[10.0, 20.0]).into_dyn();
        let out = zip_with(&a, &b, &ElementwiseConfig::default(), |x, y| x + y).unwrap();
        assert_eq!(out, arr2(&[[11.0, 22.0], [13.0, 24.0]]).into_dyn());
    }

    #[test]
    fn test_parallel_matches_serial() {
        let a = ArrayD::from_shape_fn(IxDyn(&[64, 33]), |ix| {
            Interval::from_unordered(ix[0] as f64, -(ix[1] as f64) * 0.5)
        });
        let b = ArrayD::from_shape_fn(IxDyn(&[33]), |ix| Interval::point(ix[0] as f64 + 1.0));
        let serial = zip_with(&a, &b, &ElementwiseConfig::serial(), |x, y| x * y).unwrap();
        let parallel = zip_with(&a, &b, &ElementwiseConfig::parallel(), |x, y| x * y).unwrap();
        assert_eq!(serial, parallel);

        let serial = map_with(&a, &ElementwiseConfig::serial(), Interval::square);
        let parallel = map_with(&a, &ElementwiseConfig::parallel(), Interval::square);
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_inputs_untouched() {
        let a = arr1(&[1.0, 2.0]).into_dyn();
        let before = a.clone();
        let _ = map_with(&a, &ElementwiseConfig::default(), |x: f64| x * 2.0);
        assert_eq!(a, before);
    }

    #[test]
    fn test_float_lattice_propagates_nan() {
        assert!(<f64 as ElementwiseScalar>::minimum(1.0, f64::NAN).is_nan());
        assert!(<f64 as ElementwiseScalar>::maximum(f64::NAN, 1.0).is_nan());
        assert_eq!(<f64 as ElementwiseScalar>::minimum(1.0, -2.0), -2.0);
        assert!(!<f64 as ElementwiseScalar>::not_equal(f64::NAN, 1.0));
    }
}

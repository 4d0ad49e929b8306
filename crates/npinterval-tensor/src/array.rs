//! Owned n-dimensional arrays of intervals.

use ndarray::{ArrayD, ArrayViewD, IxDyn};
use npinterval_core::{Interval, IntervalError, Result};
use serde::{Deserialize, Serialize};

/// An arbitrarily shaped array of [`Interval`] values.
///
/// The element type is fixed, so an `IntervalArray` can never mix intervals
/// with plain floats. All operations return new arrays; none mutate or alias
/// the input's storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalArray {
    data: ArrayD<Interval>,
}

impl IntervalArray {
    pub fn new(data: ArrayD<Interval>) -> Self {
        Self { data }
    }

    /// A 1-D array (an interval box) from a vector of intervals.
    pub fn from_vec(intervals: Vec<Interval>) -> Self {
        let n = intervals.len();
        Self {
            data: ArrayD::from_shape_vec(IxDyn(&[n]), intervals)
                .unwrap_or_else(|_| unreachable!("1-D shape always matches vector length")),
        }
    }

    /// Create an array of the given shape from intervals in row-major order.
    pub fn from_shape_vec(shape: &[usize], intervals: Vec<Interval>) -> Result<Self> {
        let len = intervals.len();
        let data = ArrayD::from_shape_vec(IxDyn(shape), intervals).map_err(|e| {
            IntervalError::InvalidShape(format!(
                "cannot arrange {len} intervals as shape {shape:?}: {e}"
            ))
        })?;
        Ok(Self { data })
    }

    pub fn from_elem(shape: &[usize], value: Interval) -> Self {
        Self {
            data: ArrayD::from_elem(IxDyn(shape), value),
        }
    }

    /// An array filled with [`Interval::ZERO`].
    pub fn zeros(shape: &[usize]) -> Self {
        Self::from_elem(shape, Interval::ZERO)
    }

    /// An array filled with [`Interval::ONE`].
    pub fn ones(shape: &[usize]) -> Self {
        Self::from_elem(shape, Interval::ONE)
    }

    /// Degenerate intervals from a float array.
    pub fn from_points(values: &ArrayD<f64>) -> Self {
        Self {
            data: values.mapv(Interval::point),
        }
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: &[usize]) -> Option<Interval> {
        self.data.get(IxDyn(index)).copied()
    }

    /// Elements in logical (row-major) order.
    pub fn iter(&self) -> impl Iterator<Item = Interval> + '_ {
        self.data.iter().copied()
    }

    pub fn as_array(&self) -> &ArrayD<Interval> {
        &self.data
    }

    pub fn view(&self) -> ArrayViewD<'_, Interval> {
        self.data.view()
    }

    pub fn into_array(self) -> ArrayD<Interval> {
        self.data
    }

    /// Reshape into a new array; the element count must not change.
    pub fn reshape(&self, shape: &[usize]) -> Result<IntervalArray> {
        Self::from_shape_vec(shape, self.iter().collect())
    }

    /// Flatten to one dimension in row-major order.
    pub fn flatten(&self) -> IntervalArray {
        Self::from_vec(self.iter().collect())
    }
}

impl From<ArrayD<Interval>> for IntervalArray {
    fn from(data: ArrayD<Interval>) -> Self {
        Self::new(data)
    }
}

impl From<Vec<Interval>> for IntervalArray {
    fn from(intervals: Vec<Interval>) -> Self {
        Self::from_vec(intervals)
    }
}

impl FromIterator<Interval> for IntervalArray {
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

//! Bisection of interval boxes into orthants.
//!
//! A box is a 1-D [`IntervalArray`] of `n` intervals. Splitting every
//! dimension at its midpoint yields `2^n` sub-boxes. Sub-box `k` takes, for
//! dimension `j`, the lower half `[l_j, m_j]` when bit `j` of `k` is clear and
//! the upper half `[m_j, u_j]` when it is set. Sub-box 0 is therefore the box
//! with every upper bound replaced by its midpoint.

use npinterval_core::{Interval, IntervalError, Result};
use rayon::prelude::*;
use tracing::debug;

use crate::array::IntervalArray;

/// Subdivisions producing at least this many boxes are built on the rayon pool.
const PARALLEL_ORTHANTS: usize = 1 << 10;

/// Lazy, ordered sequence of the orthants of a box.
///
/// Yields exactly the boxes [`half_intervals`] returns, in the same order,
/// without materializing all `2^n` of them.
#[derive(Debug, Clone)]
pub struct Orthants {
    lower: Vec<f64>,
    upper: Vec<f64>,
    mid: Vec<f64>,
    next: usize,
    count: usize,
}

impl Orthants {
    pub fn new(interval_box: &IntervalArray) -> Result<Self> {
        if interval_box.ndim() != 1 {
            return Err(IntervalError::InvalidShape(format!(
                "subdivision needs a 1-D box, got shape {:?}",
                interval_box.shape()
            )));
        }
        let dims = interval_box.len();
        if dims >= usize::BITS as usize {
            return Err(IntervalError::TooManyDimensions { dims });
        }

        let lower: Vec<f64> = interval_box.iter().map(Interval::lower).collect();
        let upper: Vec<f64> = interval_box.iter().map(Interval::upper).collect();
        let mid = lower
            .iter()
            .zip(&upper)
            .map(|(&l, &u)| l.midpoint(u))
            .collect();

        Ok(Self {
            lower,
            upper,
            mid,
            next: 0,
            count: 1usize << dims,
        })
    }

    /// Number of dimensions of the source box.
    pub fn dims(&self) -> usize {
        self.lower.len()
    }

    /// Total number of orthants, `2^dims`, independent of iteration progress.
    pub fn total(&self) -> usize {
        self.count
    }

    /// The `k`-th orthant, for resuming a traversal from a saved index.
    pub fn orthant(&self, k: usize) -> Result<IntervalArray> {
        if k >= self.count {
            return Err(IntervalError::InvalidShape(format!(
                "orthant index {k} out of range for {} dimensions",
                self.dims()
            )));
        }
        Ok(self.build(k))
    }

    fn build(&self, k: usize) -> IntervalArray {
        (0..self.dims())
            .map(|j| {
                if (k >> j) & 1 == 0 {
                    Interval::from_unordered(self.lower[j], self.mid[j])
                } else {
                    Interval::from_unordered(self.mid[j], self.upper[j])
                }
            })
            .collect()
    }
}

impl Iterator for Orthants {
    type Item = IntervalArray;

    fn next(&mut self) -> Option<IntervalArray> {
        if self.next >= self.count {
            return None;
        }
        let k = self.next;
        self.next += 1;
        Some(self.build(k))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<IntervalArray> {
        self.next = self.next.saturating_add(n).min(self.count);
        self.next()
    }
}

impl ExactSizeIterator for Orthants {}

impl std::iter::FusedIterator for Orthants {}

/// Split a box into all `2^n` orthants, in ascending index order.
///
/// A box with no dimensions yields itself.
pub fn half_intervals(interval_box: &IntervalArray) -> Result<Vec<IntervalArray>> {
    let orthants = Orthants::new(interval_box)?;
    debug!(
        dims = orthants.dims(),
        count = orthants.total(),
        "subdividing box"
    );
    if orthants.total() >= PARALLEL_ORTHANTS {
        Ok((0..orthants.total())
            .into_par_iter()
            .map(|k| orthants.build(k))
            .collect())
    } else {
        Ok(orthants.collect())
    }
}

impl IntervalArray {
    /// See [`half_intervals`].
    pub fn half_intervals(&self) -> Result<Vec<IntervalArray>> {
        half_intervals(self)
    }

    /// See [`Orthants`].
    pub fn orthants(&self) -> Result<Orthants> {
        Orthants::new(self)
    }
}

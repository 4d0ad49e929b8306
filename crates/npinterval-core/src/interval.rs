//! The closed interval scalar type and its arithmetic.

use crate::rounding::{add_down, add_up, div_down, div_up, mul_down, mul_up, sub_down, sub_up};
use crate::{IntervalError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, RangeInclusive, Sub};

/// A closed real interval `[lower, upper]`.
///
/// Intervals are immutable `Copy` values: every operation returns a new
/// interval. A NaN in either bound makes the interval NaN-valued; arithmetic
/// on a NaN-valued operand yields [`Interval::NAN`] and every comparison
/// involving one is `false`.
///
/// Arithmetic is rounded outward, so the result always encloses the exact
/// real result set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    lower: f64,
    upper: f64,
}

#[derive(Deserialize)]
struct RawInterval {
    lower: f64,
    upper: f64,
}

impl TryFrom<RawInterval> for Interval {
    type Error = IntervalError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Interval::new(raw.lower, raw.upper)
    }
}

impl Interval {
    /// `[0, 0]`.
    pub const ZERO: Interval = Interval {
        lower: 0.0,
        upper: 0.0,
    };

    /// `[1, 1]`.
    pub const ONE: Interval = Interval {
        lower: 1.0,
        upper: 1.0,
    };

    /// The whole extended real line, `[-inf, +inf]`.
    pub const ENTIRE: Interval = Interval {
        lower: f64::NEG_INFINITY,
        upper: f64::INFINITY,
    };

    /// The NaN-valued interval.
    pub const NAN: Interval = Interval {
        lower: f64::NAN,
        upper: f64::NAN,
    };

    /// Create a new interval.
    ///
    /// Reversed bounds are rejected, never reordered. NaN bounds are accepted
    /// and produce a NaN-valued interval.
    #[inline]
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if lower > upper {
            return Err(IntervalError::InvariantViolation { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Create an interval from bounds the caller already knows are ordered.
    #[inline]
    pub fn new_unchecked(lower: f64, upper: f64) -> Self {
        debug_assert!(
            !(lower > upper),
            "Invalid interval: {lower} > {upper}"
        );
        Self { lower, upper }
    }

    /// Create a degenerate interval `[value, value]`.
    #[inline]
    pub const fn point(value: f64) -> Self {
        Self {
            lower: value,
            upper: value,
        }
    }

    /// Create an interval from two bounds in either order.
    #[inline]
    pub fn from_unordered(a: f64, b: f64) -> Self {
        if a > b {
            Self { lower: b, upper: a }
        } else {
            Self { lower: a, upper: b }
        }
    }

    #[inline]
    pub const fn lower(self) -> f64 {
        self.lower
    }

    #[inline]
    pub const fn upper(self) -> f64 {
        self.upper
    }

    /// True if either bound is NaN.
    #[inline]
    pub fn is_nan(self) -> bool {
        self.lower.is_nan() || self.upper.is_nan()
    }

    /// True if the interval is a single real number.
    #[inline]
    pub fn is_degenerate(self) -> bool {
        self.lower == self.upper
    }

    /// True if either bound is infinite.
    #[inline]
    pub fn is_unbounded(self) -> bool {
        self.lower.is_infinite() || self.upper.is_infinite()
    }

    /// False only for exactly `[0, 0]`.
    #[inline]
    pub fn is_nonzero(self) -> bool {
        !(self.lower == 0.0 && self.upper == 0.0)
    }

    #[inline]
    pub fn contains(self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    #[inline]
    pub fn contains_zero(self) -> bool {
        self.contains(0.0)
    }

    /// Width `upper - lower`, rounded up.
    #[inline]
    pub fn width(self) -> f64 {
        sub_up(self.upper, self.lower)
    }

    /// Midpoint `(lower + upper) / 2`, computed without intermediate overflow.
    #[inline]
    pub fn midpoint(self) -> f64 {
        self.lower.midpoint(self.upper)
    }

    /// Half-width, rounded up.
    #[inline]
    pub fn radius(self) -> f64 {
        self.width() * 0.5
    }

    /// Bound-wise equality. False if either operand is NaN-valued.
    #[inline]
    pub fn equal(self, other: Interval) -> bool {
        !self.is_nan() && !other.is_nan() && self == other
    }

    /// Negation of [`equal`](Self::equal), except that NaN operands give false.
    #[inline]
    pub fn not_equal(self, other: Interval) -> bool {
        !self.is_nan() && !other.is_nan() && self != other
    }

    /// Every point of `self` is below every point of `other`.
    #[inline]
    pub fn less(self, other: Interval) -> bool {
        !self.is_nan() && !other.is_nan() && self.upper < other.lower
    }

    /// `self` is nowhere above `other`, or the two are identical.
    #[inline]
    pub fn less_equal(self, other: Interval) -> bool {
        !self.is_nan() && !other.is_nan() && (self.upper <= other.lower || self == other)
    }

    #[inline]
    pub fn greater(self, other: Interval) -> bool {
        other.less(self)
    }

    #[inline]
    pub fn greater_equal(self, other: Interval) -> bool {
        other.less_equal(self)
    }

    /// `self ⊆ other`.
    #[inline]
    pub fn subseteq(self, other: Interval) -> bool {
        !self.is_nan()
            && !other.is_nan()
            && self.lower >= other.lower
            && self.upper <= other.upper
    }

    /// `self ⊇ other`.
    #[inline]
    pub fn supseteq(self, other: Interval) -> bool {
        other.subseteq(self)
    }

    /// Strict containment in the interior of `other`.
    #[inline]
    pub fn subset(self, other: Interval) -> bool {
        !self.is_nan() && !other.is_nan() && self.lower > other.lower && self.upper < other.upper
    }

    #[inline]
    pub fn supset(self, other: Interval) -> bool {
        other.subset(self)
    }

    /// Convex hull of both intervals.
    #[inline]
    pub fn hull(self, other: Interval) -> Interval {
        if self.is_nan() || other.is_nan() {
            return Interval::NAN;
        }
        Interval {
            lower: self.lower.min(other.lower),
            upper: self.upper.max(other.upper),
        }
    }

    /// Alias of [`hull`](Self::hull); the union of two intervals as an interval.
    #[inline]
    pub fn union(self, other: Interval) -> Interval {
        self.hull(other)
    }

    /// Intersection, or `None` if the intervals are disjoint.
    #[inline]
    pub fn intersection(self, other: Interval) -> Option<Interval> {
        if self.is_nan() || other.is_nan() {
            return Some(Interval::NAN);
        }
        let lower = self.lower.max(other.lower);
        let upper = self.upper.min(other.upper);
        if lower <= upper {
            Some(Interval { lower, upper })
        } else {
            None
        }
    }

    /// Bound-wise minimum: encloses `min(x, y)` for `x ∈ self`, `y ∈ other`.
    #[inline]
    pub fn minimum(self, other: Interval) -> Interval {
        if self.is_nan() || other.is_nan() {
            return Interval::NAN;
        }
        Interval {
            lower: self.lower.min(other.lower),
            upper: self.upper.min(other.upper),
        }
    }

    /// Bound-wise maximum: encloses `max(x, y)` for `x ∈ self`, `y ∈ other`.
    #[inline]
    pub fn maximum(self, other: Interval) -> Interval {
        if self.is_nan() || other.is_nan() {
            return Interval::NAN;
        }
        Interval {
            lower: self.lower.max(other.lower),
            upper: self.upper.max(other.upper),
        }
    }

    /// Division that rejects zero-containing divisors.
    ///
    /// The `/` operator instead maps them to [`Interval::ENTIRE`]. A NaN-valued
    /// operand is not an error and yields [`Interval::NAN`].
    pub fn checked_div(self, rhs: Interval) -> Result<Interval> {
        if self.is_nan() || rhs.is_nan() {
            return Ok(Interval::NAN);
        }
        if rhs.contains_zero() {
            return Err(IntervalError::DivisionByZero { divisor: rhs });
        }
        Ok(self / rhs)
    }

    /// `1 / self`.
    #[inline]
    pub fn recip(self) -> Interval {
        Interval::ONE / self
    }
}

/// Corner product with the `0 * ±inf = 0` convention.
#[inline]
fn corner_mul_down(a: f64, b: f64) -> f64 {
    if a == 0.0 || b == 0.0 {
        0.0
    } else {
        mul_down(a, b)
    }
}

#[inline]
fn corner_mul_up(a: f64, b: f64) -> f64 {
    if a == 0.0 || b == 0.0 {
        0.0
    } else {
        mul_up(a, b)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::ZERO
    }
}

impl Add for Interval {
    type Output = Interval;

    #[inline]
    fn add(self, rhs: Interval) -> Interval {
        if self.is_nan() || rhs.is_nan() {
            return Interval::NAN;
        }
        Interval {
            lower: add_down(self.lower, rhs.lower),
            upper: add_up(self.upper, rhs.upper),
        }
    }
}

impl Sub for Interval {
    type Output = Interval;

    #[inline]
    fn sub(self, rhs: Interval) -> Interval {
        if self.is_nan() || rhs.is_nan() {
            return Interval::NAN;
        }
        Interval {
            lower: sub_down(self.lower, rhs.upper),
            upper: sub_up(self.upper, rhs.lower),
        }
    }
}

impl Mul for Interval {
    type Output = Interval;

    #[inline]
    fn mul(self, rhs: Interval) -> Interval {
        if self.is_nan() || rhs.is_nan() {
            return Interval::NAN;
        }
        let (a, b, c, d) = (self.lower, self.upper, rhs.lower, rhs.upper);
        let lower = corner_mul_down(a, c)
            .min(corner_mul_down(a, d))
            .min(corner_mul_down(b, c))
            .min(corner_mul_down(b, d));
        let upper = corner_mul_up(a, c)
            .max(corner_mul_up(a, d))
            .max(corner_mul_up(b, c))
            .max(corner_mul_up(b, d));
        Interval { lower, upper }
    }
}

impl Div for Interval {
    type Output = Interval;

    /// Interval quotient. A divisor containing zero yields [`Interval::ENTIRE`].
    #[inline]
    fn div(self, rhs: Interval) -> Interval {
        if self.is_nan() || rhs.is_nan() {
            return Interval::NAN;
        }
        if rhs.contains_zero() {
            return Interval::ENTIRE;
        }
        let (a, b, c, d) = (self.lower, self.upper, rhs.lower, rhs.upper);
        // f64::min/max skip the NaN of an inf/inf corner.
        let lower = div_down(a, c)
            .min(div_down(a, d))
            .min(div_down(b, c))
            .min(div_down(b, d));
        let upper = div_up(a, c)
            .max(div_up(a, d))
            .max(div_up(b, c))
            .max(div_up(b, d));
        Interval { lower, upper }
    }
}

impl Neg for Interval {
    type Output = Interval;

    #[inline]
    fn neg(self) -> Interval {
        if self.is_nan() {
            return Interval::NAN;
        }
        Interval {
            lower: -self.upper,
            upper: -self.lower,
        }
    }
}

macro_rules! impl_scalar_ops {
    ($($trait:ident :: $method:ident),* $(,)?) => {
        $(
            impl $trait<f64> for Interval {
                type Output = Interval;

                #[inline]
                fn $method(self, rhs: f64) -> Interval {
                    $trait::$method(self, Interval::point(rhs))
                }
            }

            impl $trait<Interval> for f64 {
                type Output = Interval;

                #[inline]
                fn $method(self, rhs: Interval) -> Interval {
                    $trait::$method(Interval::point(self), rhs)
                }
            }
        )*
    };
}

impl_scalar_ops!(Add::add, Sub::sub, Mul::mul, Div::div);

impl PartialOrd for Interval {
    /// Partial order by disjointness.
    ///
    /// `Less` iff `self.upper < other.lower`, `Greater` iff
    /// `self.lower > other.upper`, `Equal` iff the bounds are identical.
    /// Overlapping distinct intervals and NaN-valued intervals are
    /// incomparable.
    ///
    /// `<=` and `>=` follow [`less_equal`](Interval::less_equal) and
    /// [`greater_equal`](Interval::greater_equal), so intervals that only
    /// touch at an endpoint satisfy `<=` while `partial_cmp` is `None`.
    fn partial_cmp(&self, other: &Interval) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            None
        } else if self == other {
            Some(Ordering::Equal)
        } else if self.upper < other.lower {
            Some(Ordering::Less)
        } else if self.lower > other.upper {
            Some(Ordering::Greater)
        } else {
            None
        }
    }

    #[inline]
    fn lt(&self, other: &Interval) -> bool {
        self.less(*other)
    }

    #[inline]
    fn le(&self, other: &Interval) -> bool {
        self.less_equal(*other)
    }

    #[inline]
    fn gt(&self, other: &Interval) -> bool {
        self.greater(*other)
    }

    #[inline]
    fn ge(&self, other: &Interval) -> bool {
        self.greater_equal(*other)
    }
}

impl Sum for Interval {
    fn sum<I: Iterator<Item = Interval>>(iter: I) -> Interval {
        iter.fold(Interval::ZERO, |acc, x| acc + x)
    }
}

impl From<f64> for Interval {
    fn from(value: f64) -> Self {
        Interval::point(value)
    }
}

impl TryFrom<(f64, f64)> for Interval {
    type Error = IntervalError;

    fn try_from((lower, upper): (f64, f64)) -> Result<Self> {
        Interval::new(lower, upper)
    }
}

impl TryFrom<RangeInclusive<f64>> for Interval {
    type Error = IntervalError;

    fn try_from(range: RangeInclusive<f64>) -> Result<Self> {
        Interval::new(*range.start(), *range.end())
    }
}

impl From<Interval> for [f64; 2] {
    fn from(interval: Interval) -> Self {
        [interval.lower, interval.upper]
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "[{:.*}, {:.*}]", p, self.lower, p, self.upper),
            None => write!(f, "[{}, {}]", self.lower, self.upper),
        }
    }
}

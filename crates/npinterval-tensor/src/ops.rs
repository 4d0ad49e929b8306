//! Operation tables and array arithmetic for [`IntervalArray`].
//!
//! Each table is a closed enum with a stable lowercase name per entry, so
//! callers holding an operation name (the Python adapter, serialized
//! pipelines) resolve it once with [`FromStr`] and then run a typed kernel.

use std::fmt;
use std::str::FromStr;

use ndarray::{ArrayD, Dimension, Ix2, IxDyn};
use npinterval_core::{Interval, IntervalError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::array::IntervalArray;
use crate::config::ElementwiseConfig;
use crate::elementwise::{broadcast_shapes, map_with, zip_with, ElementwiseScalar};

/// Matmuls with at least this many multiply-adds run row-parallel.
const PARALLEL_MATMUL_FLOPS: usize = 1 << 15;

macro_rules! op_table {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = IntervalError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($label => Ok($name::$variant),)+
                    _ => Err(IntervalError::UnknownOperation(s.to_string())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

op_table!(
    /// Arithmetic and lattice operations defined for every [`ElementwiseScalar`].
    BinaryOp {
        Add => "add",
        Subtract => "subtract",
        Multiply => "multiply",
        Divide => "divide",
        Minimum => "minimum",
        Maximum => "maximum",
    }
);

op_table!(
    /// Order predicates; NaN operands compare false.
    CompareOp {
        Equal => "equal",
        NotEqual => "not_equal",
        Less => "less",
        LessEqual => "less_equal",
        Greater => "greater",
        GreaterEqual => "greater_equal",
    }
);

op_table!(
    /// Binary set operations on intervals.
    SetOp {
        Union => "union",
        Intersection => "intersection",
    }
);

op_table!(
    /// Set relations between intervals.
    RelationOp {
        Subseteq => "subseteq",
        Supseteq => "supseteq",
        Subset => "subset",
        Supset => "supset",
    }
);

op_table!(
    /// Unary interval functions.
    UnaryOp {
        Negative => "negative",
        Positive => "positive",
        Abs => "abs",
        Square => "square",
        Sqrt => "sqrt",
        Exp => "exp",
        Sin => "sin",
        Cos => "cos",
        Tan => "tan",
        Arctan => "arctan",
        Tanh => "tanh",
        Reciprocal => "reciprocal",
    }
);

impl BinaryOp {
    #[inline]
    pub fn apply<T: ElementwiseScalar>(self, a: T, b: T) -> T {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide => a / b,
            BinaryOp::Minimum => a.minimum(b),
            BinaryOp::Maximum => a.maximum(b),
        }
    }
}

impl CompareOp {
    #[inline]
    pub fn apply<T: ElementwiseScalar>(self, a: T, b: T) -> bool {
        match self {
            CompareOp::Equal => a.equal(b),
            CompareOp::NotEqual => a.not_equal(b),
            CompareOp::Less => a.less(b),
            CompareOp::LessEqual => a.less_equal(b),
            CompareOp::Greater => a.greater(b),
            CompareOp::GreaterEqual => a.greater_equal(b),
        }
    }
}

impl SetOp {
    /// Disjoint intersections become [`Interval::NAN`] so the result stays
    /// an interval array.
    #[inline]
    pub fn apply(self, a: Interval, b: Interval) -> Interval {
        match self {
            SetOp::Union => a.hull(b),
            SetOp::Intersection => a.intersection(b).unwrap_or(Interval::NAN),
        }
    }
}

impl RelationOp {
    #[inline]
    pub fn apply(self, a: Interval, b: Interval) -> bool {
        match self {
            RelationOp::Subseteq => a.subseteq(b),
            RelationOp::Supseteq => a.supseteq(b),
            RelationOp::Subset => a.subset(b),
            RelationOp::Supset => a.supset(b),
        }
    }
}

impl UnaryOp {
    #[inline]
    pub fn apply(self, x: Interval) -> Interval {
        match self {
            UnaryOp::Negative => -x,
            UnaryOp::Positive if x.is_nan() => Interval::NAN,
            UnaryOp::Positive => x,
            UnaryOp::Abs => x.abs(),
            UnaryOp::Square => x.square(),
            UnaryOp::Sqrt => x.sqrt(),
            UnaryOp::Exp => x.exp(),
            UnaryOp::Sin => x.sin(),
            UnaryOp::Cos => x.cos(),
            UnaryOp::Tan => x.tan(),
            UnaryOp::Arctan => x.atan(),
            UnaryOp::Tanh => x.tanh(),
            UnaryOp::Reciprocal => x.recip(),
        }
    }
}

impl IntervalArray {
    pub fn binary_with(
        &self,
        op: BinaryOp,
        rhs: &IntervalArray,
        config: &ElementwiseConfig,
    ) -> Result<IntervalArray> {
        zip_with(self.as_array(), rhs.as_array(), config, move |a, b| op.apply(a, b))
            .map(IntervalArray::new)
    }

    /// Broadcasting binary operation with the default configuration.
    pub fn binary(&self, op: BinaryOp, rhs: &IntervalArray) -> Result<IntervalArray> {
        self.binary_with(op, rhs, &ElementwiseConfig::default())
    }

    pub fn add(&self, rhs: &IntervalArray) -> Result<IntervalArray> {
        self.binary(BinaryOp::Add, rhs)
    }

    pub fn sub(&self, rhs: &IntervalArray) -> Result<IntervalArray> {
        self.binary(BinaryOp::Subtract, rhs)
    }

    pub fn mul(&self, rhs: &IntervalArray) -> Result<IntervalArray> {
        self.binary(BinaryOp::Multiply, rhs)
    }

    /// Zero-containing divisors produce [`Interval::ENTIRE`]; see
    /// [`IntervalArray::checked_div`] for the rejecting variant.
    pub fn div(&self, rhs: &IntervalArray) -> Result<IntervalArray> {
        self.binary(BinaryOp::Divide, rhs)
    }

    /// `self ⊕ rhs` with a float array treated as degenerate intervals.
    pub fn binary_f64(&self, op: BinaryOp, rhs: &ArrayD<f64>) -> Result<IntervalArray> {
        zip_with(
            self.as_array(),
            rhs,
            &ElementwiseConfig::default(),
            move |a, b| op.apply(a, Interval::point(b)),
        )
        .map(IntervalArray::new)
    }

    /// `self[i] ⊕ rhs` for every element.
    pub fn binary_scalar(&self, op: BinaryOp, rhs: f64) -> IntervalArray {
        let rhs = Interval::point(rhs);
        IntervalArray::new(map_with(
            self.as_array(),
            &ElementwiseConfig::default(),
            move |a| op.apply(a, rhs),
        ))
    }

    /// `lhs ⊕ self[i]` for every element.
    pub fn scalar_binary(&self, lhs: f64, op: BinaryOp) -> IntervalArray {
        let lhs = Interval::point(lhs);
        IntervalArray::new(map_with(
            self.as_array(),
            &ElementwiseConfig::default(),
            move |b| op.apply(lhs, b),
        ))
    }

    pub fn compare(&self, op: CompareOp, rhs: &IntervalArray) -> Result<ArrayD<bool>> {
        zip_with(
            self.as_array(),
            rhs.as_array(),
            &ElementwiseConfig::default(),
            move |a, b| op.apply(a, b),
        )
    }

    pub fn relation(&self, op: RelationOp, rhs: &IntervalArray) -> Result<ArrayD<bool>> {
        zip_with(
            self.as_array(),
            rhs.as_array(),
            &ElementwiseConfig::default(),
            move |a, b| op.apply(a, b),
        )
    }

    pub fn set_op(&self, op: SetOp, rhs: &IntervalArray) -> Result<IntervalArray> {
        zip_with(
            self.as_array(),
            rhs.as_array(),
            &ElementwiseConfig::default(),
            move |a, b| op.apply(a, b),
        )
        .map(IntervalArray::new)
    }

    pub fn unary_with(&self, op: UnaryOp, config: &ElementwiseConfig) -> IntervalArray {
        IntervalArray::new(map_with(self.as_array(), config, move |x| op.apply(x)))
    }

    pub fn unary(&self, op: UnaryOp) -> IntervalArray {
        self.unary_with(op, &ElementwiseConfig::default())
    }

    pub fn powi(&self, n: i32) -> IntervalArray {
        IntervalArray::new(map_with(
            self.as_array(),
            &ElementwiseConfig::default(),
            move |x| x.powi(n),
        ))
    }

    pub fn powf(&self, exponent: f64) -> IntervalArray {
        IntervalArray::new(map_with(
            self.as_array(),
            &ElementwiseConfig::default(),
            move |x| x.powf(exponent),
        ))
    }

    /// Division that fails on the first zero-containing divisor, in
    /// row-major order of the broadcast result. Pairs with a NaN-valued
    /// operand on either side give [`Interval::NAN`] and never fail.
    pub fn checked_div(&self, rhs: &IntervalArray) -> Result<IntervalArray> {
        let dim = result_shape(self, rhs)?;
        let a = self.as_array().broadcast(dim.clone()).ok_or_else(|| {
            IntervalError::shape_mismatch(dim.slice().to_vec(), self.shape().to_vec())
        })?;
        let b = rhs.as_array().broadcast(dim.clone()).ok_or_else(|| {
            IntervalError::shape_mismatch(dim.slice().to_vec(), rhs.shape().to_vec())
        })?;
        if let Some(((index, _), divisor)) = a
            .indexed_iter()
            .zip(b.iter())
            .find(|((_, x), d)| x.checked_div(**d).is_err())
        {
            debug!(index = ?index.slice(), %divisor, "division by zero-containing interval");
            return Err(IntervalError::DivisionByZero { divisor: *divisor });
        }
        self.div(rhs)
    }

    /// Matrix product of 2-D arrays `(m, k) · (k, n)`.
    ///
    /// Each entry is an interval dot product, so the result encloses every
    /// product of point matrices drawn from the operands.
    pub fn matmul(&self, rhs: &IntervalArray) -> Result<IntervalArray> {
        let a = self
            .as_array()
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| {
                IntervalError::InvalidShape(format!(
                    "matmul requires 2-D operands, got {:?}",
                    self.shape()
                ))
            })?;
        let b = rhs
            .as_array()
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| {
                IntervalError::InvalidShape(format!(
                    "matmul requires 2-D operands, got {:?}",
                    rhs.shape()
                ))
            })?;

        let (m, k) = a.dim();
        let (k2, n) = b.dim();
        if k != k2 {
            // Operand shapes; they may be equal, e.g. (2, 1) · (2, 1).
            return Err(IntervalError::ShapeMismatch {
                expected: self.shape().to_vec(),
                got: rhs.shape().to_vec(),
            });
        }

        let entry = |idx: usize| -> Interval {
            let (i, j) = (idx / n, idx % n);
            a.row(i)
                .iter()
                .zip(b.column(j).iter())
                .map(|(&x, &y)| x * y)
                .sum()
        };

        let flops = m.saturating_mul(n).saturating_mul(k);
        let data: Vec<Interval> = if flops >= PARALLEL_MATMUL_FLOPS {
            trace!(m, k, n, "parallel interval matmul");
            (0..m * n).into_par_iter().map(entry).collect()
        } else {
            (0..m * n).map(entry).collect()
        };
        IntervalArray::from_shape_vec(&[m, n], data)
    }
}

/// Run a binary operation that produces intervals, by name.
///
/// Accepts every [`BinaryOp`] and [`SetOp`] name plus `"matmul"`.
pub fn dispatch_binary(name: &str, a: &IntervalArray, b: &IntervalArray) -> Result<IntervalArray> {
    if let Ok(op) = name.parse::<BinaryOp>() {
        return a.binary(op, b);
    }
    if let Ok(op) = name.parse::<SetOp>() {
        return a.set_op(op, b);
    }
    if name == "matmul" {
        return a.matmul(b);
    }
    Err(IntervalError::UnknownOperation(name.to_string()))
}

/// Run a boolean-valued binary operation by name.
///
/// Accepts every [`CompareOp`] and [`RelationOp`] name.
pub fn dispatch_predicate(name: &str, a: &IntervalArray, b: &IntervalArray) -> Result<ArrayD<bool>> {
    if let Ok(op) = name.parse::<CompareOp>() {
        return a.compare(op, b);
    }
    if let Ok(op) = name.parse::<RelationOp>() {
        return a.relation(op, b);
    }
    Err(IntervalError::UnknownOperation(name.to_string()))
}

/// Run a unary operation by name.
pub fn dispatch_unary(name: &str, a: &IntervalArray) -> Result<IntervalArray> {
    let op: UnaryOp = name.parse()?;
    Ok(a.unary(op))
}

/// Shape of the result of a broadcasting binary operation.
pub fn result_shape(a: &IntervalArray, b: &IntervalArray) -> Result<IxDyn> {
    broadcast_shapes(a.shape(), b.shape()).map(|s| IxDyn(&s))
}

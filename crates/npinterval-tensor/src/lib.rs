//! Interval arrays over `ndarray`.
//!
//! [`IntervalArray`] holds an arbitrarily shaped array of
//! [`npinterval_core::Interval`] values. On top of it this crate provides:
//! - broadcasting elementwise operations and name-based dispatch ([`ops`]),
//! - conversion to and from lower/upper and center/perturbation float arrays
//!   ([`convert`]),
//! - bisection of interval boxes into orthants ([`subdivide`]),
//! - width and NaN diagnostics ([`diagnostics`]),
//! - a dtype registry for hosts that look element types up by name
//!   ([`registry`]).
//!
//! ```
//! use ndarray::arr1;
//! use npinterval_tensor::{convert, diagnostics};
//!
//! let lower = arr1(&[0.0, -1.0]).into_dyn();
//! let upper = arr1(&[3.0, 3.0]).into_dyn();
//! let x = convert::get_iarray(&lower, &upper)?;
//! assert_eq!(diagnostics::width(&x, None), 5.0);
//! assert_eq!(x.half_intervals()?.len(), 4);
//! # Ok::<(), npinterval_core::IntervalError>(())
//! ```

pub mod array;
pub mod config;
pub mod convert;
pub mod diagnostics;
pub mod elementwise;
pub mod ops;
pub mod registry;
pub mod subdivide;

pub use array::IntervalArray;
pub use config::ElementwiseConfig;
pub use convert::{as_iarray, as_lu, from_cent_pert, get_cent_pert, get_iarray, get_lu};
pub use diagnostics::{has_nan, max_width, width, width_with_norm, widths, WidthNorm};
pub use elementwise::{broadcast_shapes, ElementwiseScalar};
pub use npinterval_core::{Interval, IntervalError, Result};
pub use ops::{BinaryOp, CompareOp, RelationOp, SetOp, UnaryOp};
pub use registry::{
    global_registry, init_once, init_once_in, is_interval_array, DtypeDescriptor, DtypeRegistry,
    INTERVAL_DTYPE,
};
pub use subdivide::{half_intervals, Orthants};

/// The degenerate interval `[0, 0]`.
pub const ZERO: Interval = Interval::ZERO;

/// The degenerate interval `[1, 1]`.
pub const ONE: Interval = Interval::ONE;

#[cfg(test)]
mod tests;

//! Interval arithmetic scalar type.
//!
//! [`Interval`] is a closed real interval `[lower, upper]` of `f64` bounds with
//! outward-rounded arithmetic, a partial order by disjointness and NaN-aware
//! semantics. It is the element type of the arrays in `npinterval-tensor`.
//!
//! ```
//! use npinterval_core::Interval;
//!
//! let a = Interval::new(-1.0, 2.0)?;
//! let b = Interval::new(-3.0, 4.0)?;
//! assert_eq!(a * b, Interval::new(-6.0, 8.0)?);
//! # Ok::<(), npinterval_core::IntervalError>(())
//! ```

mod elementary;
pub mod error;
pub mod interval;
pub mod rounding;

pub use error::{IntervalError, Result};
pub use interval::Interval;

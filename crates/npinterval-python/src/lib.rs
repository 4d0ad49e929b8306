//! Python bindings for npinterval.
//!
//! Interval arrays cross the boundary in the stacked lower/upper form: a
//! float64 array whose trailing axis has length 2.
//!
//! ## Example Usage
//!
//! ```python
//! import numpy as np
//! import npinterval
//!
//! x = npinterval.interval(-1.0, 2.0) * npinterval.interval(-3.0, 4.0)
//! assert x.vec == (-6.0, 8.0)
//!
//! box = npinterval.get_iarray(np.array([0.0, 0.0]), np.array([1.0, 2.0]))
//! parts = npinterval.half_intervals(box)
//! assert len(parts) == 4
//! ```

use ndarray::ArrayD;
use numpy::{PyArrayDyn, PyArrayMethods, ToPyArray};
use pyo3::basic::CompareOp as PyCompareOp;
use pyo3::exceptions::{PyRuntimeError, PyValueError, PyZeroDivisionError};
use pyo3::prelude::*;

use npinterval_core::{Interval, IntervalError};
use npinterval_tensor::{convert, diagnostics, init_once, ops, subdivide, IntervalArray, ONE, ZERO};

fn to_py_err(err: IntervalError) -> PyErr {
    match err {
        IntervalError::ConflictingRegistration { .. } => PyRuntimeError::new_err(err.to_string()),
        IntervalError::DivisionByZero { .. } => PyZeroDivisionError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn read_array(array: &Bound<'_, PyArrayDyn<f64>>) -> ArrayD<f64> {
    array.readonly().as_array().to_owned()
}

fn read_intervals(lu: &Bound<'_, PyArrayDyn<f64>>) -> PyResult<IntervalArray> {
    convert::as_iarray(&read_array(lu)).map_err(to_py_err)
}

/// A closed real interval `[l, u]`.
#[pyclass(name = "interval", module = "npinterval")]
#[derive(Clone, Copy)]
pub struct PyInterval {
    inner: Interval,
}

impl From<Interval> for PyInterval {
    fn from(inner: Interval) -> Self {
        Self { inner }
    }
}

/// Right-hand operand of interval arithmetic: another interval or a number.
#[derive(FromPyObject)]
enum Operand {
    Interval(PyInterval),
    Float(f64),
}

impl Operand {
    fn interval(self) -> Interval {
        match self {
            Operand::Interval(x) => x.inner,
            Operand::Float(v) => Interval::point(v),
        }
    }
}

#[pymethods]
impl PyInterval {
    /// `interval()` is `[0, 0]`, `interval(v)` is `[v, v]`, `interval(l, u)`
    /// requires `l <= u`.
    #[new]
    #[pyo3(signature = (l=None, u=None))]
    fn new(l: Option<f64>, u: Option<f64>) -> PyResult<Self> {
        let inner = match (l, u) {
            (None, None) => Interval::ZERO,
            (Some(v), None) | (None, Some(v)) => Interval::point(v),
            (Some(l), Some(u)) => Interval::new(l, u).map_err(to_py_err)?,
        };
        Ok(Self { inner })
    }

    #[getter]
    fn l(&self) -> f64 {
        self.inner.lower()
    }

    #[getter]
    fn u(&self) -> f64 {
        self.inner.upper()
    }

    #[getter]
    fn vec(&self) -> (f64, f64) {
        (self.inner.lower(), self.inner.upper())
    }

    fn __repr__(&self) -> String {
        format!("interval({}, {})", self.inner.lower(), self.inner.upper())
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }

    fn __add__(&self, other: Operand) -> Self {
        (self.inner + other.interval()).into()
    }

    fn __radd__(&self, other: Operand) -> Self {
        (other.interval() + self.inner).into()
    }

    fn __sub__(&self, other: Operand) -> Self {
        (self.inner - other.interval()).into()
    }

    fn __rsub__(&self, other: Operand) -> Self {
        (other.interval() - self.inner).into()
    }

    fn __mul__(&self, other: Operand) -> Self {
        (self.inner * other.interval()).into()
    }

    fn __rmul__(&self, other: Operand) -> Self {
        (other.interval() * self.inner).into()
    }

    fn __truediv__(&self, other: Operand) -> Self {
        (self.inner / other.interval()).into()
    }

    fn __rtruediv__(&self, other: Operand) -> Self {
        (other.interval() / self.inner).into()
    }

    fn __neg__(&self) -> Self {
        (-self.inner).into()
    }

    fn __pos__(&self) -> Self {
        ops::UnaryOp::Positive.apply(self.inner).into()
    }

    fn __abs__(&self) -> Self {
        self.inner.abs().into()
    }

    fn __richcmp__(&self, other: Operand, op: PyCompareOp) -> bool {
        let other = other.interval();
        match op {
            PyCompareOp::Eq => self.inner.equal(other),
            PyCompareOp::Ne => self.inner.not_equal(other),
            PyCompareOp::Lt => self.inner.less(other),
            PyCompareOp::Le => self.inner.less_equal(other),
            PyCompareOp::Gt => self.inner.greater(other),
            PyCompareOp::Ge => self.inner.greater_equal(other),
        }
    }

    fn power(&self, exponent: f64) -> Self {
        self.inner.powf(exponent).into()
    }

    fn subseteq(&self, other: Operand) -> bool {
        self.inner.subseteq(other.interval())
    }

    fn supseteq(&self, other: Operand) -> bool {
        self.inner.supseteq(other.interval())
    }

    fn subset(&self, other: Operand) -> bool {
        self.inner.subset(other.interval())
    }

    fn supset(&self, other: Operand) -> bool {
        self.inner.supset(other.interval())
    }

    fn union(&self, other: Operand) -> Self {
        self.inner.hull(other.interval()).into()
    }

    /// `None` when the intervals are disjoint.
    fn intersection(&self, other: Operand) -> Option<Self> {
        self.inner.intersection(other.interval()).map(Self::from)
    }

    fn width(&self) -> f64 {
        self.inner.width()
    }

    fn midpoint(&self) -> f64 {
        self.inner.midpoint()
    }

    fn isnan(&self) -> bool {
        self.inner.is_nan()
    }

    /// Apply a unary operation by name (`"sqrt"`, `"sin"`, ...).
    fn unary(&self, name: &str) -> PyResult<Self> {
        let op: ops::UnaryOp = name.parse().map_err(to_py_err)?;
        Ok(op.apply(self.inner).into())
    }
}

/// Split stacked bounds into `(lower, upper)`.
#[pyfunction]
fn get_lu<'py>(
    py: Python<'py>,
    lu: &Bound<'py, PyArrayDyn<f64>>,
) -> PyResult<(Bound<'py, PyArrayDyn<f64>>, Bound<'py, PyArrayDyn<f64>>)> {
    let x = read_intervals(lu)?;
    let (lower, upper) = convert::get_lu(&x);
    Ok((lower.to_pyarray(py), upper.to_pyarray(py)))
}

/// Stack `lower` and `upper`, swapping reversed pairs.
#[pyfunction]
fn get_iarray<'py>(
    py: Python<'py>,
    lower: &Bound<'py, PyArrayDyn<f64>>,
    upper: &Bound<'py, PyArrayDyn<f64>>,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    let x = convert::get_iarray(&read_array(lower), &read_array(upper)).map_err(to_py_err)?;
    Ok(convert::as_lu(&x).to_pyarray(py))
}

#[pyfunction]
fn from_cent_pert<'py>(
    py: Python<'py>,
    center: &Bound<'py, PyArrayDyn<f64>>,
    perturbation: &Bound<'py, PyArrayDyn<f64>>,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    let x = convert::from_cent_pert(&read_array(center), &read_array(perturbation))
        .map_err(to_py_err)?;
    Ok(convert::as_lu(&x).to_pyarray(py))
}

#[pyfunction]
fn get_cent_pert<'py>(
    py: Python<'py>,
    lu: &Bound<'py, PyArrayDyn<f64>>,
) -> PyResult<(Bound<'py, PyArrayDyn<f64>>, Bound<'py, PyArrayDyn<f64>>)> {
    let x = read_intervals(lu)?;
    let (center, perturbation) = convert::get_cent_pert(&x);
    Ok((center.to_pyarray(py), perturbation.to_pyarray(py)))
}

#[pyfunction]
#[pyo3(signature = (lu, scale=None))]
fn width(lu: &Bound<'_, PyArrayDyn<f64>>, scale: Option<f64>) -> PyResult<f64> {
    Ok(diagnostics::width(&read_intervals(lu)?, scale))
}

#[pyfunction]
fn has_nan(lu: &Bound<'_, PyArrayDyn<f64>>) -> PyResult<bool> {
    Ok(diagnostics::has_nan(&read_intervals(lu)?))
}

/// All `2^n` orthants of a box given as an `(n, 2)` array.
#[pyfunction]
fn half_intervals<'py>(
    py: Python<'py>,
    box_lu: &Bound<'py, PyArrayDyn<f64>>,
) -> PyResult<Vec<Bound<'py, PyArrayDyn<f64>>>> {
    let b = read_intervals(box_lu)?;
    let parts = Python::detach(py, || subdivide::half_intervals(&b)).map_err(to_py_err)?;
    Ok(parts
        .iter()
        .map(|part| convert::as_lu(part).to_pyarray(py))
        .collect())
}

/// Binary operation by name. Arithmetic, lattice and set operations return
/// stacked bounds; comparisons and set relations return a bool array.
#[pyfunction]
fn binary<'py>(
    py: Python<'py>,
    name: &str,
    a: &Bound<'py, PyArrayDyn<f64>>,
    b: &Bound<'py, PyArrayDyn<f64>>,
) -> PyResult<Bound<'py, PyAny>> {
    let a = read_intervals(a)?;
    let b = read_intervals(b)?;
    let name = name.to_string();
    let result = Python::detach(py, || match ops::dispatch_binary(&name, &a, &b) {
        Err(IntervalError::UnknownOperation(_)) => {
            ops::dispatch_predicate(&name, &a, &b).map(Err)
        }
        other => other.map(Ok),
    })
    .map_err(to_py_err)?;
    Ok(match result {
        Ok(intervals) => convert::as_lu(&intervals).to_pyarray(py).into_any(),
        Err(flags) => flags.to_pyarray(py).into_any(),
    })
}

#[pyfunction]
fn unary<'py>(
    py: Python<'py>,
    name: &str,
    a: &Bound<'py, PyArrayDyn<f64>>,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    let a = read_intervals(a)?;
    let name = name.to_string();
    let result = Python::detach(py, || ops::dispatch_unary(&name, &a)).map_err(to_py_err)?;
    Ok(convert::as_lu(&result).to_pyarray(py))
}

#[pymodule]
fn npinterval(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Fails with RuntimeError if another type already claimed "interval".
    init_once().map_err(to_py_err)?;

    m.add_class::<PyInterval>()?;
    m.add("zero", PyInterval::from(ZERO))?;
    m.add("one", PyInterval::from(ONE))?;

    m.add_function(wrap_pyfunction!(get_lu, m)?)?;
    m.add_function(wrap_pyfunction!(get_iarray, m)?)?;
    m.add_function(wrap_pyfunction!(from_cent_pert, m)?)?;
    m.add_function(wrap_pyfunction!(get_cent_pert, m)?)?;
    m.add_function(wrap_pyfunction!(width, m)?)?;
    m.add_function(wrap_pyfunction!(has_nan, m)?)?;
    m.add_function(wrap_pyfunction!(half_intervals, m)?)?;
    m.add_function(wrap_pyfunction!(binary, m)?)?;
    m.add_function(wrap_pyfunction!(unary, m)?)?;
    Ok(())
}

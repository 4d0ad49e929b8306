//! Directed rounding for the basic floating-point operations.
//!
//! The FPU stays in round-to-nearest. Each `*_down`/`*_up` function computes
//! the nearest result and then recovers the exact rounding error with an
//! error-free transform (TwoSum for addition, an FMA residual for
//! multiplication, division and square root). The result is moved one ulp
//! only when it lies on the wrong side of the exact value, so exact results
//! stay exact.
//!
//! Conventions:
//! - Operations with an infinite operand are exact in the extended reals and
//!   are returned unchanged.
//! - Overflow towards the wrong infinity clamps to `±f64::MAX`.
//! - Results in the underflow range widen unconditionally, since residuals
//!   there are no longer exact.

/// Below this magnitude a product or quotient residual may not be representable.
const RESIDUAL_FLOOR: f64 = f64::MIN_POSITIVE * 9007199254740992.0; // 2^-1022 * 2^53

#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let aa = s - bb;
    (s, (a - aa) + (b - bb))
}

/// Clamp an overflowed result of finite operands to the finite side.
#[inline]
fn overflow_down(r: f64) -> f64 {
    if r == f64::INFINITY {
        f64::MAX
    } else {
        r
    }
}

#[inline]
fn overflow_up(r: f64) -> f64 {
    if r == f64::NEG_INFINITY {
        -f64::MAX
    } else {
        r
    }
}

/// `a + b` rounded toward negative infinity.
#[inline]
pub fn add_down(a: f64, b: f64) -> f64 {
    if !a.is_finite() || !b.is_finite() {
        return a + b;
    }
    let (s, err) = two_sum(a, b);
    if !s.is_finite() {
        return overflow_down(s);
    }
    if err < 0.0 {
        s.next_down()
    } else {
        s
    }
}

/// `a + b` rounded toward positive infinity.
#[inline]
pub fn add_up(a: f64, b: f64) -> f64 {
    if !a.is_finite() || !b.is_finite() {
        return a + b;
    }
    let (s, err) = two_sum(a, b);
    if !s.is_finite() {
        return overflow_up(s);
    }
    if err > 0.0 {
        s.next_up()
    } else {
        s
    }
}

/// `a - b` rounded toward negative infinity.
#[inline]
pub fn sub_down(a: f64, b: f64) -> f64 {
    add_down(a, -b)
}

/// `a - b` rounded toward positive infinity.
#[inline]
pub fn sub_up(a: f64, b: f64) -> f64 {
    add_up(a, -b)
}

/// Exact residual `a*b - round(a*b)`, or `None` when it is unreliable.
#[inline]
fn mul_residual(a: f64, b: f64, p: f64) -> Option<f64> {
    if p.abs() < RESIDUAL_FLOOR {
        return None;
    }
    Some(a.mul_add(b, -p))
}

/// `a * b` rounded toward negative infinity.
#[inline]
pub fn mul_down(a: f64, b: f64) -> f64 {
    let p = a * b;
    if !a.is_finite() || !b.is_finite() {
        return p;
    }
    if !p.is_finite() {
        return overflow_down(p);
    }
    if a == 0.0 || b == 0.0 {
        return p;
    }
    match mul_residual(a, b, p) {
        Some(err) if err >= 0.0 => p,
        _ => p.next_down(),
    }
}

/// `a * b` rounded toward positive infinity.
#[inline]
pub fn mul_up(a: f64, b: f64) -> f64 {
    let p = a * b;
    if !a.is_finite() || !b.is_finite() {
        return p;
    }
    if !p.is_finite() {
        return overflow_up(p);
    }
    if a == 0.0 || b == 0.0 {
        return p;
    }
    match mul_residual(a, b, p) {
        Some(err) if err <= 0.0 => p,
        _ => p.next_up(),
    }
}

/// Sign of `exact(a / b) - round(a / b)`, or `None` when it cannot be recovered.
///
/// `a - q*b` is exact for a correctly rounded quotient outside the underflow
/// range, and `exact - q = (a - q*b) / b`.
#[inline]
fn div_error_sign(a: f64, b: f64, q: f64) -> Option<f64> {
    if q.abs() < RESIDUAL_FLOOR {
        return None;
    }
    let r = (-q).mul_add(b, a);
    if r == 0.0 {
        Some(0.0)
    } else if (r > 0.0) == (b > 0.0) {
        Some(1.0)
    } else {
        Some(-1.0)
    }
}

/// `a / b` rounded toward negative infinity. `b` must be nonzero.
#[inline]
pub fn div_down(a: f64, b: f64) -> f64 {
    let q = a / b;
    if !a.is_finite() || !b.is_finite() {
        return q;
    }
    if !q.is_finite() {
        return overflow_down(q);
    }
    if a == 0.0 {
        return q;
    }
    match div_error_sign(a, b, q) {
        Some(sign) if sign >= 0.0 => q,
        _ => q.next_down(),
    }
}

/// `a / b` rounded toward positive infinity. `b` must be nonzero.
#[inline]
pub fn div_up(a: f64, b: f64) -> f64 {
    let q = a / b;
    if !a.is_finite() || !b.is_finite() {
        return q;
    }
    if !q.is_finite() {
        return overflow_up(q);
    }
    if a == 0.0 {
        return q;
    }
    match div_error_sign(a, b, q) {
        Some(sign) if sign <= 0.0 => q,
        _ => q.next_up(),
    }
}

/// `sqrt(x)` rounded toward negative infinity, for `x >= 0`.
#[inline]
pub fn sqrt_down(x: f64) -> f64 {
    let r = x.sqrt();
    if !r.is_finite() || r == 0.0 {
        return r;
    }
    if x < RESIDUAL_FLOOR {
        return r.next_down();
    }
    // r*r - x > 0 means r overshoots the exact root.
    if r.mul_add(r, -x) > 0.0 {
        r.next_down()
    } else {
        r
    }
}

/// `sqrt(x)` rounded toward positive infinity, for `x >= 0`.
#[inline]
pub fn sqrt_up(x: f64) -> f64 {
    let r = x.sqrt();
    if !r.is_finite() || r == 0.0 {
        return r;
    }
    if x < RESIDUAL_FLOOR {
        return r.next_up();
    }
    if r.mul_add(r, -x) < 0.0 {
        r.next_up()
    } else {
        r
    }
}

/// Move a lower bound produced by a library function one ulp down.
#[inline]
pub fn widen_down(x: f64) -> f64 {
    if x.is_nan() {
        x
    } else {
        x.next_down()
    }
}

/// Move an upper bound produced by a library function one ulp up.
#[inline]
pub fn widen_up(x: f64) -> f64 {
    if x.is_nan() {
        x
    } else {
        x.next_up()
    }
}

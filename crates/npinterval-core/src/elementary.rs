//! Elementary functions on intervals.
//!
//! `abs`, `square`, `sqrt` and integer powers use exactly directed rounding.
//! Library transcendental functions are not correctly rounded, so their
//! endpoint values are widened by one ulp outward and clamped to the range of
//! the function.

use crate::rounding::{mul_down, mul_up, sqrt_down, sqrt_up, widen_down, widen_up};
use crate::Interval;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// True if `[lower, upper]` contains a point `phase + k * period` for integer `k`.
///
/// `phase + k * period` is evaluated in f64. Above about 2^52 the spacing of
/// f64 exceeds 1 and the computed extremum can drift by a large fraction of
/// the period; callers only get here for intervals narrower than a period.
#[inline]
fn crosses(lower: f64, upper: f64, phase: f64, period: f64) -> bool {
    let k = ((lower - phase) / period).ceil();
    phase + k * period <= upper
}

/// `x^k` for `x >= 0`, rounded down.
fn pow_down(x: f64, mut k: u32) -> f64 {
    let mut result = 1.0;
    let mut base = x;
    while k > 0 {
        if k & 1 == 1 {
            result = mul_down(result, base).max(0.0);
        }
        k >>= 1;
        if k > 0 {
            base = mul_down(base, base).max(0.0);
        }
    }
    result
}

/// `x^k` for `x >= 0`, rounded up.
fn pow_up(x: f64, mut k: u32) -> f64 {
    let mut result = 1.0;
    let mut base = x;
    while k > 0 {
        if k & 1 == 1 {
            result = mul_up(result, base);
        }
        k >>= 1;
        if k > 0 {
            base = mul_up(base, base);
        }
    }
    result
}

impl Interval {
    /// Absolute value `{ |x| : x ∈ self }`.
    pub fn abs(self) -> Interval {
        if self.is_nan() {
            return Interval::NAN;
        }
        if self.lower() >= 0.0 {
            self
        } else if self.upper() <= 0.0 {
            -self
        } else {
            Interval::new_unchecked(0.0, (-self.lower()).max(self.upper()))
        }
    }

    /// `{ x² : x ∈ self }`; tighter than `self * self`.
    pub fn square(self) -> Interval {
        if self.is_nan() {
            return Interval::NAN;
        }
        let (l, u) = (self.lower(), self.upper());
        if l >= 0.0 {
            Interval::new_unchecked(mul_down(l, l), mul_up(u, u))
        } else if u <= 0.0 {
            Interval::new_unchecked(mul_down(u, u), mul_up(l, l))
        } else {
            Interval::new_unchecked(0.0, mul_up(l, l).max(mul_up(u, u)))
        }
    }

    /// Square root restricted to the non-negative part of the interval.
    ///
    /// An entirely negative interval has no real square root and yields
    /// [`Interval::NAN`].
    pub fn sqrt(self) -> Interval {
        if self.is_nan() || self.upper() < 0.0 {
            return Interval::NAN;
        }
        let lower = if self.lower() <= 0.0 {
            0.0
        } else {
            sqrt_down(self.lower())
        };
        Interval::new_unchecked(lower, sqrt_up(self.upper()))
    }

    /// Integer power. `x^0 = 1`; negative exponents go through [`recip`](Self::recip).
    pub fn powi(self, n: i32) -> Interval {
        if self.is_nan() {
            return Interval::NAN;
        }
        if n == 0 {
            return Interval::ONE;
        }
        let k = n.unsigned_abs();
        let p = self.pow_unsigned(k);
        if n < 0 {
            p.recip()
        } else {
            p
        }
    }

    fn pow_unsigned(self, k: u32) -> Interval {
        if k % 2 == 0 {
            let m = self.abs();
            return Interval::new_unchecked(pow_down(m.lower(), k), pow_up(m.upper(), k));
        }
        // Odd powers are monotone increasing; x^k = -(|x|^k) for x < 0.
        let (l, u) = (self.lower(), self.upper());
        let lower = if l >= 0.0 {
            pow_down(l, k)
        } else {
            -pow_up(-l, k)
        };
        let upper = if u >= 0.0 {
            pow_up(u, k)
        } else {
            -pow_down(-u, k)
        };
        Interval::new_unchecked(lower, upper)
    }

    /// Real power.
    ///
    /// Integral exponents use [`powi`](Self::powi). Non-integral exponents are
    /// evaluated monotonically on non-negative intervals; for intervals
    /// reaching below zero the exponent is rounded to the nearest integer.
    pub fn powf(self, exponent: f64) -> Interval {
        if self.is_nan() || exponent.is_nan() {
            return Interval::NAN;
        }
        if exponent < 0.0 {
            return self.powf(-exponent).recip();
        }
        if exponent.fract() == 0.0 && exponent <= i32::MAX as f64 {
            return self.powi(exponent as i32);
        }
        if self.lower() >= 0.0 {
            let lower = widen_down(self.lower().powf(exponent)).max(0.0);
            let upper = widen_up(self.upper().powf(exponent));
            return Interval::new_unchecked(lower, upper);
        }
        let n = exponent.round();
        if n <= i32::MAX as f64 {
            self.powi(n as i32)
        } else {
            self.pow_large(n)
        }
    }

    /// Integral power `n > i32::MAX` of an interval reaching below zero.
    ///
    /// Every f64 above 2^53 is even; an infinite `n` has no parity and gets
    /// the hull of both cases.
    fn pow_large(self, n: f64) -> Interval {
        let m = self.abs();
        let even = Interval::new_unchecked(
            widen_down(m.lower().powf(n)).max(0.0),
            widen_up(m.upper().powf(n)),
        );
        if (n / 2.0).fract() == 0.0 {
            return even;
        }
        let signed_pow = |x: f64| if x >= 0.0 { x.powf(n) } else { -(-x).powf(n) };
        let odd = Interval::new_unchecked(
            widen_down(signed_pow(self.lower())),
            widen_up(signed_pow(self.upper())),
        );
        if n.is_finite() {
            odd
        } else {
            even.hull(odd)
        }
    }

    pub fn exp(self) -> Interval {
        if self.is_nan() {
            return Interval::NAN;
        }
        Interval::new_unchecked(
            widen_down(self.lower().exp()).max(0.0),
            widen_up(self.upper().exp()),
        )
    }

    pub fn atan(self) -> Interval {
        if self.is_nan() {
            return Interval::NAN;
        }
        Interval::new_unchecked(
            widen_down(self.lower().atan()),
            widen_up(self.upper().atan()),
        )
    }

    pub fn tanh(self) -> Interval {
        if self.is_nan() {
            return Interval::NAN;
        }
        Interval::new_unchecked(
            widen_down(self.lower().tanh()).max(-1.0),
            widen_up(self.upper().tanh()).min(1.0),
        )
    }

    pub fn sin(self) -> Interval {
        self.periodic_unit(f64::sin, FRAC_PI_2, -FRAC_PI_2)
    }

    pub fn cos(self) -> Interval {
        self.periodic_unit(f64::cos, 0.0, PI)
    }

    /// Range of a 2π-periodic function with values in `[-1, 1]`, maximal at
    /// `max_phase` and minimal at `min_phase`, monotone in between.
    fn periodic_unit(self, f: fn(f64) -> f64, max_phase: f64, min_phase: f64) -> Interval {
        if self.is_nan() {
            return Interval::NAN;
        }
        let (l, u) = (self.lower(), self.upper());
        let full = Interval::new_unchecked(-1.0, 1.0);
        if !l.is_finite() || !u.is_finite() || self.width() >= TAU {
            return full;
        }
        let (fl, fu) = (f(l), f(u));
        let upper = if crosses(l, u, max_phase, TAU) {
            1.0
        } else {
            widen_up(fl.max(fu)).min(1.0)
        };
        let lower = if crosses(l, u, min_phase, TAU) {
            -1.0
        } else {
            widen_down(fl.min(fu)).max(-1.0)
        };
        Interval::new_unchecked(lower, upper)
    }

    /// Tangent. Intervals reaching across an asymptote yield [`Interval::ENTIRE`].
    pub fn tan(self) -> Interval {
        if self.is_nan() {
            return Interval::NAN;
        }
        let (l, u) = (self.lower(), self.upper());
        if !l.is_finite() || !u.is_finite() || self.width() >= PI || crosses(l, u, FRAC_PI_2, PI)
        {
            return Interval::ENTIRE;
        }
        let (tl, tu) = (l.tan(), u.tan());
        if tl > tu {
            // Rounding of the asymptote test near a pole.
            return Interval::ENTIRE;
        }
        Interval::new_unchecked(widen_down(tl), widen_up(tu))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(lower: f64, upper: f64) -> Interval {
        Interval::new(lower, upper).unwrap()
    }

    #[test]
    fn test_abs() {
        assert_eq!(iv(1.0, 2.0).abs(), iv(1.0, 2.0));
        assert_eq!(iv(-3.0, -1.0).abs(), iv(1.0, 3.0));
        assert_eq!(iv(-3.0, 2.0).abs(), iv(0.0, 3.0));
    }

    #[test]
    fn test_square_is_tighter_than_self_product() {
        let a = iv(-2.0, 3.0);
        assert_eq!(a.square(), iv(0.0, 9.0));
        assert_eq!(a * a, iv(-6.0, 9.0));
        assert_eq!(iv(-3.0, -2.0).square(), iv(4.0, 9.0));
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(iv(4.0, 9.0).sqrt(), iv(2.0, 3.0));
        assert_eq!(iv(-4.0, 9.0).sqrt(), iv(0.0, 3.0));
        assert!(iv(-4.0, -1.0).sqrt().is_nan());

        let r = iv(2.0, 2.0).sqrt();
        assert!(r.lower() < r.upper());
        assert!(r.contains(std::f64::consts::SQRT_2));
    }

    #[test]
    fn test_powi() {
        assert_eq!(iv(-2.0, 3.0).powi(2), iv(0.0, 9.0));
        assert_eq!(iv(-2.0, 3.0).powi(3), iv(-8.0, 27.0));
        assert_eq!(iv(-3.0, -2.0).powi(3), iv(-27.0, -8.0));
        assert_eq!(iv(-3.0, -2.0).powi(4), iv(16.0, 81.0));
        assert_eq!(iv(5.0, 7.0).powi(0), Interval::ONE);
        assert_eq!(iv(2.0, 4.0).powi(-1), iv(0.25, 0.5));
        assert_eq!(iv(-1.0, 1.0).powi(-2), Interval::ENTIRE);
    }

    #[test]
    fn test_powi_encloses_inexact_power() {
        let r = iv(1.1, 1.1).powi(7);
        let approx = 1.1f64.powi(7);
        assert!(r.lower() <= approx && approx <= r.upper());
        assert!(r.width() < 1e-12);
    }

    #[test]
    fn test_powf() {
        assert_eq!(iv(2.0, 3.0).powf(2.0), iv(4.0, 9.0));
        let r = iv(4.0, 9.0).powf(0.5);
        assert!(r.contains(2.0) && r.contains(3.0));
        assert!(r.width() < 1.0 + 1e-12);
        // Non-integral exponent on a sign-mixed base rounds the exponent.
        assert_eq!(iv(-2.0, 3.0).powf(2.2), iv(0.0, 9.0));
        assert_eq!(iv(2.0, 4.0).powf(-1.0), iv(0.25, 0.5));
        assert!(iv(1.0, 2.0).powf(f64::NAN).is_nan());
    }

    #[test]
    fn test_powf_exponent_beyond_i32() {
        // Even exponents never go negative, odd ones keep the sign.
        let r = iv(-2.0, 1.0).powf(3e9);
        assert_eq!(r.lower(), 0.0);
        assert_eq!(r.upper(), f64::INFINITY);

        let r = iv(-2.0, 1.0).powf(3e9 + 1.0);
        assert_eq!(r.lower(), f64::NEG_INFINITY);
        assert!(r.contains(1.0));

        let r = iv(-0.5, 0.5).powf(4_294_967_296.0);
        assert!(r.lower() >= 0.0 && r.contains(0.0));

        // Rounded to an even power above i32::MAX.
        let r = iv(-2.0, 1.0).powf(3e9 + 0.25);
        assert_eq!(r.lower(), 0.0);

        let r = iv(-2.0, 1.0).powf(f64::INFINITY);
        assert_eq!(r, Interval::ENTIRE);
        let r = iv(0.5, 2.0).powf(f64::INFINITY);
        assert_eq!(r.lower(), 0.0);
        assert_eq!(r.upper(), f64::INFINITY);
    }

    #[test]
    fn test_exp() {
        let r = iv(0.0, 1.0).exp();
        assert!(r.contains(1.0));
        assert!(r.contains(std::f64::consts::E));
        assert!(r.lower() > 0.99);
        assert_eq!(iv(f64::NEG_INFINITY, 0.0).exp().lower(), 0.0);
    }

    #[test]
    fn test_atan_tanh() {
        let r = iv(-1.0, 1.0).atan();
        assert!(r.contains(-std::f64::consts::FRAC_PI_4));
        assert!(r.contains(std::f64::consts::FRAC_PI_4));

        let t = Interval::ENTIRE.tanh();
        assert_eq!(t, iv(-1.0, 1.0));
    }

    #[test]
    fn test_sin_monotone_piece() {
        let r = iv(0.0, 1.0).sin();
        assert!(r.contains(0.0));
        assert!(r.contains(1.0f64.sin()));
        assert!(r.upper() < 0.85);
    }

    #[test]
    fn test_sin_through_maximum() {
        let r = iv(0.0, PI).sin();
        assert_eq!(r.upper(), 1.0);
        assert!(r.lower() <= 0.0 && r.lower() > -1e-300);
    }

    #[test]
    fn test_sin_full_period() {
        assert_eq!(iv(0.0, 7.0).sin(), iv(-1.0, 1.0));
        assert_eq!(Interval::ENTIRE.sin(), iv(-1.0, 1.0));
    }

    #[test]
    fn test_cos() {
        let r = iv(-0.5, 0.5).cos();
        assert_eq!(r.upper(), 1.0);
        assert!(r.contains(0.5f64.cos()));

        let r = iv(3.0, 3.5).cos();
        assert_eq!(r.lower(), -1.0);
    }

    #[test]
    fn test_tan() {
        let r = iv(-0.5, 0.5).tan();
        assert!(r.contains(0.5f64.tan()));
        assert!(r.contains(-(0.5f64.tan())));
        assert_eq!(iv(1.0, 2.0).tan(), Interval::ENTIRE);
        assert_eq!(iv(0.0, 4.0).tan(), Interval::ENTIRE);
    }

    #[test]
    fn test_nan_propagates_through_functions() {
        let nan = Interval::NAN;
        for r in [
            nan.abs(),
            nan.square(),
            nan.sqrt(),
            nan.powi(2),
            nan.exp(),
            nan.sin(),
            nan.cos(),
            nan.tan(),
            nan.atan(),
            nan.tanh(),
        ] {
            assert!(r.is_nan());
        }
    }
}

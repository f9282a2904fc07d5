//! Scalar helpers used by the projection formulas.
//!
//! Angle reduction functions and their ranges:
//!
//! | Function | Output range | Typical use |
//! |----------|--------------|-------------|
//! | [`floor_mod`] | `[0, y)` for positive `y` | Periodic wrapping |
//! | [`coerce_angle`] | `[-PI, PI)` | Longitude normalization |

use crate::constants::{PI, TWOPI};

/// Floored modulo: the remainder takes the sign of the divisor.
///
/// Differs from the `%` operator for negative operands, which is exactly
/// why the periodic wrapping code wants it.
///
/// # Examples
///
/// ```
/// use carta_core::math::floor_mod;
///
/// assert_eq!(floor_mod(-0.5, 1.0), 0.5);
/// assert_eq!(floor_mod(2.5, 1.0), 0.5);
/// ```
#[inline]
pub fn floor_mod(x: f64, y: f64) -> f64 {
    x - libm::floor(x / y) * y
}

/// Reduces an angle in radians to the half-open interval `[-PI, PI)`.
///
/// # Examples
///
/// ```
/// use carta_core::constants::PI;
/// use carta_core::math::coerce_angle;
///
/// assert!((coerce_angle(3.0 * PI / 2.0) - (-PI / 2.0)).abs() < 1e-15);
/// assert_eq!(coerce_angle(PI), -PI);
/// ```
#[inline]
pub fn coerce_angle(angle: f64) -> f64 {
    floor_mod(angle + PI, TWOPI) - PI
}

/// Linear interpolation of `x` from the interval `[a0, a1]` onto `[b0, b1]`.
///
/// Not clamped: inputs outside `[a0, a1]` extrapolate.
#[inline]
pub fn lin_interp(x: f64, a0: f64, a1: f64, b0: f64, b1: f64) -> f64 {
    b0 + (x - a0) * (b1 - b0) / (a1 - a0)
}

/// Arcsine with the argument clamped to `[-1, 1]`.
///
/// Rounding in upstream trig can push a direction cosine a few ULP past
/// unity; clamping keeps the result finite there.
#[inline]
pub fn asin_safe(x: f64) -> f64 {
    libm::asin(x.clamp(-1.0, 1.0))
}

const NEWTON_MAX_ITER: usize = 8;

/// One-dimensional Newton-Raphson iteration solving `f(x) = target`.
///
/// Runs until `|f(x) - target| <= tolerance` or the iteration cap is hit,
/// and always returns the last estimate. Callers in the projection code
/// treat a non-converged estimate as an approximate answer rather than a
/// failure, so no error is reported.
pub fn newton_raphson<F, FP>(target: f64, initial: f64, f: F, f_prime: FP, tolerance: f64) -> f64
where
    F: Fn(f64) -> f64,
    FP: Fn(f64) -> f64,
{
    let mut x = initial;
    let mut error = f(x) - target;
    let mut iterations = 0;
    while error.abs() > tolerance && iterations < NEWTON_MAX_ITER {
        x -= error / f_prime(x);
        error = f(x) - target;
        iterations += 1;
    }
    x
}

//! Lee's conformal projection of a spherical triangle onto a plane
//! triangle, expressed in face-local coordinates.
//!
//! The face center plays the north pole. A stereographic-style map
//! takes the sphere to the complex plane, the Dixon integral carries
//! that to an equilateral triangle, and a radial scale places the face
//! corners at plane distance 2 from the center.

use carta_core::constants::{HALF_PI, QUARTER_PI};
use num_complex::Complex64;

use super::dixon;

/// Historical radial scale. Within a couple parts in 1e5 it equals
/// 2 / 1.76664, the value that would place the corners exactly.
const RADIAL_SCALE: f64 = 1.132;

#[allow(clippy::excessive_precision)]
const TWO_TO_FIVE_SIXTHS: f64 = 1.781797436280678609480452;

pub(crate) fn project(lat: f64, lon: f64) -> (f64, f64) {
    let z = Complex64::from_polar(
        TWO_TO_FIVE_SIXTHS * (QUARTER_PI - lat / 2.0).tan(),
        lon,
    );
    let w = dixon::to_triangle(z);
    (w.norm() * RADIAL_SCALE, w.arg())
}

pub(crate) fn invert(r: f64, theta: f64) -> Option<(f64, f64)> {
    let w = Complex64::from_polar(r / RADIAL_SCALE, theta);
    let z = dixon::from_triangle(w) / TWO_TO_FIVE_SIXTHS;
    Some((HALF_PI - 2.0 * z.norm().atan(), z.arg()))
}

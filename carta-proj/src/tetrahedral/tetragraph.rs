//! TetraGraph, an equidistant projection of the tetrahedron, and its
//! three-parameter generalisation TetraPower.
//!
//! Both work in a face-centered frame: latitude is the angular distance
//! from the face center and longitude sweeps the three 120 degree
//! sectors, one per edge. TetraGraph keeps scale true along every ray
//! out of the face center; TetraPower warps the same rays with three
//! exponents so the corners and edges can trade distortion.

use carta_core::constants::{HALF_PI, PI, SQRT2};

const SECTOR: f64 = 2.0 * PI / 3.0;

/// Splits a face-frame angle into the nearest sector multiple and the
/// offset from it, with the offset in `[-pi/3, pi/3)`.
fn fold_sector(angle: f64) -> (f64, f64) {
    let t0 = ((angle + PI / 3.0) / SECTOR).floor() * SECTOR;
    (t0, angle - t0)
}

/// Radius and bearing of a face-frame coordinate, scale true along
/// each radial.
pub(crate) fn project(lat: f64, lon: f64) -> (f64, f64) {
    let (_, tht) = fold_sector(lon);
    let r = (1.0 / lat.tan() * tht.cos()).atan() / tht.cos() / SQRT2.atan();
    (r, lon)
}

pub(crate) fn invert(r: f64, theta: f64) -> Option<(f64, f64)> {
    let (_, dt) = fold_sector(theta);
    let lat = HALF_PI - ((r * dt.cos() * SQRT2.atan()).tan() / dt.cos()).atan();
    Some((lat, theta))
}

/// TetraPower forward formula. `k1` bends the bearings, `k2` and `k3`
/// set the radial exponent at the edge midpoints and corners, with a
/// linear blend in between. All three at 1 reduce to [`project`].
pub(crate) fn power_project(lat: f64, lon: f64, k1: f64, k2: f64, k3: f64) -> (f64, f64) {
    let (t0, tht) = fold_sector(lon);
    let tht_p = PI / 3.0 * (1.0 - (1.0 - tht.abs() / HALF_PI).powf(k1)) / (1.0 - 3f64.powf(-k1))
        * tht.signum();
    let weight = tht_p.abs() / (PI / 3.0);
    let k_rad = k3 * weight + k2 * (1.0 - weight);
    let r_max = 0.5 / tht_p.cos();
    let rtgf = (1.0 / lat.tan() * tht.cos()).atan() / SQRT2.atan() * r_max;
    let r = (1.0 - (1.0 - rtgf).powf(k_rad)) / (1.0 - (1.0 - r_max).powf(k_rad)) * r_max * 2.0;
    (r, tht_p + t0)
}

pub(crate) fn power_invert(r: f64, theta: f64, k1: f64, k2: f64, k3: f64) -> Option<(f64, f64)> {
    let (t0, tht_p) = fold_sector(theta);
    let lam_s = (1.0
        - (1.0 - tht_p.abs() * (1.0 - 3f64.powf(-k1)) / (PI / 3.0)).powf(1.0 / k1))
        * HALF_PI
        * tht_p.signum();
    let weight = tht_p.abs() / (PI / 3.0);
    let k_rad = k3 * weight + k2 * (1.0 - weight);
    let r_max = 0.5 / tht_p.cos();
    let rtgf = 1.0
        - (1.0 - r / 2.0 / r_max * (1.0 - (1.0 - r_max).abs().powf(k_rad))).powf(1.0 / k_rad);
    let lat = (lam_s.cos() / (rtgf / r_max * SQRT2.atan()).tan()).atan();
    Some((lat, t0 + lam_s))
}

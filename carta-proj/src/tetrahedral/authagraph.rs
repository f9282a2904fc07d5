//! AuthaGraph-style vertex-centered formulas.
//!
//! Where the face-centered projections put the pole of each local
//! frame at a face center, these put it at a vertex and fan the three
//! surrounding faces into a half turn. The radial profile is the knob:
//! a power law approximates the look of the published AuthaGraph map,
//! and an exact equal-area profile opens a small hole at each vertex.

use carta_core::constants::{HALF_PI, PI, SQRT2, SQRT3};
use carta_core::math::newton_raphson;

const SECTOR: f64 = 2.0 * PI / 3.0;

/// Exponent pair the published map quotes. 1.41 is not exactly
/// 1/0.707, which costs round trips a few parts per thousand.
const EXPONENT: f64 = 0.707;
const INVERSE_EXPONENT: f64 = 1.41;

/// Center of the 120 degree globe-side sector `lon` falls in, and the
/// offset from it.
fn fold_lon(lon: f64) -> (f64, f64) {
    let center = (lon / SECTOR).floor() * SECTOR + PI / 3.0;
    (center, lon - center)
}

/// Same for the 60 degree plane-side sectors.
fn fold_theta(theta: f64) -> (f64, f64) {
    let center = (theta / (PI / 3.0)).floor() * (PI / 3.0) + PI / 6.0;
    (center, theta - center)
}

/// Bearing in the flattened vertex frame for a globe-side bearing
/// offset, squeezing each 120 degree sector into 60 degrees with the
/// face edges kept straight.
pub(crate) fn angle_correction(lam: f64) -> f64 {
    ((lam - (lam.sin() / SQRT3).asin()) / PI * 12f64.sqrt()).atan()
}

fn angle_correction_slope(lam: f64) -> f64 {
    let stretch = lam - (lam.sin() / SQRT3).asin();
    (1.0 - 1.0 / (1.0 + 2.0 / (lam.cos() * lam.cos())).sqrt())
        / (PI * PI / 12.0 + stretch * stretch).sqrt()
}

fn unfold_angle(dt: f64) -> f64 {
    newton_raphson(dt, 2.0 * dt, angle_correction, angle_correction_slope, 0.01)
}

/// Forward half shared by the power-law family. The radius is the
/// vertex colatitude, normalised so the opposite edge sits at 1,
/// raised to `exponent` and scaled onto the net.
pub(crate) fn sector_project(lat: f64, lon: f64, exponent: f64) -> (f64, f64) {
    let (center, lam) = fold_lon(lon);
    let tht = angle_correction(lam);
    let p = (HALF_PI - lat) / (SQRT2 / lam.cos()).atan();
    (p.powf(exponent) * SQRT3 / tht.cos(), center / 2.0 + tht)
}

/// Inverse half; `exponent` is applied to the normalised radius on the
/// way back.
pub(crate) fn sector_invert(r: f64, theta: f64, exponent: f64) -> (f64, f64) {
    let (center, dt) = fold_theta(theta);
    let dl = unfold_angle(dt);
    let p = (r / (SQRT3 / dt.cos())).powf(exponent);
    (HALF_PI - p * (SQRT2 / dl.cos()).atan(), center * 2.0 + dl)
}

pub(crate) fn project(lat: f64, lon: f64) -> (f64, f64) {
    sector_project(lat, lon, EXPONENT)
}

pub(crate) fn invert(r: f64, theta: f64) -> Option<(f64, f64)> {
    Some(sector_invert(r, theta, INVERSE_EXPONENT))
}

pub(crate) fn power_project(lat: f64, lon: f64, k: f64) -> (f64, f64) {
    sector_project(lat, lon, k)
}

pub(crate) fn power_invert(r: f64, theta: f64, k: f64) -> Option<(f64, f64)> {
    Some(sector_invert(r, theta, 1.0 / k))
}

/// Equal-area radial profile. Each vertex becomes a circle of squared
/// radius `hole_r2` instead of a point, which keeps the shear there
/// finite.
pub(crate) fn equahedral_project(lat: f64, lon: f64, hole_r2: f64) -> (f64, f64) {
    let (center, lam) = fold_lon(lon);
    let tht = angle_correction(lam);
    let squash = 1.0 - 1.0 / (1.0 + 2.0 / (lam.cos() * lam.cos())).sqrt();
    let r = ((1.0 - lat.sin()) / squash * (3.0 - hole_r2) + hole_r2).sqrt() / tht.cos();
    (r, center / 2.0 + tht)
}

/// `None` inside the vertex holes; those plane points have no
/// preimage.
pub(crate) fn equahedral_invert(r: f64, theta: f64, hole_r2: f64) -> Option<(f64, f64)> {
    let (center, dt) = fold_theta(theta);
    let r2 = (r * dt.cos()).powi(2);
    if r2 < hole_r2 {
        return None;
    }
    let dl = unfold_angle(dt);
    let squash = 1.0 - 1.0 / (1.0 + 2.0 / (dl.cos() * dl.cos())).sqrt();
    let p = (1.0 - (r2 - hole_r2) / (3.0 - hole_r2) * squash).acos();
    Some((HALF_PI - p, center * 2.0 + dl))
}

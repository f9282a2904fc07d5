//! Conformal map between a circular neighborhood of the origin and an
//! equilateral triangle, the kernel of the Lee projection.
//!
//! The map is `w(z) = integral from 0 to z of dt / sqrt(1 + t^3/2)`, a
//! Schwarz-Christoffel integral with branch points at the cube roots of
//! -2. It sends the origin to the origin and those branch points to the
//! triangle's corners, which sit at radius `Gamma(1/3)^2 / (3 Gamma(2/3))
//! = 1.76664` from the center. The midpoint of each triangle edge is the
//! image of `z = 2^(5/6) (sqrt(6) - sqrt(2)) / 2` at half that radius.

use num_complex::Complex64;

const SEGMENTS: usize = 32;

/// `sqrt(1 + z^3/2)`, the reciprocal of the integrand. Principal branch;
/// the argument keeps a positive real part everywhere strictly inside
/// the triangle's preimage, so no branch cut is crossed.
fn halfslope(z: Complex64) -> Complex64 {
    (Complex64::new(1.0, 0.0) + z * z * z * 0.5).sqrt()
}

fn integrand(z: Complex64, u: f64) -> Complex64 {
    let t = 1.0 - u;
    let s = 1.0 - t * t;
    z * (2.0 * t) / halfslope(z * s)
}

/// Forward map: disk coordinates to triangle coordinates.
///
/// Composite Simpson quadrature along the straight path from 0 to `z`,
/// after the substitution `s = 1 - (1-u)^2`. The substitution grades the
/// step so the inverse-square-root singularity at the corners is tamed;
/// interior accuracy is a few parts in 1e9.
pub(crate) fn to_triangle(z: Complex64) -> Complex64 {
    let h = 1.0 / SEGMENTS as f64;
    let mut sum = integrand(z, 0.0) + integrand(z, 1.0);
    for k in 1..SEGMENTS {
        let weight = if k % 2 == 1 { 4.0 } else { 2.0 };
        sum += integrand(z, k as f64 * h) * weight;
    }
    sum * (h / 3.0)
}

/// Inverse map: triangle coordinates back to disk coordinates.
///
/// Integrates `dz/dw = sqrt(1 + z^3/2)` along the ray from 0 to `w`
/// with fixed-step RK4, then polishes with two Newton corrections
/// against [`to_triangle`]. The corrections bring the roundtrip error
/// down to rounding level.
pub(crate) fn from_triangle(w: Complex64) -> Complex64 {
    let h = 1.0 / SEGMENTS as f64;
    let mut z = Complex64::new(0.0, 0.0);
    for _ in 0..SEGMENTS {
        let k1 = w * halfslope(z);
        let k2 = w * halfslope(z + k1 * (h / 2.0));
        let k3 = w * halfslope(z + k2 * (h / 2.0));
        let k4 = w * halfslope(z + k3 * h);
        z += (k1 + (k2 + k3) * 2.0 + k4) * (h / 6.0);
    }
    for _ in 0..2 {
        z -= (to_triangle(z) - w) * halfslope(z);
    }
    z
}

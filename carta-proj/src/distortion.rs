//! Tissot-style distortion sampling.
//!
//! The local behaviour of a forward mapping is summarised by two
//! scalars per sample point: a log areal scale (size) and the maximum
//! angular deformation of the local Jacobian (shape). Both come from
//! finite differences, so the mapping only needs to be evaluable, not
//! differentiable in closed form.

use carta_core::constants::{HALF_PI, PI, TWOPI};
use carta_core::math::asin_safe;
use carta_core::stats;

use crate::coordinate::{PlanarCoord, SphericalCoord};

/// Finite-difference step, in radians of arc along the sphere.
const STEP: f64 = 1e-6;

/// Roughly area-uniform sample cloud over the whole sphere.
///
/// Latitude rows sit `spacing` radians apart and each row carries a
/// longitude count proportional to its circumference, offset by half a
/// step so no sample lands exactly on the antimeridian. The polar rows
/// round down to zero samples, which keeps [`distortion_at`] away from
/// the cos(lat) singularity.
pub fn sample_globe(spacing: f64) -> Vec<SphericalCoord> {
    let mut points = Vec::new();
    for i in 0..=((PI / spacing) as usize) {
        let lat = HALF_PI - i as f64 * spacing;
        let count = (TWOPI * lat.cos() / spacing).round() as usize;
        for j in 0..count {
            let lon = -PI + (j as f64 + 0.5) * TWOPI / count as f64;
            points.push(SphericalCoord::new(lat, lon));
        }
    }
    points
}

/// Size and shape distortion of `forward` at one point.
///
/// Size is the log of the areal scale relative to the sphere; zero
/// means locally area-true, and magnitudes beyond 25 are reported as
/// NaN so that degenerate points drop out of the statistics. Shape is
/// the Tissot angular deformation `2 asin((a - b) / (a + b))` computed
/// from the singular values `a >= b` of the local Jacobian; zero means
/// locally conformal.
pub fn distortion_at<F>(point: SphericalCoord, forward: &F) -> (f64, f64)
where
    F: Fn(SphericalCoord) -> PlanarCoord,
{
    let east = SphericalCoord::new(point.lat(), point.lon() + STEP / point.lat().cos());
    let north = SphericalCoord::new(point.lat() + STEP, point.lon());
    let p0 = forward(point);
    let pe = forward(east);
    let pn = forward(north);
    let du = (pe.x() - p0.x(), pe.y() - p0.y());
    let dv = (pn.x() - p0.x(), pn.y() - p0.y());

    let area = du.0 * dv.1 - du.1 * dv.0;
    let mut size = (area / (STEP * STEP)).abs().ln();
    if size.abs() > 25.0 {
        size = f64::NAN;
    }

    // hypot(a + d, c - b) and hypot(a - d, c + b) are the sum and the
    // absolute difference of the Jacobian's singular values; min/max
    // keeps the ratio in order for orientation-reversing mappings.
    let sum = (du.0 + dv.1).hypot(du.1 - dv.0);
    let diff = (du.0 - dv.1).hypot(du.1 + dv.0);
    let shape = 2.0 * asin_safe(sum.min(diff) / sum.max(diff));

    (size, shape)
}

/// Distortion samples of one forward mapping over a point cloud.
#[derive(Debug, Clone)]
pub struct DistortionField {
    sizes: Vec<f64>,
    shapes: Vec<f64>,
}

impl DistortionField {
    /// Evaluates `forward` over the cloud and collects both samples.
    pub fn measure<F>(points: &[SphericalCoord], forward: &F) -> Self
    where
        F: Fn(SphericalCoord) -> PlanarCoord,
    {
        let mut sizes = Vec::with_capacity(points.len());
        let mut shapes = Vec::with_capacity(points.len());
        for &point in points {
            let (size, shape) = distortion_at(point, forward);
            sizes.push(size);
            shapes.push(shape);
        }
        DistortionField { sizes, shapes }
    }

    /// Number of sample points measured, NaN entries included.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Spread of the log areal scale. Zero for an equal-area mapping.
    pub fn size_spread(&self) -> f64 {
        stats::std_dev(&self.sizes)
    }

    /// Mean angular deformation. Zero for a conformal mapping.
    pub fn shape_mean(&self) -> f64 {
        stats::mean(&self.shapes)
    }

    /// Root mean square angular deformation. Weighs badly deformed
    /// regions more heavily than the mean does.
    pub fn shape_rms(&self) -> f64 {
        stats::rms(&self.shapes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carta_core::constants::QUARTER_PI;

    fn equirectangular(coord: SphericalCoord) -> PlanarCoord {
        PlanarCoord::new(coord.lon(), coord.lat())
    }

    #[test]
    fn test_sample_globe_coarsest_cloud() {
        // At a quarter-turn spacing only the equator row has samples.
        let points = sample_globe(HALF_PI);
        assert_eq!(points.len(), 4);
        let lons = [-3.0 * QUARTER_PI, -QUARTER_PI, QUARTER_PI, 3.0 * QUARTER_PI];
        for (point, lon) in points.iter().zip(lons) {
            assert_eq!(point.lat(), 0.0);
            assert!((point.lon() - lon).abs() < 1e-12, "lon {}", point.lon());
        }
    }

    #[test]
    fn test_sample_globe_stays_in_domain() {
        let points = sample_globe(0.1);
        for point in &points {
            assert!(point.lat().abs() <= HALF_PI);
            assert!(point.lon() >= -PI && point.lon() < PI);
        }
        // Area-uniform density puts the count near 4 pi / spacing^2.
        assert!(points.len() > 1150 && points.len() < 1350, "{}", points.len());
    }

    #[test]
    fn test_equirectangular_distortion() {
        let (size, shape) = distortion_at(SphericalCoord::new(0.0, 0.0), &equirectangular);
        assert!(size.abs() < 1e-9, "size {size}");
        assert!(shape.abs() < 1e-9, "shape {shape}");

        // Away from the equator the plate carree stretches east-west by
        // sec(lat), so both measures have closed forms.
        let lat: f64 = 0.8;
        let (size, shape) = distortion_at(SphericalCoord::new(lat, 0.4), &equirectangular);
        assert!((size - (1.0 / lat.cos()).ln()).abs() < 1e-4, "size {size}");
        let expected = 2.0 * ((1.0 - lat.cos()) / (1.0 + lat.cos())).asin();
        assert!((shape - expected).abs() < 1e-4, "shape {shape}");
    }

    #[test]
    fn test_stereographic_is_conformal() {
        let stereographic = |coord: SphericalCoord| {
            let rho = 2.0 * ((HALF_PI - coord.lat()) / 2.0).tan();
            PlanarCoord::new(rho * coord.lon().cos(), rho * coord.lon().sin())
        };
        for point in [
            SphericalCoord::new(1.2, 0.3),
            SphericalCoord::new(0.7, -2.1),
            SphericalCoord::new(0.2, 2.8),
            SphericalCoord::new(-0.5, 1.0),
        ] {
            let (_, shape) = distortion_at(point, &stereographic);
            assert!(shape < 1e-4, "shape {shape} at {point:?}");
        }
    }

    #[test]
    fn test_statistics_ignore_uniform_scaling() {
        let points = sample_globe(0.4);
        let base = DistortionField::measure(&points, &equirectangular);
        let tripled = DistortionField::measure(&points, &|coord| {
            let point = equirectangular(coord);
            PlanarCoord::new(3.0 * point.x(), 3.0 * point.y())
        });
        assert_eq!(base.len(), tripled.len());
        assert!((base.size_spread() - tripled.size_spread()).abs() < 1e-9);
        assert!((base.shape_mean() - tripled.shape_mean()).abs() < 1e-9);
        assert!((base.shape_rms() - tripled.shape_rms()).abs() < 1e-9);
    }

    #[test]
    fn test_collapsed_mapping_drops_out() {
        let collapse = |_: SphericalCoord| PlanarCoord::new(0.0, 0.0);
        let (size, shape) = distortion_at(SphericalCoord::new(0.3, 0.4), &collapse);
        assert!(size.is_nan());
        assert!(shape.is_nan());

        let field = DistortionField::measure(&sample_globe(1.0), &collapse);
        assert!(field.size_spread().is_nan());
        assert!(field.shape_mean().is_nan());
        assert!(field.shape_rms().is_nan());
    }
}

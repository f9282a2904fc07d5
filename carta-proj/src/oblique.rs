//! Oblique aspects: rotating the globe so an arbitrary point plays the
//! role of the north pole.
//!
//! Every face of a tetrahedral projection is an oblique aspect of the
//! same per-face formula, so this rotation sits on the hot path of both
//! projection directions.

use carta_core::constants::{HALF_PI, PI};
use carta_core::math::{asin_safe, coerce_angle};

use crate::coordinate::SphericalCoord;

/// A pole descriptor: where the rotated frame's north pole sits on the
/// globe, plus a rotation of the frame about that pole.
///
/// The trig of the pole latitude is precomputed since one aspect is
/// applied to many points.
#[derive(Debug, Clone, Copy)]
pub struct ObliqueAspect {
    pole_lat: f64,
    pole_lon: f64,
    rotation: f64,
    sin_pole_lat: f64,
    cos_pole_lat: f64,
}

impl ObliqueAspect {
    pub fn new(pole_lat: f64, pole_lon: f64, rotation: f64) -> Self {
        let (sin_pole_lat, cos_pole_lat) = pole_lat.sin_cos();
        Self {
            pole_lat,
            pole_lon,
            rotation,
            sin_pole_lat,
            cos_pole_lat,
        }
    }

    /// The trivial aspect: pole at the geographic north pole, no spin.
    pub fn north() -> Self {
        Self::new(HALF_PI, 0.0, 0.0)
    }

    pub fn pole_lat(&self) -> f64 {
        self.pole_lat
    }

    pub fn pole_lon(&self) -> f64 {
        self.pole_lon
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Expresses an absolute coordinate in the rotated frame.
    ///
    /// The returned longitude is normalized into `[-PI, PI)`. Formulas
    /// downstream halve or sector-fold this angle, so an unnormalized
    /// value would land points on the wrong face edge.
    pub fn shift(&self, coord: SphericalCoord) -> SphericalCoord {
        let (sin_lat, cos_lat) = coord.lat().sin_cos();
        let (sin_d_lon, cos_d_lon) = (coord.lon() - self.pole_lon).sin_cos();

        let x = cos_lat * cos_d_lon;
        let y = cos_lat * sin_d_lon;
        let z = sin_lat;

        let x_r = self.sin_pole_lat * x - self.cos_pole_lat * z;
        let z_r = self.cos_pole_lat * x + self.sin_pole_lat * z;

        let lat = asin_safe(z_r);
        let lon = coerce_angle(y.atan2(x_r) - self.rotation);
        SphericalCoord::new(lat, lon)
    }

    /// Expresses a rotated-frame coordinate back in absolute terms.
    ///
    /// Longitudes inside `(-PI, PI]` are passed through untouched so an
    /// exact antimeridian stays at `PI` rather than flipping sign.
    pub fn unshift(&self, coord: SphericalCoord) -> SphericalCoord {
        let (sin_lat, cos_lat) = coord.lat().sin_cos();
        let (sin_lon, cos_lon) = (coord.lon() + self.rotation).sin_cos();

        let x = cos_lat * cos_lon;
        let y = cos_lat * sin_lon;
        let z = sin_lat;

        let x_r = self.sin_pole_lat * x + self.cos_pole_lat * z;
        let z_r = -self.cos_pole_lat * x + self.sin_pole_lat * z;

        let lat = asin_safe(z_r);
        let mut lon = self.pole_lon + y.atan2(x_r);
        if lon.abs() > PI {
            lon = coerce_angle(lon);
        }
        SphericalCoord::new(lat, lon)
    }
}

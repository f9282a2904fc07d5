//! Coordinate newtypes for the two spaces a projection maps between.

use carta_core::constants::DEG_TO_RAD;

/// A point on the globe: latitude and longitude in radians.
///
/// Latitude runs from `-PI/2` at the south pole to `PI/2` at the north
/// pole. Longitude is measured east from the prime meridian and is kept
/// in `(-PI, PI]` by the code that produces these values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalCoord {
    lat: f64,
    lon: f64,
}

impl SphericalCoord {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Convenience constructor taking degrees.
    #[inline]
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self::new(lat * DEG_TO_RAD, lon * DEG_TO_RAD)
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// A point on the projected plane, in map units.
///
/// The origin is the center of the map. `x` grows east, `y` grows north.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarCoord {
    x: f64,
    y: f64,
}

impl PlanarCoord {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }
}

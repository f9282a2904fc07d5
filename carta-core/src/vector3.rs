//! Three-dimensional Cartesian vectors on the unit sphere.
//!
//! The projection code mostly manipulates geographic coordinates
//! directly, but interpolation across the antimeridian and near the
//! poles is only well behaved when done on direction vectors. This
//! module supplies the small vector type used for that.
//!
//! The geographic convention: `x` points at latitude 0, longitude 0;
//! `y` at latitude 0, longitude +90 degrees; `z` at the north pole.
//!
//! # Examples
//!
//! ```
//! use carta_core::Vector3;
//!
//! let v = Vector3::from_spherical(0.0, 0.0);
//! assert!((v.x - 1.0).abs() < 1e-15);
//!
//! let (lat, lon) = v.to_spherical();
//! assert!(lat.abs() < 1e-15 && lon.abs() < 1e-15);
//! ```

use crate::errors::{CartaError, CartaResult, MathErrorKind};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// Creates a vector from Cartesian components.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    #[inline]
    pub fn zeros() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Unit vector for a latitude and longitude in radians.
    pub fn from_spherical(lat: f64, lon: f64) -> Self {
        let (sin_lat, cos_lat) = libm::sincos(lat);
        let (sin_lon, cos_lon) = libm::sincos(lon);
        Self::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
    }

    /// Latitude and longitude in radians of this vector's direction.
    ///
    /// The vector need not be normalized. The zero vector maps to
    /// `(0.0, 0.0)`.
    pub fn to_spherical(&self) -> (f64, f64) {
        let lat = libm::atan2(self.z, libm::hypot(self.x, self.y));
        let lon = libm::atan2(self.y, self.x);
        (lat, lon)
    }

    /// Euclidean length.
    pub fn magnitude(&self) -> f64 {
        libm::sqrt(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Scales to unit length. The zero vector stays zero.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            return *self;
        }
        Self::new(self.x / mag, self.y / mag, self.z / mag)
    }

    /// Dot product.
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Component by index, 0 through 2.
    pub fn get(&self, index: usize) -> CartaResult<f64> {
        match index {
            0 => Ok(self.x),
            1 => Ok(self.y),
            2 => Ok(self.z),
            _ => Err(CartaError::math_error(
                "vector component get",
                MathErrorKind::OutOfRange,
                &format!("index {index} out of range for Vector3"),
            )),
        }
    }

    /// Sets a component by index, 0 through 2.
    pub fn set(&mut self, index: usize, value: f64) -> CartaResult<()> {
        match index {
            0 => self.x = value,
            1 => self.y = value,
            2 => self.z = value,
            _ => {
                return Err(CartaError::math_error(
                    "vector component set",
                    MathErrorKind::OutOfRange,
                    &format!("index {index} out of range for Vector3"),
                ))
            }
        }
        Ok(())
    }
}

/// Vector + Vector
impl std::ops::Add for Vector3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

/// Vector - Vector
impl std::ops::Sub for Vector3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// Vector * scalar
impl std::ops::Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

/// -Vector
impl std::ops::Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

//! Numeric constants used throughout the projection engine.
//!
//! All angles are radians unless a constant's name says otherwise.

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const PI: f64 = 3.141592653589793238462643;

#[allow(clippy::excessive_precision)]
pub const TWOPI: f64 = 6.283185307179586476925287;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const HALF_PI: f64 = 1.570796326794896619231322;

#[allow(clippy::excessive_precision)]
pub const QUARTER_PI: f64 = 0.785398163397448309615661;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const SQRT2: f64 = 1.414213562373095048801689;

#[allow(clippy::excessive_precision)]
pub const SQRT3: f64 = 1.732050807568877293527446;

/// Degrees to radians conversion factor.
#[allow(clippy::excessive_precision)]
pub const DEG_TO_RAD: f64 = 0.017453292519943295769237;

/// Radians to degrees conversion factor.
#[allow(clippy::excessive_precision)]
pub const RAD_TO_DEG: f64 = 57.295779513082320876798155;

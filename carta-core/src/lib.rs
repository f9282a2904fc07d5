//! Scalar math, statistics, and shared numeric utilities for the carta
//! workspace.

pub mod constants;
pub mod errors;
pub mod math;
pub mod stats;
pub mod test_helpers;
pub mod vector3;

pub use errors::{CartaError, CartaResult, MathErrorKind};
pub use vector3::Vector3;

//! Error types shared across the carta crates.
//!
//! # Error Categories
//!
//! | Variant | Meaning | Recoverable |
//! |---------|---------|-------------|
//! | `MathError` | A numeric operation received input it cannot handle | No |
//! | `DataError` | A resource could not be read or parsed | Yes |
//! | `CalculationError` | A multi-step computation went wrong partway | No |
//!
//! # Examples
//!
//! ```
//! use carta_core::{CartaError, MathErrorKind};
//!
//! let err = CartaError::math_error("vector index", MathErrorKind::OutOfRange, "index 7");
//! assert!(err.to_string().contains("vector index"));
//! assert!(!err.is_recoverable());
//! ```

use thiserror::Error;

/// Classification of numeric failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathErrorKind {
    /// Division by zero or by a denormal too small to divide by.
    DivisionByZero,
    /// Input outside the domain of the operation.
    InvalidInput,
    /// A result or intermediate value was NaN or infinite.
    NotFinite,
    /// An index or argument fell outside its allowed range.
    OutOfRange,
}

/// Result alias used by the carta-core public API.
pub type CartaResult<T> = Result<T, CartaError>;

#[derive(Error, Debug)]
pub enum CartaError {
    /// A numeric operation failed.
    #[error("Math error in {operation} ({kind:?}): {message}")]
    MathError {
        operation: String,
        kind: MathErrorKind,
        message: String,
    },

    /// A data resource could not be read or parsed.
    #[error("Data error reading {resource} during {operation}: {message}")]
    DataError {
        resource: String,
        operation: String,
        message: String,
    },

    /// A compound calculation failed partway through.
    #[error("Calculation error in {context}: {message}")]
    CalculationError { context: String, message: String },
}

impl CartaError {
    pub fn math_error(operation: &str, kind: MathErrorKind, message: &str) -> Self {
        Self::MathError {
            operation: operation.to_string(),
            kind,
            message: message.to_string(),
        }
    }

    pub fn data_error(resource: &str, operation: &str, message: &str) -> Self {
        Self::DataError {
            resource: resource.to_string(),
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }

    pub fn calculation_error(context: &str, message: &str) -> Self {
        Self::CalculationError {
            context: context.to_string(),
            message: message.to_string(),
        }
    }

    /// Whether retrying with corrected input could succeed.
    ///
    /// Data errors usually mean a missing or malformed file and can be
    /// retried once the resource is fixed. Math and calculation errors
    /// indicate the computation itself cannot proceed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DataError { .. })
    }
}

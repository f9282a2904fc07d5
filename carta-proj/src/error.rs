//! Error type for projection construction and evaluation.

use thiserror::Error;

/// Result alias used throughout carta-proj.
pub type ProjResult<T> = Result<T, ProjectionError>;

#[derive(Debug, Error)]
pub enum ProjectionError {
    /// A data resource backing a projection could not be loaded.
    #[error("Failed to load resource for projection '{projection}': {message}")]
    Resource { projection: String, message: String },

    /// A construction parameter was rejected.
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// No projection registered under the requested name.
    #[error("Unsupported projection: {name}")]
    UnsupportedProjection { name: String },

    /// A coordinate handed to an evaluation routine cannot be mapped.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl ProjectionError {
    pub fn resource(projection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resource {
            projection: projection.into(),
            message: message.into(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub fn unsupported_projection(name: impl Into<String>) -> Self {
        Self::UnsupportedProjection { name: name.into() }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether the error leaves the projection instance unusable.
    ///
    /// Resource and parameter failures mean construction itself went
    /// wrong. An `InvalidInput` only concerns the single coordinate that
    /// was being evaluated; the instance remains valid for other points.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidInput { .. })
    }
}

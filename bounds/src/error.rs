//! Error types for bounds and ticks derivation.
//!
//! Only configuration problems are errors. Data conditions (empty samples,
//! missing datetime information, degenerate ranges) are recovered from inside
//! the engine and reported through `tracing` instead.

use thiserror::Error;

/// Custom error type for request validation and boundary computation.
#[derive(Debug, Error)]
pub enum BoundsError {
    /// A method name that is not part of the method grammar
    #[error("Unknown method '{name}'")]
    UnknownMethod { name: String },

    /// A known method that cannot be used for the given kind of request
    #[error("Method '{method}' is not supported for {context}")]
    UnsupportedMethod { method: String, context: String },

    /// A percentile outside of [0, 100]
    #[error("Invalid percentile '{field}': {value} is not within [0, 100]")]
    InvalidPercentile { field: &'static str, value: f64 },

    /// A non-positive or non-integer point count / stride
    #[error("Invalid N: {value} (expected a positive integer)")]
    InvalidCount { value: String },

    /// The request value does not match any of the accepted shapes
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// `bounds`/`midbounds` ticks were requested without a boundary sequence
    #[error("Method '{method}' requires previously computed colorbar bounds")]
    MissingBounds { method: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BoundsError {
    /// Create an UnknownMethod error
    pub fn unknown_method(name: impl Into<String>) -> Self {
        Self::UnknownMethod { name: name.into() }
    }

    /// Create an UnsupportedMethod error
    pub fn unsupported_method(method: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnsupportedMethod {
            method: method.into(),
            context: context.into(),
        }
    }

    /// Create an InvalidCount error
    pub fn invalid_count(value: impl ToString) -> Self {
        Self::InvalidCount {
            value: value.to_string(),
        }
    }

    /// Create an InvalidRequest error with a message
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

// Type alias for Result using BoundsError
pub type Result<T> = std::result::Result<T, BoundsError>;

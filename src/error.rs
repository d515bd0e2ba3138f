//! Engine error definitions.
//!
//! Only caller mistakes surface as errors. Sparse pools, missing history and
//! other business-logic edge cases resolve through documented fallbacks.

use thiserror::Error;

/// Precondition failures raised by the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The exercise catalog has no entries
    #[error("Exercise catalog is empty")]
    EmptyCatalog,

    /// A caller-supplied duration bound is zero or inverted
    #[error("Invalid duration bound: {0}")]
    InvalidDuration(String),

    /// Catalog data could not be decoded
    #[error("Catalog error: {0}")]
    Catalog(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Catalog(err.to_string())
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

use thiserror::Error;

/// Convenience result type for collection operations.
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Error type returned by collection operations.
///
/// Every variant is fail-fast: operations are local computations with no transient
/// failure modes, so callers are expected to correct their usage rather than retry.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// A constructor was given something that is neither a keyed collection nor a sequence.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The API was used in a way that cannot be honored (e.g. counting a live pipeline).
    #[error("usage error: {message}")]
    Usage { message: String },

    /// A map/reduce job is missing a required piece (e.g. a reducer for intermediate groups).
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Input data does not have the shape a structural algorithm requires.
    #[error("structural error: {message}")]
    Structural { message: String },

    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse or serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl CollectionError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn structural(message: impl Into<String>) -> Self {
        Self::Structural {
            message: message.into(),
        }
    }
}

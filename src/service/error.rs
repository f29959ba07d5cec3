use thiserror::Error;

use crate::embedding::EmbeddingError;

/// Failures of [`SimilarityService::analyze`](super::SimilarityService::analyze).
///
/// None of these carry a partial score.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// The model could not be loaded. Not cached: the next request tries again.
    #[error("embedding model {model_id} unavailable: {source}")]
    ModelUnavailable {
        model_id: String,
        #[source]
        source: EmbeddingError,
    },

    /// One input could not be encoded. Other requests are unaffected.
    #[error("failed to encode {field} text: {source}")]
    EncodingFailed {
        field: &'static str,
        #[source]
        source: EmbeddingError,
    },

    /// A blocking worker panicked or was cancelled.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServiceError::Internal(format!("blocking task failed: {}", err))
    }
}

//! Seams between the scoring service and a concrete embedding model.

use super::error::EmbeddingError;

/// Turns a string into a dense embedding.
///
/// Implementations are shared read-only across requests, so `encode` takes
/// `&self` and must be callable from several blocking threads at once.
pub trait SentenceEncoder: Send + Sync + 'static {
    /// Encodes one string. Calls may block for the duration of a forward pass.
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Length of the vectors returned by [`encode`](Self::encode).
    fn embedding_dim(&self) -> usize;
}

/// Builds an encoder on demand.
///
/// `load` is blocking (file downloads, weight mapping) and is expected to run
/// once per process.
pub trait EncoderLoader: Send + Sync + 'static {
    type Encoder: SentenceEncoder;

    /// Loads the model.
    fn load(&self) -> Result<Self::Encoder, EmbeddingError>;

    /// Identifier of the model this loader produces (for logs).
    fn model_id(&self) -> &str;
}

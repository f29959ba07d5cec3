//! Embedding + model utilities.
//!
//! - [`encoder`] defines the seams the scoring service depends on.
//! - [`sbert`] provides the BERT sentence encoder used in production.

/// Device selection (CPU / Metal / CUDA).
pub mod device;
/// Encoder and loader traits.
pub mod encoder;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
/// Sentence-BERT encoder.
pub mod sbert;
/// Tokenizer loading helpers.
pub mod utils;

pub use encoder::{EncoderLoader, SentenceEncoder};
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockLoader, StubEncoder};
pub use sbert::{Pooling, SbertConfig, SbertEncoder, SbertLoader};

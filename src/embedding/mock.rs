//! Deterministic encoder doubles for tests (no model files required).

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tracing::debug;

use super::encoder::{EncoderLoader, SentenceEncoder};
use super::error::EmbeddingError;

pub const STUB_EMBEDDING_DIM: usize = 64;

/// Bag-of-words hashed embedding: shared words pull vectors together.
#[derive(Debug, Clone)]
pub struct StubEncoder {
    dim: usize,
    fail_on: Option<String>,
}

impl Default for StubEncoder {
    fn default() -> Self {
        Self::new(STUB_EMBEDDING_DIM)
    }
}

impl StubEncoder {
    pub fn new(dim: usize) -> Self {
        Self { dim, fail_on: None }
    }

    /// Makes `encode` fail with a tokenization error for exactly `text`.
    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.fail_on = Some(text.into());
        self
    }

    fn word_vector(&self, word: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        word.hash(&mut hasher);
        let mut state = hasher.finish();

        (0..self.dim)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect()
    }
}

impl SentenceEncoder for StubEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.fail_on.as_deref() == Some(text) {
            return Err(EmbeddingError::TokenizationFailed {
                reason: format!("stub refuses to encode {:?}", text),
            });
        }

        debug!(text_len = text.len(), "Generating stub embedding");

        let mut embedding = vec![0.0f32; self.dim];
        for word in text.split_whitespace() {
            for (acc, v) in embedding.iter_mut().zip(self.word_vector(word)) {
                *acc += v;
            }
        }
        Ok(embedding)
    }

    fn embedding_dim(&self) -> usize {
        self.dim
    }
}

/// Loader double that counts loads and can be slowed down or made to fail.
#[derive(Debug, Clone)]
pub struct MockLoader {
    encoder: StubEncoder,
    loads: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
    delay: Duration,
}

impl Default for MockLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLoader {
    pub const MODEL_ID: &'static str = "mock/stub-encoder";

    pub fn new() -> Self {
        Self {
            encoder: StubEncoder::default(),
            loads: Arc::new(AtomicUsize::new(0)),
            fail: Arc::new(AtomicBool::new(false)),
            delay: Duration::ZERO,
        }
    }

    pub fn with_encoder(mut self, encoder: StubEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Sleeps inside `load`, widening the window for concurrent first callers.
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(self) -> Self {
        self.fail.store(true, Ordering::SeqCst);
        self
    }

    /// Toggles load failure; clones share the flag.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of times `load` has been entered (clones share the counter).
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl EncoderLoader for MockLoader {
    type Encoder = StubEncoder;

    fn load(&self) -> Result<StubEncoder, EmbeddingError> {
        self.loads.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(EmbeddingError::ModelLoadFailed {
                reason: "mock loader configured to fail".to_string(),
            });
        }

        Ok(self.encoder.clone())
    }

    fn model_id(&self) -> &str {
        Self::MODEL_ID
    }
}

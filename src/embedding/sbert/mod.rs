//! Sentence-BERT encoder (BERT + pooling, sentence-transformers layout).
//!
//! Models are named by hub id and fetched on [`SbertEncoder::load`], or read
//! from a local directory when [`SbertConfig::model_dir`] is set.

/// Encoder configuration and sentence-transformers side files.
pub mod config;
pub(crate) mod files;
pub(crate) mod model;


pub use config::{Pooling, SbertConfig};

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::device::{device_label, select_device};
use crate::embedding::encoder::{EncoderLoader, SentenceEncoder};
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::{build_wordpiece_tokenizer, load_tokenizer, with_truncation};

use config::{PoolingFile, SentenceBertFile, TokenizerConfigFile};
use files::{HubRepo, LocalDir, ModelFiles, TokenizerSource, read_json_or_default};
use model::SentenceBert;

/// A loaded sentence-embedding model.
pub struct SbertEncoder {
    model: SentenceBert,
    tokenizer: Tokenizer,
    device: Device,
    model_id: String,
    max_seq_len: usize,
    lowercase_input: bool,
}

impl std::fmt::Debug for SbertEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SbertEncoder")
            .field("model_id", &self.model_id)
            .field("device", &device_label(&self.device))
            .field("pooling", &self.model.pooling())
            .field("embedding_dim", &self.model.hidden_size())
            .field("max_seq_len", &self.max_seq_len)
            .finish()
    }
}

impl SbertEncoder {
    /// Fetches (if needed) and loads the model described by `config`. Blocking.
    pub fn load(config: &SbertConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let device = select_device()?;
        debug!(?device, model_id = %config.model_id, "Selected compute device for encoder");

        let files = match config.model_dir {
            Some(ref dir) => {
                info!(model_dir = %dir.display(), "Loading sentence encoder from local directory");
                files::resolve_files(&LocalDir::new(dir.clone()))?
            }
            None => {
                info!(
                    model_id = %config.model_id,
                    revision = %config.revision,
                    "Fetching sentence encoder from model hub"
                );
                files::resolve_files(&HubRepo::open(config)?)?
            }
        };

        Self::from_files(config, &files, device)
    }

    fn from_files(
        config: &SbertConfig,
        files: &ModelFiles,
        device: Device,
    ) -> Result<Self, EmbeddingError> {
        let sentence_bert: SentenceBertFile = read_json_or_default(files.sentence_bert.as_deref())?;
        let pooling_file: PoolingFile = read_json_or_default(files.pooling.as_deref())?;
        let pooling = pooling_file.pooling();

        let model = SentenceBert::load(&files.config, &files.weights, pooling, &device).map_err(
            |e| EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT model: {}", e),
            },
        )?;

        let requested = config.max_seq_len.unwrap_or(sentence_bert.max_seq_length);
        let max_seq_len = if requested > model.max_position_embeddings() {
            warn!(
                requested,
                max_position_embeddings = model.max_position_embeddings(),
                "max_seq_len exceeds position embeddings, clamping"
            );
            model.max_position_embeddings()
        } else {
            requested
        };

        let tokenizer = Self::load_tokenizer(&files.tokenizer, max_seq_len)?;

        info!(
            model_id = %config.model_id,
            device = device_label(&device),
            embedding_dim = model.hidden_size(),
            max_seq_len,
            pooling = ?pooling,
            "Sentence encoder loaded"
        );

        Ok(Self {
            model,
            tokenizer,
            device,
            model_id: config.model_id.clone(),
            max_seq_len,
            lowercase_input: sentence_bert.do_lower_case,
        })
    }

    fn load_tokenizer(
        source: &TokenizerSource,
        max_seq_len: usize,
    ) -> Result<Tokenizer, EmbeddingError> {
        let tokenizer = match source {
            TokenizerSource::Json(path) => load_tokenizer(path),
            TokenizerSource::Vocab {
                vocab,
                tokenizer_config,
            } => {
                let tokenizer_config: TokenizerConfigFile =
                    read_json_or_default(tokenizer_config.as_deref())?;
                debug!(
                    vocab = %vocab.display(),
                    lowercase = tokenizer_config.do_lower_case,
                    "No tokenizer.json, building WordPiece tokenizer from vocab"
                );
                build_wordpiece_tokenizer(vocab, tokenizer_config.do_lower_case)
            }
        }
        .and_then(|t| with_truncation(t, max_seq_len))
        .map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("Failed to load tokenizer: {}", e),
        })?;

        Ok(tokenizer)
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    pub fn pooling(&self) -> Pooling {
        self.model.pooling()
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    fn encode_inner(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let lowered;
        let text = if self.lowercase_input {
            lowered = text.to_lowercase();
            lowered.as_str()
        } else {
            text
        };

        let encoding =
            self.tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        debug!(
            text_len = text.len(),
            token_count = encoding.get_ids().len(),
            "Encoding sentence"
        );

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let pooled = self
            .model
            .forward(&input_ids, &type_ids, &attention_mask)
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("BERT forward pass failed: {}", e),
            })?;

        Ok(pooled.squeeze(0)?.to_vec1::<f32>()?)
    }
}

impl SentenceEncoder for SbertEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.encode_inner(text)
    }

    fn embedding_dim(&self) -> usize {
        self.model.hidden_size()
    }
}

/// Loads an [`SbertEncoder`] from a fixed configuration.
#[derive(Debug, Clone)]
pub struct SbertLoader {
    config: SbertConfig,
}

impl SbertLoader {
    pub fn new(config: SbertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SbertConfig {
        &self.config
    }
}

impl EncoderLoader for SbertLoader {
    type Encoder = SbertEncoder;

    fn load(&self) -> Result<SbertEncoder, EmbeddingError> {
        SbertEncoder::load(&self.config)
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }
}

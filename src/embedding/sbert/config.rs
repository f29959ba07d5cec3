use std::path::PathBuf;

use serde::Deserialize;

use crate::constants::{DEFAULT_MAX_SEQ_LEN, DEFAULT_MODEL_ID, DEFAULT_MODEL_REVISION};
use crate::embedding::error::EmbeddingError;

#[derive(Debug, Clone)]
/// Configuration for [`SbertEncoder`](super::SbertEncoder).
pub struct SbertConfig {
    /// Hub identifier, e.g. `snunlp/KR-SBERT-V40K-klueNLI-augSTS`.
    pub model_id: String,
    /// Hub revision (branch, tag or commit).
    pub revision: String,
    /// Local model directory; when set the hub is never contacted.
    pub model_dir: Option<PathBuf>,
    /// Hub cache directory (hub default when `None`).
    pub cache_dir: Option<PathBuf>,
    /// Overrides `max_seq_length` from `sentence_bert_config.json`.
    pub max_seq_len: Option<usize>,
}

impl Default for SbertConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            revision: DEFAULT_MODEL_REVISION.to_string(),
            model_dir: None,
            cache_dir: None,
            max_seq_len: None,
        }
    }
}

impl SbertConfig {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            ..Default::default()
        }
    }

    /// Loads from a local directory laid out like a hub snapshot.
    pub fn from_dir<P: Into<PathBuf>>(model_dir: P) -> Self {
        let model_dir = model_dir.into();
        let model_id = model_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| model_dir.display().to_string());

        Self {
            model_id,
            model_dir: Some(model_dir),
            ..Default::default()
        }
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    pub fn with_model_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.model_dir = Some(dir.into());
        self
    }

    pub fn with_cache_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = Some(max_seq_len);
        self
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.model_id.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_id cannot be empty".to_string(),
            });
        }

        if self.revision.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "revision cannot be empty".to_string(),
            });
        }

        if self.max_seq_len == Some(0) {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be positive".to_string(),
            });
        }

        if let Some(ref dir) = self.model_dir
            && !dir.is_dir()
        {
            return Err(EmbeddingError::ModelNotFound { path: dir.clone() });
        }

        Ok(())
    }

    /// Returns `true` if the model is read from disk instead of the hub.
    pub fn is_local(&self) -> bool {
        self.model_dir.is_some()
    }
}

/// How token states are reduced to one sentence vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pooling {
    /// Average over non-padding tokens.
    #[default]
    Mean,
    /// Hidden state of the leading `[CLS]` token.
    Cls,
    /// Element-wise max over non-padding tokens.
    Max,
}

/// `1_Pooling/config.json` as written by sentence-transformers.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PoolingFile {
    #[serde(default)]
    pub pooling_mode_cls_token: bool,
    #[serde(default)]
    pub pooling_mode_mean_tokens: bool,
    #[serde(default)]
    pub pooling_mode_max_tokens: bool,
}

impl PoolingFile {
    /// Mean wins when several modes are set (the common sentence-transformers default).
    pub fn pooling(&self) -> Pooling {
        if self.pooling_mode_mean_tokens {
            Pooling::Mean
        } else if self.pooling_mode_cls_token {
            Pooling::Cls
        } else if self.pooling_mode_max_tokens {
            Pooling::Max
        } else {
            Pooling::Mean
        }
    }
}

/// `sentence_bert_config.json`.
#[derive(Debug, Deserialize)]
pub(crate) struct SentenceBertFile {
    #[serde(default = "default_max_seq_length")]
    pub max_seq_length: usize,
    #[serde(default)]
    pub do_lower_case: bool,
}

impl Default for SentenceBertFile {
    fn default() -> Self {
        Self {
            max_seq_length: DEFAULT_MAX_SEQ_LEN,
            do_lower_case: false,
        }
    }
}

fn default_max_seq_length() -> usize {
    DEFAULT_MAX_SEQ_LEN
}

/// The subset of `tokenizer_config.json` needed to rebuild a WordPiece tokenizer.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenizerConfigFile {
    #[serde(default)]
    pub do_lower_case: bool,
}

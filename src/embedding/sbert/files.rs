//! Locating model files either in a local directory or on the Hugging Face hub.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use hf_hub::api::sync::{ApiBuilder, ApiRepo};
use hf_hub::{Repo, RepoType};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::config::SbertConfig;
use crate::embedding::error::EmbeddingError;

pub(crate) const CONFIG_FILE: &str = "config.json";
pub(crate) const SAFETENSORS_FILE: &str = "model.safetensors";
pub(crate) const PYTORCH_FILE: &str = "pytorch_model.bin";
pub(crate) const TOKENIZER_FILE: &str = "tokenizer.json";
pub(crate) const VOCAB_FILE: &str = "vocab.txt";
pub(crate) const TOKENIZER_CONFIG_FILE: &str = "tokenizer_config.json";
pub(crate) const SENTENCE_BERT_FILE: &str = "sentence_bert_config.json";
pub(crate) const POOLING_FILE: &str = "1_Pooling/config.json";

/// Where weights live, which decides how they are mapped into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WeightsFile {
    Safetensors(PathBuf),
    Pytorch(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenizerSource {
    Json(PathBuf),
    Vocab {
        vocab: PathBuf,
        tokenizer_config: Option<PathBuf>,
    },
}

/// Resolved on-disk paths for one model.
#[derive(Debug, Clone)]
pub(crate) struct ModelFiles {
    pub config: PathBuf,
    pub weights: WeightsFile,
    pub tokenizer: TokenizerSource,
    pub sentence_bert: Option<PathBuf>,
    pub pooling: Option<PathBuf>,
}

/// A place model files can be fetched from.
pub(crate) trait ModelSource {
    fn contains(&self, name: &str) -> bool;

    /// Returns a local path for `name`, downloading it first if necessary.
    fn fetch(&self, name: &str) -> Result<PathBuf, EmbeddingError>;

    fn fetch_optional(&self, name: &str) -> Result<Option<PathBuf>, EmbeddingError> {
        if self.contains(name) {
            self.fetch(name).map(Some)
        } else {
            Ok(None)
        }
    }
}

pub(crate) struct LocalDir {
    root: PathBuf,
}

impl LocalDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ModelSource for LocalDir {
    fn contains(&self, name: &str) -> bool {
        self.root.join(name).is_file()
    }

    fn fetch(&self, name: &str) -> Result<PathBuf, EmbeddingError> {
        let path = self.root.join(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(EmbeddingError::ModelNotFound { path })
        }
    }
}

pub(crate) struct HubRepo {
    model_id: String,
    repo: ApiRepo,
    listing: HashSet<String>,
}

impl HubRepo {
    /// Connects to the hub and lists the repository once.
    pub fn open(config: &SbertConfig) -> Result<Self, EmbeddingError> {
        let mut builder = ApiBuilder::new().with_progress(false);
        if let Some(ref dir) = config.cache_dir {
            builder = builder.with_cache_dir(dir.clone());
        }

        let api = builder.build().map_err(|e| EmbeddingError::DownloadFailed {
            model_id: config.model_id.clone(),
            file: "<api>".to_string(),
            reason: e.to_string(),
        })?;

        let repo = api.repo(Repo::with_revision(
            config.model_id.clone(),
            RepoType::Model,
            config.revision.clone(),
        ));

        let info = repo.info().map_err(|e| EmbeddingError::DownloadFailed {
            model_id: config.model_id.clone(),
            file: "<listing>".to_string(),
            reason: e.to_string(),
        })?;

        let listing: HashSet<String> = info.siblings.into_iter().map(|s| s.rfilename).collect();

        debug!(
            model_id = %config.model_id,
            revision = %config.revision,
            files = listing.len(),
            "Listed model repository"
        );

        Ok(Self {
            model_id: config.model_id.clone(),
            repo,
            listing,
        })
    }
}

impl ModelSource for HubRepo {
    fn contains(&self, name: &str) -> bool {
        self.listing.contains(name)
    }

    fn fetch(&self, name: &str) -> Result<PathBuf, EmbeddingError> {
        self.repo
            .get(name)
            .map_err(|e| EmbeddingError::DownloadFailed {
                model_id: self.model_id.clone(),
                file: name.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Picks the files needed to run `source`'s model, preferring safetensors and `tokenizer.json`.
pub(crate) fn resolve_files(source: &dyn ModelSource) -> Result<ModelFiles, EmbeddingError> {
    let config = source.fetch(CONFIG_FILE)?;

    let weights = if source.contains(SAFETENSORS_FILE) {
        WeightsFile::Safetensors(source.fetch(SAFETENSORS_FILE)?)
    } else if source.contains(PYTORCH_FILE) {
        WeightsFile::Pytorch(source.fetch(PYTORCH_FILE)?)
    } else {
        return Err(EmbeddingError::ModelLoadFailed {
            reason: format!("no {} or {} in model", SAFETENSORS_FILE, PYTORCH_FILE),
        });
    };

    let tokenizer = if source.contains(TOKENIZER_FILE) {
        TokenizerSource::Json(source.fetch(TOKENIZER_FILE)?)
    } else if source.contains(VOCAB_FILE) {
        TokenizerSource::Vocab {
            vocab: source.fetch(VOCAB_FILE)?,
            tokenizer_config: source.fetch_optional(TOKENIZER_CONFIG_FILE)?,
        }
    } else {
        return Err(EmbeddingError::TokenizationFailed {
            reason: format!("no {} or {} in model", TOKENIZER_FILE, VOCAB_FILE),
        });
    };

    let files = ModelFiles {
        config,
        weights,
        tokenizer,
        sentence_bert: source.fetch_optional(SENTENCE_BERT_FILE)?,
        pooling: source.fetch_optional(POOLING_FILE)?,
    };

    info!(
        config = %files.config.display(),
        weights = ?files.weights,
        "Model files ready"
    );

    Ok(files)
}

/// Reads an optional JSON side file, falling back to `T::default()` when absent.
pub(crate) fn read_json_or_default<T>(path: Option<&Path>) -> Result<T, EmbeddingError>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok(T::default());
    };

    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| EmbeddingError::InvalidConfig {
        reason: format!("failed to parse {}: {}", path.display(), e),
    })
}

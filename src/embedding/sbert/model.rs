//! BERT transformer plus sentence pooling.

use candle_core::{DType, Device, IndexOp, Result, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};

use super::config::Pooling;
use super::files::WeightsFile;

pub(crate) struct SentenceBert {
    bert: BertModel,
    pooling: Pooling,
    hidden_size: usize,
    max_position_embeddings: usize,
}

impl SentenceBert {
    pub fn load(
        config_path: &std::path::Path,
        weights: &WeightsFile,
        pooling: Pooling,
        device: &Device,
    ) -> Result<Self> {
        let config_content = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle_core::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let vb = match weights {
            WeightsFile::Safetensors(path) => unsafe {
                VarBuilder::from_mmaped_safetensors(&[path], DType::F32, device)?
            },
            WeightsFile::Pytorch(path) => VarBuilder::from_pth(path, DType::F32, device)?,
        };

        // sentence-transformers exports drop the `bert.` prefix, HF task heads keep it.
        let bert = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &config)?
        } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("roberta"), &config)?
        } else {
            BertModel::load(vb, &config)?
        };

        Ok(Self {
            bert,
            pooling,
            hidden_size: config.hidden_size,
            max_position_embeddings: config.max_position_embeddings,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn max_position_embeddings(&self) -> usize {
        self.max_position_embeddings
    }

    pub fn pooling(&self) -> Pooling {
        self.pooling
    }

    /// Returns pooled sentence vectors, shape `[batch, hidden]`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        let hidden = self
            .bert
            .forward(input_ids, token_type_ids, Some(attention_mask))?;
        pool(&hidden, attention_mask, self.pooling)
    }
}

/// Reduces `[batch, seq, hidden]` token states to `[batch, hidden]`.
pub(crate) fn pool(hidden: &Tensor, attention_mask: &Tensor, pooling: Pooling) -> Result<Tensor> {
    match pooling {
        Pooling::Cls => hidden.i((.., 0, ..)),
        Pooling::Mean => {
            let mask = attention_mask.to_dtype(hidden.dtype())?.unsqueeze(2)?;
            let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
            // [CLS] and [SEP] keep every count at two or more.
            let counts = mask.sum(1)?;
            summed.broadcast_div(&counts)
        }
        Pooling::Max => {
            let mask = attention_mask.to_dtype(hidden.dtype())?.unsqueeze(2)?;
            // Padding positions are pushed far below any real activation.
            let penalty = ((mask - 1.0)? * 1e9)?;
            hidden.broadcast_add(&penalty)?.max(1)
        }
    }
}

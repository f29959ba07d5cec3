//! Cross-cutting, shared constants.
//!
//! The model identifier is only a default. Operators swap models through
//! configuration (see [`crate::config::Config`]) without touching code.

/// Pretrained sentence-embedding model fetched on first use.
pub const DEFAULT_MODEL_ID: &str = "snunlp/KR-SBERT-V40K-klueNLI-augSTS";

/// Hub revision used when none is configured.
pub const DEFAULT_MODEL_REVISION: &str = "main";

/// Default HTTP port for the scoring service.
pub const DEFAULT_PORT: u16 = 8046;

/// Token budget when the model does not publish `max_seq_length`.
pub const DEFAULT_MAX_SEQ_LEN: usize = 128;

/// Similarity is reported as a percentage.
pub const SCORE_SCALE: f64 = 100.0;

/// Decimal places kept in `matchingRate`.
pub const SCORE_DECIMALS: i32 = 2;

/// Response header carrying a short machine-readable outcome.
pub const MATCHRATE_STATUS_HEADER: &str = "x-matchrate-status";

pub const MATCHRATE_STATUS_OK: &str = "ok";
pub const MATCHRATE_STATUS_INVALID_REQUEST: &str = "invalid_request";
pub const MATCHRATE_STATUS_MODEL_UNAVAILABLE: &str = "model_unavailable";
pub const MATCHRATE_STATUS_ENCODING_ERROR: &str = "encoding_error";
pub const MATCHRATE_STATUS_INTERNAL_ERROR: &str = "internal_error";

/// Component state reported by `/ready`.
pub const COMPONENT_READY: &str = "ready";
pub const MODEL_STATE_LOADED: &str = "loaded";
pub const MODEL_STATE_LAZY: &str = "lazy";

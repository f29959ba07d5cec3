//! Matchrate library crate (used by the server binary and integration tests).
//!
//! Scores how closely a user-supplied text matches an original text by
//! embedding both with a Sentence-BERT model and reporting the cosine
//! similarity as a percentage.
//!
//! # Public API Surface
//!
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`SimilarityService`] - Lazily loaded encoder plus `analyze`
//! - [`MatchRequest`], [`MatchResponse`] - Wire types for `POST /analyze`
//! - [`SbertEncoder`], [`SbertConfig`], [`SbertLoader`] - Production encoder
//! - [`SentenceEncoder`], [`EncoderLoader`] - Seams for alternative encoders
//! - [`cosine_similarity`], [`matching_rate`] - Scoring
//! - [`gateway`] - Axum router and handlers
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod scoring;
pub mod service;

pub use config::{Config, ConfigError};
pub use embedding::{
    EmbeddingError, EncoderLoader, Pooling, SbertConfig, SbertEncoder, SbertLoader,
    SentenceEncoder,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::{MockLoader, StubEncoder};
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
pub use scoring::{cosine_similarity, matching_rate};
pub use service::{MatchRequest, MatchResponse, ServiceError, SimilarityService};

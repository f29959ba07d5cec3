//! Similarity service: a lazily loaded, process-wide encoder and `analyze`.
//!
//! The encoder is built on first use. Requests that race for it wait on a
//! single load attempt. Loading and encoding run on the blocking pool so a
//! slow forward pass never stalls the async workers.

mod error;
mod types;


pub use error::ServiceError;
pub use types::{MatchRequest, MatchResponse};

use std::sync::Arc;
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, error, info, instrument};

use crate::embedding::{EncoderLoader, SentenceEncoder};
use crate::scoring::{cosine_similarity, matching_rate};

/// One load attempt, awaited by every caller that arrives while it runs.
type LoadAttempt<E> = Shared<BoxFuture<'static, Result<Arc<E>, ServiceError>>>;

pub struct SimilarityService<L: EncoderLoader> {
    loader: Arc<L>,
    encoder: Arc<OnceCell<Arc<L::Encoder>>>,
    in_flight: Arc<Mutex<Option<LoadAttempt<L::Encoder>>>>,
}

impl<L: EncoderLoader> std::fmt::Debug for SimilarityService<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityService")
            .field("model_id", &self.loader.model_id())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl<L: EncoderLoader> SimilarityService<L> {
    /// Creates the service. Nothing is loaded until the first request.
    pub fn new(loader: L) -> Self {
        Self {
            loader: Arc::new(loader),
            encoder: Arc::new(OnceCell::new()),
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    pub fn model_id(&self) -> &str {
        self.loader.model_id()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Returns `true` once the encoder has been constructed. Never triggers a load.
    pub fn is_loaded(&self) -> bool {
        self.encoder.initialized()
    }

    /// Returns the shared encoder, loading it on first call.
    ///
    /// Callers that arrive while a load is running share its outcome, success
    /// or failure. A failed load is not cached: once it has been reported, the
    /// next call starts a fresh attempt.
    pub async fn encoder(&self) -> Result<Arc<L::Encoder>, ServiceError> {
        if let Some(encoder) = self.encoder.get() {
            return Ok(Arc::clone(encoder));
        }

        let attempt = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(encoder) = self.encoder.get() {
                return Ok(Arc::clone(encoder));
            }
            match in_flight.as_ref() {
                Some(attempt) => {
                    debug!("Joining in-flight model load");
                    attempt.clone()
                }
                None => {
                    let attempt = self.start_load();
                    *in_flight = Some(attempt.clone());
                    attempt
                }
            }
        };

        attempt.await
    }

    /// Spawns the load detached, so a dropped request cannot abandon it halfway.
    /// The task publishes a success and clears the in-flight slot before its
    /// result becomes visible to waiters.
    fn start_load(&self) -> LoadAttempt<L::Encoder> {
        let loader = Arc::clone(&self.loader);
        let cell = Arc::clone(&self.encoder);
        let in_flight = Arc::clone(&self.in_flight);

        let handle = tokio::spawn(async move {
            let result = load_encoder(loader).await;
            if let Ok(ref encoder) = result {
                let _ = cell.set(Arc::clone(encoder));
            }
            *in_flight.lock().await = None;
            result
        });

        async move { handle.await? }.boxed().shared()
    }

    /// Scores `user` against `original`.
    ///
    /// Both strings are returned unmodified in the response.
    #[instrument(
        skip(self, original, user),
        fields(
            model_id = %self.loader.model_id(),
            original_len = original.len(),
            user_len = user.len()
        )
    )]
    pub async fn analyze(
        &self,
        original: String,
        user: String,
    ) -> Result<MatchResponse, ServiceError> {
        let encoder = self.encoder().await?;

        let (original, user, similarity) = tokio::task::spawn_blocking(move || {
            let original_embedding = encoder
                .encode(&original)
                .map_err(|source| ServiceError::EncodingFailed {
                    field: "original",
                    source,
                })?;
            let user_embedding =
                encoder
                    .encode(&user)
                    .map_err(|source| ServiceError::EncodingFailed {
                        field: "user",
                        source,
                    })?;

            let similarity = cosine_similarity(&original_embedding, &user_embedding);
            Ok::<_, ServiceError>((original, user, similarity))
        })
        .await??;

        let matching_rate = matching_rate(similarity);
        debug!(similarity, matching_rate, "Scored text pair");

        Ok(MatchResponse {
            matching_rate,
            original,
            user,
        })
    }
}

async fn load_encoder<L: EncoderLoader>(loader: Arc<L>) -> Result<Arc<L::Encoder>, ServiceError> {
    let model_id = loader.model_id().to_string();
    info!(model_id = %model_id, "Loading embedding model on first use");

    let started = Instant::now();
    let result = tokio::task::spawn_blocking(move || loader.load()).await?;

    match result {
        Ok(encoder) => {
            info!(
                model_id = %model_id,
                embedding_dim = encoder.embedding_dim(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Embedding model ready"
            );
            Ok(Arc::new(encoder))
        }
        Err(source) => {
            error!(model_id = %model_id, error = %source, "Embedding model failed to load");
            Err(ServiceError::ModelUnavailable { model_id, source })
        }
    }
}

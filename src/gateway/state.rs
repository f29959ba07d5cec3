use std::sync::Arc;

use crate::embedding::EncoderLoader;
use crate::service::SimilarityService;

/// Shared per-router state. Cloning only bumps the service refcount.
pub struct HandlerState<L: EncoderLoader> {
    pub service: Arc<SimilarityService<L>>,
}

impl<L: EncoderLoader> Clone for HandlerState<L> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<L: EncoderLoader> HandlerState<L> {
    pub fn new(service: Arc<SimilarityService<L>>) -> Self {
        Self { service }
    }

    pub fn from_loader(loader: L) -> Self {
        Self::new(Arc::new(SimilarityService::new(loader)))
    }
}

use std::sync::Arc;

use crate::db::{InMemoryRatingStore, RatingStore};
use crate::services::RecommendationService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<RecommendationService>,
}

impl AppState {
    /// Creates state over the given rating store
    pub fn new(store: Arc<dyn RatingStore>, critic_email: impl Into<String>) -> Self {
        Self {
            recommender: Arc::new(RecommendationService::new(store, critic_email)),
        }
    }

    /// State backed by an in-memory store
    pub fn in_memory(store: InMemoryRatingStore, critic_email: impl Into<String>) -> Self {
        Self::new(Arc::new(store), critic_email)
    }
}

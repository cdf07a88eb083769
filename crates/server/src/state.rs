//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use loan_autofill_config::Settings;
use loan_autofill_core::{Clock, SystemClock};
use loan_autofill_hydration::Hydrator;
use loan_autofill_persistence::{InMemoryPendingStore, OriginAllowList, PendingEntityStore};
use loan_autofill_text_processing::EntityExtractor;

use crate::rate_limit::RateLimiter;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub extractor: Arc<EntityExtractor>,
    pub hydrator: Arc<Hydrator>,
    /// Pending entities awaiting the application page
    pub pending: Arc<dyn PendingEntityStore>,
    pub rate_limiter: Arc<RateLimiter>,
    /// Senders allowed to post handoff messages
    pub origins: Arc<OriginAllowList>,
}

impl AppState {
    /// Create application state with the system clock and in-memory store
    pub fn new(config: Settings) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create application state driven by an explicit clock
    pub fn with_clock(config: Settings, clock: Arc<dyn Clock>) -> Self {
        let extractor = EntityExtractor::with_clock(config.extraction.clone(), clock.clone());
        let hydrator = Hydrator::from_config(&config.hydration);
        let pending = InMemoryPendingStore::with_clock(&config.handoff, clock.clone());
        let rate_limiter = RateLimiter::new(config.server.rate_limit.clone(), clock.clone());
        let origins = OriginAllowList::new(config.server.handoff_origins.iter().cloned());

        Self {
            config: Arc::new(config),
            extractor: Arc::new(extractor),
            hydrator: Arc::new(hydrator),
            pending: Arc::new(pending),
            rate_limiter: Arc::new(rate_limiter),
            origins: Arc::new(origins),
        }
    }

    /// Swap the pending-entity store (e.g. a shared backend)
    pub fn with_pending_store(mut self, store: Arc<dyn PendingEntityStore>) -> Self {
        self.pending = store;
        self
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

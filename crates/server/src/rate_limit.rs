//! Per-client request rate limiting
//!
//! Sliding one-minute window: a client may make at most `requests_per_minute`
//! requests within any 60 seconds. Timestamps come from the injected clock.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use thiserror::Error;

use loan_autofill_config::RateLimitConfig;
use loan_autofill_core::Clock;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("Too many requests, retry in {retry_after_secs}s")]
    Exceeded { retry_after_secs: u64 },
}

/// Sliding-window limiter keyed by client
pub struct RateLimiter {
    config: RateLimitConfig,
    window: Duration,
    clock: Arc<dyn Clock>,
    hits: Mutex<HashMap<String, VecDeque<DateTime<Utc>>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            window: Duration::minutes(1),
            clock,
            hits: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Record a request for `client`, or reject it if the window is full
    pub fn check(&self, client: &str) -> Result<(), RateLimitError> {
        if !self.config.enabled {
            return Ok(());
        }

        let now = self.clock.now();
        let cutoff = now - self.window;
        let limit = self.config.requests_per_minute as usize;

        let mut hits = self.hits.lock();
        // Drop clients whose whole window has lapsed
        hits.retain(|_, times| times.back().is_some_and(|t| *t > cutoff));

        let times = hits.entry(client.to_string()).or_default();
        while times.front().is_some_and(|t| *t <= cutoff) {
            times.pop_front();
        }

        if times.len() >= limit {
            let retry_after_secs = times
                .front()
                .map(|oldest| (*oldest + self.window - now).num_seconds().max(1) as u64)
                .unwrap_or(1);
            return Err(RateLimitError::Exceeded { retry_after_secs });
        }

        times.push_back(now);
        Ok(())
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .finish()
    }
}

//! Pending-entity store
//!
//! Holds the most recent extraction for a session until the application page
//! accepts or rejects it. Entries carry an explicit expiry checked at read
//! time; there is no background sweep. An expired or missing entry simply
//! means there is nothing to hydrate.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use loan_autofill_config::HandoffConfig;
use loan_autofill_core::{Clock, EntityRecord, SystemClock};

use crate::PersistenceError;

const MAX_SESSION_ID_LEN: usize = 128;
// chrono durations are bounded by i64 milliseconds
const MAX_TTL_SECONDS: u64 = (i64::MAX / 1_000) as u64;

/// Stored payload: the record plus when it stops being offered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingEntry {
    pub data: EntityRecord,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

impl PendingEntry {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Storage for entity records awaiting hydration
#[async_trait]
pub trait PendingEntityStore: Send + Sync {
    /// Store a record for a session, replacing any earlier one
    async fn put(&self, session: &str, record: EntityRecord) -> Result<(), PersistenceError>;

    /// Read the pending record without consuming it
    async fn peek(&self, session: &str) -> Result<Option<EntityRecord>, PersistenceError>;

    /// Read and remove the pending record (accept)
    async fn take(&self, session: &str) -> Result<Option<EntityRecord>, PersistenceError>;

    /// Drop the pending record (reject)
    async fn clear(&self, session: &str) -> Result<(), PersistenceError>;

    /// Lifetime given to newly stored records
    fn ttl(&self) -> Duration;
}

/// Namespaced storage key for a session
pub fn storage_key(namespace: &str, session: &str) -> Result<String, PersistenceError> {
    let valid = !session.is_empty()
        && session.len() <= MAX_SESSION_ID_LEN
        && session
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(PersistenceError::InvalidKey(session.to_string()));
    }
    Ok(format!("{}:{}", namespace, session))
}

/// In-process store
pub struct InMemoryPendingStore {
    entries: RwLock<HashMap<String, PendingEntry>>,
    namespace: String,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryPendingStore {
    fn default() -> Self {
        Self::new(&HandoffConfig::default())
    }
}

impl InMemoryPendingStore {
    pub fn new(config: &HandoffConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &HandoffConfig, clock: Arc<dyn Clock>) -> Self {
        let ttl = Duration::seconds(config.ttl_seconds.min(MAX_TTL_SECONDS) as i64);
        Self {
            entries: RwLock::new(HashMap::new()),
            namespace: config.namespace.clone(),
            ttl,
            clock,
        }
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn key(&self, session: &str) -> Result<String, PersistenceError> {
        storage_key(&self.namespace, session)
    }
}

#[async_trait]
impl PendingEntityStore for InMemoryPendingStore {
    async fn put(&self, session: &str, record: EntityRecord) -> Result<(), PersistenceError> {
        let key = self.key(session)?;
        let now = self.clock.now();
        let entry = PendingEntry {
            data: record,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        let mut entries = self.entries.write();
        // Sessions that never come back are dropped here
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired(now));
        let pruned = before - entries.len();
        entries.insert(key, entry);
        drop(entries);

        tracing::debug!(session = %session, pruned, "Stored pending entities");
        Ok(())
    }

    async fn peek(&self, session: &str) -> Result<Option<EntityRecord>, PersistenceError> {
        let key = self.key(session)?;
        let now = self.clock.now();

        match self.entries.read().get(&key) {
            None => return Ok(None),
            Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.data.clone())),
            Some(_) => {}
        }

        // Re-check under the write lock; a concurrent put may have refreshed it
        let mut entries = self.entries.write();
        if entries.get(&key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(&key);
            tracing::debug!(session = %session, "Pending entities expired");
        }
        Ok(None)
    }

    async fn take(&self, session: &str) -> Result<Option<EntityRecord>, PersistenceError> {
        let key = self.key(session)?;
        let now = self.clock.now();

        match self.entries.write().remove(&key) {
            Some(entry) if !entry.is_expired(now) => Ok(Some(entry.data)),
            Some(_) => {
                tracing::debug!(session = %session, "Pending entities expired");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn clear(&self, session: &str) -> Result<(), PersistenceError> {
        let key = self.key(session)?;
        self.entries.write().remove(&key);
        Ok(())
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}

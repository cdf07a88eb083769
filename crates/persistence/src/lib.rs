//! Pending-entity storage and cross-context handoff
//!
//! Provides:
//! - Pending entity store with read-time expiry (accept consumes, reject clears)
//! - Handoff message envelope with origin allow-list
//! - Base64 `prefill` parameter encoding

pub mod error;
pub mod handoff;
pub mod pending;

pub use error::{HandoffError, PersistenceError};
pub use handoff::{decode_prefill, encode_prefill, parse_message, HandoffMessage, OriginAllowList};
pub use pending::{storage_key, InMemoryPendingStore, PendingEntityStore, PendingEntry};

//! Core types for loan application autofill
//!
//! This crate provides the foundational types used across all other crates:
//! - Entity record and confidence map produced by extraction
//! - Chat transcript messages
//! - Form field model written by hydration
//! - Business registration number checksum
//! - Injectable clock
//! - Error types

pub mod clock;
pub mod conversation;
pub mod entity;
pub mod error;
pub mod form;
pub mod regno;

pub use clock::{Clock, ManualClock, SystemClock};
pub use conversation::{transcript_text, Message, TurnRole};
pub use entity::{
    paths, Borrower, Business, ConfidenceMap, EntityRecord, LoanPurpose, LoanTerms,
    RecordMetadata, SOURCE_CHAT,
};
pub use error::{Error, Result};
pub use form::{FieldKind, FieldMark, FormField, SelectOption};

//! Centralized constants for loan autofill
//!
//! Single source of truth for confidence priors, hydration thresholds and
//! handoff defaults. Settings default to these values.

/// Confidence priors assigned by the extraction engine, per field
pub mod priors {
    pub const PHONE: f64 = 0.95;
    pub const EMAIL: f64 = 0.90;
    pub const REG_NO: f64 = 0.85;
    /// Ceiling applied to `business.regNo` when its checksum fails
    pub const REG_NO_INVALID_CAP: f64 = 0.30;
    pub const AMOUNT: f64 = 0.80;
    pub const PURPOSE: f64 = 0.80;
    pub const TERM: f64 = 0.60;
    pub const NAME: f64 = 0.70;
    /// Floor for a business name found through the labelled path
    pub const BUSINESS_NAME: f64 = 0.80;
}

/// Hydration confidence thresholds
pub mod thresholds {
    /// At or above: overwrite allowed (when enabled) and "confirmed" mark
    pub const STRONG: f64 = 0.85;
    /// At or above (and below strong): "caution" mark
    pub const WEAK: f64 = 0.60;
}

/// Pending-entity handoff defaults
pub mod handoff {
    /// Namespace key under which pending entities are stored
    pub const NAMESPACE_KEY: &str = "loan-autofill.pending-entities.v1";
    /// Time-to-live of a pending entity payload (15 minutes)
    pub const DEFAULT_TTL_SECONDS: u64 = 15 * 60;
}

/// Server defaults
pub mod server {
    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    /// Requests per client per minute
    pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 10;
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
}

/// Longest business name hydration will accept
pub const MAX_BUSINESS_NAME_CHARS: usize = 40;

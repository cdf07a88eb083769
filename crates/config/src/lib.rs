//! Configuration management for loan autofill
//!
//! Supports loading configuration from:
//! - YAML/TOML/JSON files under `config/` (`default.*`, then `{env}.*`)
//! - Environment variables (`LOAN_AUTOFILL__` prefix, `__` separated)
//!
//! Extraction priors and hydration thresholds live here so the engine and
//! the hydrator read one canonical set of numbers.

pub mod constants;
pub mod extraction;
pub mod hydration;
pub mod settings;

pub use extraction::{ConfidencePriors, ExtractionConfig};
pub use hydration::{FillPolicy, HydrationConfig};
pub use settings::{
    load_settings, load_settings_from, HandoffConfig, ObservabilityConfig, RateLimitConfig,
    RuntimeEnvironment, ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

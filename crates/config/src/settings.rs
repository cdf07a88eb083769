//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{handoff, server};
use crate::{ConfigError, ExtractionConfig, HydrationConfig};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Confidence priors and record source tag
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Fill policy and thresholds
    #[serde(default)]
    pub hydration: HydrationConfig,

    /// Pending-entity storage
    #[serde(default)]
    pub handoff: HandoffConfig,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.extraction.priors.validate()?;
        self.hydration.policy.validate()?;
        self.validate_handoff()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        if server.rate_limit.enabled && server.rate_limit.requests_per_minute == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.rate_limit.requests_per_minute".to_string(),
                message: "Must be at least 1 when rate limiting is enabled".to_string(),
            });
        }

        if self.environment.is_production() && !server.cors_enabled {
            return Err(ConfigError::InvalidValue {
                field: "server.cors_enabled".to_string(),
                message: "CORS must be enabled in production".to_string(),
            });
        }

        Ok(())
    }

    fn validate_handoff(&self) -> Result<(), ConfigError> {
        if self.handoff.ttl_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "handoff.ttl_seconds".to_string(),
                message: "TTL must be at least 1 second".to_string(),
            });
        }

        if self.handoff.namespace.trim().is_empty() {
            return Err(ConfigError::MissingField("handoff.namespace".to_string()));
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Origins whose handoff messages are accepted
    #[serde(default)]
    pub handoff_origins: Vec<String>,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

fn default_host() -> String {
    server::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    server::DEFAULT_PORT
}

fn default_timeout() -> u64 {
    server::DEFAULT_TIMEOUT_SECONDS
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: default_true(),
            // Empty by default - must be explicitly configured for production
            cors_origins: Vec::new(),
            handoff_origins: Vec::new(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Per-client request rate limiting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum extraction requests per client in a sliding minute
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

fn default_requests_per_minute() -> u32 {
    server::DEFAULT_REQUESTS_PER_MINUTE
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

/// Logging and metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub log_json: bool,

    /// Expose Prometheus metrics at /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Pending-entity handoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffConfig {
    /// Lifetime of a stored entity payload
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Namespace key prefix for stored payloads
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_ttl_seconds() -> u64 {
    handoff::DEFAULT_TTL_SECONDS
}

fn default_namespace() -> String {
    handoff::NAMESPACE_KEY.to_string()
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            namespace: default_namespace(),
        }
    }
}

/// Load settings from `config/` and the environment
///
/// Priority: env vars > config/{env}.* > config/default.* > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from an explicit config directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    let default_path = dir.join("default");
    builder = builder.add_source(File::with_name(&default_path.to_string_lossy()).required(false));

    if let Some(env_name) = env {
        let env_path = dir.join(env_name);
        builder = builder.add_source(File::with_name(&env_path.to_string_lossy()).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("LOAN_AUTOFILL")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

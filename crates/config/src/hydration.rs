//! Hydration policy configuration

use serde::{Deserialize, Serialize};

use crate::constants::thresholds;
use crate::ConfigError;

/// When hydration may write into a field, and how fills are marked
///
/// One canonical threshold pair is used for both overwrite permission and
/// highlight tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillPolicy {
    /// Confidence at or above which an overwrite is allowed and a fill is "confirmed"
    #[serde(default = "default_strong")]
    pub strong: f64,

    /// Confidence at or above which a fill is marked "caution"
    #[serde(default = "default_weak")]
    pub weak: f64,

    /// Only ever write into empty fields
    #[serde(default = "default_true")]
    pub fill_empty_only: bool,

    /// Overwrite non-empty fields regardless of confidence
    #[serde(default)]
    pub allow_overwrite_below_strong: bool,
}

fn default_strong() -> f64 {
    thresholds::STRONG
}

fn default_weak() -> f64 {
    thresholds::WEAK
}

fn default_true() -> bool {
    true
}

impl Default for FillPolicy {
    fn default() -> Self {
        Self {
            strong: default_strong(),
            weak: default_weak(),
            fill_empty_only: true,
            allow_overwrite_below_strong: false,
        }
    }
}

impl FillPolicy {
    /// Overwrite non-empty fields when confidence reaches the strong threshold
    pub fn overwrite_when_strong() -> Self {
        Self {
            fill_empty_only: false,
            ..Default::default()
        }
    }

    /// Overwrite every non-empty field
    pub fn overwrite_always() -> Self {
        Self {
            fill_empty_only: false,
            allow_overwrite_below_strong: true,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("hydration.policy.strong", self.strong), ("hydration.policy.weak", self.weak)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!("Must be between 0.0 and 1.0, got {}", value),
                });
            }
        }

        if self.weak > self.strong {
            return Err(ConfigError::InvalidValue {
                field: "hydration.policy.weak".to_string(),
                message: format!(
                    "Weak threshold {} must not exceed strong threshold {}",
                    self.weak, self.strong
                ),
            });
        }

        Ok(())
    }
}

/// Hydration configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HydrationConfig {
    #[serde(default)]
    pub policy: FillPolicy,
}

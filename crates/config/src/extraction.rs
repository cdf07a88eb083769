//! Extraction engine configuration

use serde::{Deserialize, Serialize};

use crate::constants::priors;
use crate::ConfigError;

/// Fixed confidence weights the engine assigns per recognized field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidencePriors {
    #[serde(default = "default_phone")]
    pub phone: f64,
    #[serde(default = "default_email")]
    pub email: f64,
    #[serde(default = "default_reg_no")]
    pub reg_no: f64,
    /// Ceiling for a registration number that fails its checksum
    #[serde(default = "default_reg_no_invalid_cap")]
    pub reg_no_invalid_cap: f64,
    #[serde(default = "default_amount")]
    pub amount: f64,
    #[serde(default = "default_purpose")]
    pub purpose: f64,
    #[serde(default = "default_term")]
    pub term: f64,
    #[serde(default = "default_name")]
    pub name: f64,
    #[serde(default = "default_business_name")]
    pub business_name: f64,
}

fn default_phone() -> f64 {
    priors::PHONE
}
fn default_email() -> f64 {
    priors::EMAIL
}
fn default_reg_no() -> f64 {
    priors::REG_NO
}
fn default_reg_no_invalid_cap() -> f64 {
    priors::REG_NO_INVALID_CAP
}
fn default_amount() -> f64 {
    priors::AMOUNT
}
fn default_purpose() -> f64 {
    priors::PURPOSE
}
fn default_term() -> f64 {
    priors::TERM
}
fn default_name() -> f64 {
    priors::NAME
}
fn default_business_name() -> f64 {
    priors::BUSINESS_NAME
}

impl Default for ConfidencePriors {
    fn default() -> Self {
        Self {
            phone: default_phone(),
            email: default_email(),
            reg_no: default_reg_no(),
            reg_no_invalid_cap: default_reg_no_invalid_cap(),
            amount: default_amount(),
            purpose: default_purpose(),
            term: default_term(),
            name: default_name(),
            business_name: default_business_name(),
        }
    }
}

impl ConfidencePriors {
    fn entries(&self) -> [(&'static str, f64); 9] {
        [
            ("phone", self.phone),
            ("email", self.email),
            ("reg_no", self.reg_no),
            ("reg_no_invalid_cap", self.reg_no_invalid_cap),
            ("amount", self.amount),
            ("purpose", self.purpose),
            ("term", self.term),
            ("name", self.name),
            ("business_name", self.business_name),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.entries() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    field: format!("extraction.priors.{}", name),
                    message: format!("Must be between 0.0 and 1.0, got {}", value),
                });
            }
        }
        Ok(())
    }
}

/// Extraction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Value of `metadata.source` on produced records
    #[serde(default = "default_source")]
    pub source: String,

    #[serde(default)]
    pub priors: ConfidencePriors,
}

fn default_source() -> String {
    "chat".to_string()
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            priors: ConfidencePriors::default(),
        }
    }
}

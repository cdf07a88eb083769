//! Per-field fill decision
//!
//! Decides whether a candidate value may be written into a form field given
//! the field's current content, the candidate's confidence and the
//! [`FillPolicy`].

use once_cell::sync::Lazy;
use regex::Regex;

use loan_autofill_config::constants::MAX_BUSINESS_NAME_CHARS;
use loan_autofill_config::FillPolicy;
use loan_autofill_core::{paths, FormField};

// Interrogative or imperative phrasing that slipped through as a business name
static SENTENCE_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\?|무엇|뭐|인가요|해주세요|해줘|있으신가요").unwrap());

/// Outcome of a fill decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillDecision {
    /// Field was empty
    Fill,
    /// Field held a value and the policy allows replacing it
    Overwrite,
    /// No candidate value for this path
    SkipNoValue,
    /// Candidate rejected as not plausibly a value
    SkipImplausible,
    /// Field already holds a value and the policy keeps it
    SkipOccupied,
}

impl FillDecision {
    pub fn should_fill(&self) -> bool {
        matches!(self, FillDecision::Fill | FillDecision::Overwrite)
    }
}

/// Decide whether `candidate` should be written into `field`
pub fn decide(
    policy: &FillPolicy,
    field: &FormField,
    candidate: Option<&str>,
    confidence: Option<f64>,
) -> FillDecision {
    let value = match candidate {
        Some(v) if !v.is_empty() => v,
        _ => return FillDecision::SkipNoValue,
    };

    if field.path == paths::BUSINESS_NAME && looks_like_sentence(value) {
        return FillDecision::SkipImplausible;
    }

    if field.is_empty() {
        return FillDecision::Fill;
    }

    if policy.fill_empty_only {
        return FillDecision::SkipOccupied;
    }

    if policy.allow_overwrite_below_strong {
        return FillDecision::Overwrite;
    }

    match confidence {
        Some(c) if c >= policy.strong => FillDecision::Overwrite,
        _ => FillDecision::SkipOccupied,
    }
}

fn looks_like_sentence(value: &str) -> bool {
    let trimmed = value.trim();
    SENTENCE_MARKERS.is_match(trimmed) || trimmed.chars().count() > MAX_BUSINESS_NAME_CHARS
}

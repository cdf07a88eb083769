//! Value normalization for form inputs
//!
//! Extracted values are stored raw (ten-digit registration numbers, integer
//! won). Presentation happens here, at fill time, through a registry keyed by
//! input kind with optional per-path overrides. Selects are resolved against
//! their options separately by [`SelectResolver`].

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use loan_autofill_core::{paths, regno, FieldKind, SelectOption};

use crate::synonyms::SynonymDictionary;

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{4}[./-][0-9]{2}[./-][0-9]{2}").unwrap());

static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.\-]").unwrap());

/// Turns a raw entity value into the string an input should hold
pub trait FieldNormalizer: Send + Sync {
    fn normalize(&self, value: &str, kind: &FieldKind) -> String;
}

/// Leaves the value untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl FieldNormalizer for PassThrough {
    fn normalize(&self, value: &str, _kind: &FieldKind) -> String {
        value.to_string()
    }
}

/// `YYYY-MM-DD`, accepting `.` or `/` separators
#[derive(Debug, Clone, Copy, Default)]
pub struct DateNormalizer;

impl FieldNormalizer for DateNormalizer {
    fn normalize(&self, value: &str, _kind: &FieldKind) -> String {
        match DATE_PATTERN.find(value) {
            Some(m) => m.as_str().replace(['.', '/'], "-"),
            None => value.to_string(),
        }
    }
}

/// Plain number string without grouping
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberNormalizer;

impl FieldNormalizer for NumberNormalizer {
    fn normalize(&self, value: &str, _kind: &FieldKind) -> String {
        plain_number(value).unwrap_or_else(|| value.to_string())
    }
}

/// `XXX-XX-XXXXX` when the value holds exactly ten digits
#[derive(Debug, Clone, Copy, Default)]
pub struct RegNoFormatter;

impl FieldNormalizer for RegNoFormatter {
    fn normalize(&self, value: &str, _kind: &FieldKind) -> String {
        regno::format_display(value)
    }
}

/// Won amounts: comma-grouped in text inputs, plain digits in number inputs
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrencyFormatter;

impl FieldNormalizer for CurrencyFormatter {
    fn normalize(&self, value: &str, kind: &FieldKind) -> String {
        if matches!(kind, FieldKind::Number) {
            return NumberNormalizer.normalize(value, kind);
        }
        match value.trim().parse::<u64>() {
            Ok(amount) => group_thousands(amount),
            Err(_) => value.to_string(),
        }
    }
}

/// Which paths an override applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatch {
    Exact(String),
    Suffix(String),
}

impl PathMatch {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathMatch::Exact(p) => path == p,
            PathMatch::Suffix(s) => path.ends_with(s.as_str()),
        }
    }
}

/// Normalizers keyed by input kind, with per-path overrides checked first
#[derive(Clone)]
pub struct NormalizerRegistry {
    by_kind: HashMap<&'static str, Arc<dyn FieldNormalizer>>,
    overrides: Vec<(PathMatch, Arc<dyn FieldNormalizer>)>,
    fallback: Arc<dyn FieldNormalizer>,
}

impl std::fmt::Debug for NormalizerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizerRegistry")
            .field("kinds", &self.by_kind.keys().collect::<Vec<_>>())
            .field(
                "overrides",
                &self.overrides.iter().map(|(m, _)| m).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for NormalizerRegistry {
    fn default() -> Self {
        Self::loan_application()
    }
}

impl NormalizerRegistry {
    /// Registry with no kind normalizers; every value passes through
    pub fn empty() -> Self {
        Self {
            by_kind: HashMap::new(),
            overrides: Vec::new(),
            fallback: Arc::new(PassThrough),
        }
    }

    /// Registry for the loan application form
    pub fn loan_application() -> Self {
        Self::empty()
            .with_kind("date", DateNormalizer)
            .with_kind("number", NumberNormalizer)
            .with_override(PathMatch::Exact(paths::BUSINESS_REG_NO.to_string()), RegNoFormatter)
            .with_override(PathMatch::Suffix("AmountKRW".to_string()), CurrencyFormatter)
    }

    pub fn with_kind(mut self, kind: &'static str, normalizer: impl FieldNormalizer + 'static) -> Self {
        self.by_kind.insert(kind, Arc::new(normalizer));
        self
    }

    pub fn with_override(
        mut self,
        matcher: PathMatch,
        normalizer: impl FieldNormalizer + 'static,
    ) -> Self {
        self.overrides.push((matcher, Arc::new(normalizer)));
        self
    }

    /// Normalize a non-select value for the field at `path`
    pub fn normalize(&self, path: &str, value: &str, kind: &FieldKind) -> String {
        if let Some((_, normalizer)) = self.overrides.iter().find(|(m, _)| m.matches(path)) {
            return normalizer.normalize(value, kind);
        }

        self.by_kind
            .get(kind.name())
            .unwrap_or(&self.fallback)
            .normalize(value, kind)
    }
}

/// Picks the option a select should take for a value
#[derive(Debug, Clone, Default)]
pub struct SelectResolver {
    synonyms: SynonymDictionary,
}

impl SelectResolver {
    pub fn new(synonyms: SynonymDictionary) -> Self {
        Self { synonyms }
    }

    /// Option value to select, or `None` when nothing fits
    ///
    /// Order: exact option value or label, then the synonym's canonical term,
    /// then the raw value itself when the select has options at all.
    pub fn resolve(&self, path: &str, value: &str, options: &[SelectOption]) -> Option<String> {
        let target = value.trim();

        if let Some(option) = find_option(options, target) {
            return Some(option.value.clone());
        }

        if let Some(canonical) = self.synonyms.canonical(path, target) {
            if let Some(option) = find_option(options, canonical) {
                return Some(option.value.clone());
            }
        }

        if options.is_empty() {
            None
        } else {
            Some(target.to_string())
        }
    }
}

fn find_option<'a>(options: &'a [SelectOption], target: &str) -> Option<&'a SelectOption> {
    options
        .iter()
        .find(|o| o.value == target || o.label.trim() == target)
}

fn plain_number(value: &str) -> Option<String> {
    let stripped = NON_NUMERIC.replace_all(value, "");
    if stripped.is_empty() {
        return None;
    }
    if let Ok(n) = stripped.parse::<i64>() {
        return Some(n.to_string());
    }
    match stripped.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n.to_string()),
        _ => None,
    }
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

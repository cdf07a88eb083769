//! Loan application entity record
//!
//! The record produced by extraction and consumed by hydration. Its JSON shape
//! is fixed: every leaf is always present, `null` when nothing was extracted.
//!
//! ```text
//! {
//!   "borrower": { "name", "phone", "email" },
//!   "business": { "name", "regNo" },
//!   "loan":     { "purpose", "desiredAmountKRW", "desiredTermMonths" },
//!   "metadata": { "source", "updatedAt", "confidence": { "<path>": 0.0..=1.0 } }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Source tag for records built from chat transcripts
pub const SOURCE_CHAT: &str = "chat";

/// Dotted field paths the extraction engine can populate
pub mod paths {
    pub const BORROWER_NAME: &str = "borrower.name";
    pub const BORROWER_PHONE: &str = "borrower.phone";
    pub const BORROWER_EMAIL: &str = "borrower.email";
    pub const BUSINESS_NAME: &str = "business.name";
    pub const BUSINESS_REG_NO: &str = "business.regNo";
    pub const LOAN_PURPOSE: &str = "loan.purpose";
    pub const LOAN_AMOUNT: &str = "loan.desiredAmountKRW";
    pub const LOAN_TERM: &str = "loan.desiredTermMonths";

    /// All leaf paths, in record order
    pub const ALL: [&str; 8] = [
        BORROWER_NAME,
        BORROWER_PHONE,
        BORROWER_EMAIL,
        BUSINESS_NAME,
        BUSINESS_REG_NO,
        LOAN_PURPOSE,
        LOAN_AMOUNT,
        LOAN_TERM,
    ];
}

/// Loan purpose vocabulary, in recognition precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanPurpose {
    #[serde(rename = "운전자금")]
    WorkingCapital,
    #[serde(rename = "시설자금")]
    Facility,
    #[serde(rename = "창업자금")]
    Startup,
    #[serde(rename = "기타")]
    Other,
}

impl LoanPurpose {
    /// Vocabulary order; earlier terms win when several appear in a text
    pub const ALL: [LoanPurpose; 4] = [
        LoanPurpose::WorkingCapital,
        LoanPurpose::Facility,
        LoanPurpose::Startup,
        LoanPurpose::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanPurpose::WorkingCapital => "운전자금",
            LoanPurpose::Facility => "시설자금",
            LoanPurpose::Startup => "창업자금",
            LoanPurpose::Other => "기타",
        }
    }

    pub fn from_term(term: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == term)
    }
}

impl std::fmt::Display for LoanPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field trust scores keyed by dotted path
///
/// Absence of a path means "no opinion", not zero confidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfidenceMap(BTreeMap<String, f64>);

impl ConfidenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a score, clamped into [0, 1]
    pub fn set(&mut self, path: &str, confidence: f64) {
        self.0.insert(path.to_string(), confidence.clamp(0.0, 1.0));
    }

    pub fn get(&self, path: &str) -> Option<f64> {
        self.0.get(path).copied()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Borrower {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Business {
    #[serde(default)]
    pub name: Option<String>,
    /// Ten raw digits, never dashed
    #[serde(default, rename = "regNo")]
    pub reg_no: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    #[serde(default)]
    pub purpose: Option<LoanPurpose>,
    /// Whole won
    #[serde(default, rename = "desiredAmountKRW")]
    pub desired_amount_krw: Option<u64>,
    #[serde(default, rename = "desiredTermMonths")]
    pub desired_term_months: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub source: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub confidence: ConfidenceMap,
}

/// Structured result of one extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(default)]
    pub borrower: Borrower,
    #[serde(default)]
    pub business: Business,
    #[serde(default)]
    pub loan: LoanTerms,
    pub metadata: RecordMetadata,
}

impl EntityRecord {
    /// Empty record stamped with the given source and time
    pub fn empty(source: impl Into<String>, updated_at: DateTime<Utc>) -> Self {
        Self {
            borrower: Borrower::default(),
            business: Business::default(),
            loan: LoanTerms::default(),
            metadata: RecordMetadata {
                source: source.into(),
                updated_at,
                confidence: ConfidenceMap::new(),
            },
        }
    }

    /// Look up a leaf value by dotted path, rendered as text
    ///
    /// Integers render as plain digits. Unknown paths and blank values are
    /// `None`, so form fields the record does not know about are skipped.
    pub fn value_at(&self, path: &str) -> Option<String> {
        let value = match path {
            paths::BORROWER_NAME => self.borrower.name.clone(),
            paths::BORROWER_PHONE => self.borrower.phone.clone(),
            paths::BORROWER_EMAIL => self.borrower.email.clone(),
            paths::BUSINESS_NAME => self.business.name.clone(),
            paths::BUSINESS_REG_NO => self.business.reg_no.clone(),
            paths::LOAN_PURPOSE => self.loan.purpose.map(|p| p.as_str().to_string()),
            paths::LOAN_AMOUNT => self.loan.desired_amount_krw.map(|n| n.to_string()),
            paths::LOAN_TERM => self.loan.desired_term_months.map(|n| n.to_string()),
            _ => None,
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Confidence recorded for a path, if any
    pub fn confidence(&self, path: &str) -> Option<f64> {
        self.metadata.confidence.get(path)
    }

    /// Paths whose leaf value is present
    pub fn present_paths(&self) -> Vec<&'static str> {
        paths::ALL
            .into_iter()
            .filter(|p| self.value_at(p).is_some())
            .collect()
    }

    /// Whether the record carries anything worth offering for autofill
    pub fn has_useful(&self) -> bool {
        [
            paths::BORROWER_NAME,
            paths::BORROWER_PHONE,
            paths::BUSINESS_NAME,
            paths::BUSINESS_REG_NO,
            paths::LOAN_PURPOSE,
            paths::LOAN_AMOUNT,
        ]
        .into_iter()
        .any(|p| self.value_at(p).is_some())
    }

    /// Every confidence key points at a present leaf and lies in [0, 1]
    pub fn confidence_is_consistent(&self) -> bool {
        self.metadata
            .confidence
            .iter()
            .all(|(path, c)| (0.0..=1.0).contains(&c) && self.value_at(path).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> EntityRecord {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let mut record = EntityRecord::empty(SOURCE_CHAT, at);
        record.borrower.phone = Some("010-1234-5678".into());
        record.business.reg_no = Some("1234567891".into());
        record.loan.purpose = Some(LoanPurpose::WorkingCapital);
        record.loan.desired_amount_krw = Some(50_000_000);
        record.metadata.confidence.set(paths::BORROWER_PHONE, 0.95);
        record.metadata.confidence.set(paths::LOAN_AMOUNT, 0.8);
        record
    }

    #[test]
    fn test_serialized_shape_uses_wire_names() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["business"]["regNo"], "1234567891");
        assert_eq!(json["loan"]["desiredAmountKRW"], 50_000_000);
        assert_eq!(json["loan"]["purpose"], "운전자금");
        assert!(json["loan"]["desiredTermMonths"].is_null());
        assert!(json["borrower"]["email"].is_null());
        assert_eq!(json["metadata"]["source"], "chat");
        assert_eq!(json["metadata"]["confidence"]["borrower.phone"], 0.95);
        assert!(json["metadata"]["updatedAt"].as_str().unwrap().starts_with("2025-03-01T09:00:00"));
    }

    #[test]
    fn test_deserialize_tolerates_missing_sections() {
        let record: EntityRecord = serde_json::from_str(
            r#"{"borrower":{"name":"홍길동"},"metadata":{"source":"chat","updatedAt":"2025-03-01T09:00:00Z"}}"#,
        )
        .unwrap();
        assert_eq!(record.borrower.name.as_deref(), Some("홍길동"));
        assert!(record.business.reg_no.is_none());
        assert!(record.metadata.confidence.is_empty());
    }

    #[test]
    fn test_value_at_renders_leaves() {
        let record = sample();
        assert_eq!(record.value_at("loan.desiredAmountKRW").as_deref(), Some("50000000"));
        assert_eq!(record.value_at("loan.purpose").as_deref(), Some("운전자금"));
        assert_eq!(record.value_at("borrower.name"), None);
        assert_eq!(record.value_at("business.address"), None);
        assert_eq!(record.value_at("nonsense"), None);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let mut map = ConfidenceMap::new();
        map.set("borrower.phone", 1.4);
        map.set("borrower.email", -0.2);
        assert_eq!(map.get("borrower.phone"), Some(1.0));
        assert_eq!(map.get("borrower.email"), Some(0.0));
    }

    #[test]
    fn test_has_useful() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let mut record = EntityRecord::empty(SOURCE_CHAT, at);
        assert!(!record.has_useful());

        record.loan.desired_term_months = Some(6);
        assert!(!record.has_useful());

        record.business.name = Some("한빛상사".into());
        assert!(record.has_useful());
    }

    #[test]
    fn test_confidence_consistency() {
        let mut record = sample();
        assert!(record.confidence_is_consistent());

        record.metadata.confidence.set(paths::BORROWER_EMAIL, 0.9);
        assert!(!record.confidence_is_consistent());
    }

    #[test]
    fn test_purpose_from_term() {
        assert_eq!(LoanPurpose::from_term("시설자금"), Some(LoanPurpose::Facility));
        assert_eq!(LoanPurpose::from_term("운영자금"), None);
    }
}

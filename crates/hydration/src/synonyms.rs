//! Select synonym dictionary
//!
//! Maps free-text variants onto the canonical option a select should pick,
//! per field path. "운영자금" selects the "운전자금" option.

use std::collections::HashMap;

/// Canonical term plus the variants that resolve to it
#[derive(Debug, Clone)]
struct SynonymGroup {
    canonical: String,
    variants: Vec<String>,
}

/// Per-path synonym dictionary
#[derive(Debug, Clone, Default)]
pub struct SynonymDictionary {
    groups: HashMap<String, Vec<SynonymGroup>>,
}

impl SynonymDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary for the loan application form
    pub fn loan_application() -> Self {
        let mut dict = Self::new();
        dict.insert(
            "loan.purpose",
            "운전자금",
            &["운전자금", "운영자금", "운전 자금", "운영비"],
        );
        dict.insert("loan.purpose", "시설자금", &["시설자금", "설비자금", "시설", "설비"]);
        dict.insert("loan.purpose", "창업자금", &["창업자금", "창업", "개업"]);
        dict.insert("loan.purpose", "기타", &["기타", "기타자금", "기타 용도"]);
        dict.insert("business.type", "개인", &["개인", "개인사업자", "개인사업"]);
        dict.insert(
            "business.type",
            "법인",
            &["법인", "법인사업자", "주식회사", "유한회사"],
        );
        dict
    }

    /// Register a canonical term and its variants for a path
    pub fn insert(&mut self, path: &str, canonical: &str, variants: &[&str]) {
        self.groups
            .entry(path.to_string())
            .or_default()
            .push(SynonymGroup {
                canonical: canonical.to_string(),
                variants: variants.iter().map(|v| v.to_string()).collect(),
            });
    }

    /// Canonical term for a value at a path, if the value is a known variant
    pub fn canonical(&self, path: &str, value: &str) -> Option<&str> {
        let target = value.trim();
        self.groups
            .get(path)?
            .iter()
            .find(|group| group.variants.iter().any(|v| v == target))
            .map(|group| group.canonical.as_str())
    }
}

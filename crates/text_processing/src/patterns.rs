//! Field Recognizers
//!
//! Stateless, pure recognizers for the fixed set of loan application fields.
//! Each one takes raw text and returns the first value it finds, or `None`.
//! Recognizers never assign confidence; the extraction engine owns that.
//!
//! ## Static Regex Patterns
//!
//! Patterns are compiled once using `once_cell::sync::Lazy`.
//!
//! Word boundaries are written as `(?-u:\b)` so Hangul particles glued to a
//! number ("010-1234-5678로") still leave a boundary after the digits.

use once_cell::sync::Lazy;
use regex::Regex;

use loan_autofill_core::{regno, LoanPurpose};

// =============================================================================
// STATIC REGEX PATTERNS
// =============================================================================

// Korean mobile numbers: 010/011/016/017/018/019, optional dashes
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)01[016789]-?[0-9]{3,4}-?[0-9]{4}(?-u:\b)").unwrap()
});

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").unwrap()
});

// 3-2-5 digit grouping
static REG_NO_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)[0-9]{3}-?[0-9]{2}-?[0-9]{5}(?-u:\b)").unwrap()
});

static TERM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s*(?:개월|달|월)").unwrap());

// "대표자 성함: 홍길동", "대표 이름 홍길동입니다"
// The name is matched lazily so a trailing copula or particle is not swallowed.
static NAME_LABEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"대표자?\s*(?:이름|성함|명)[:\s]*([가-힣]{2,4}?)(?:입니다|이에요|예요|이고|이며|이라고|라고|님|씨|[^가-힣]|$)",
    )
    .unwrap()
});

// "저는 홍길동입니다"
static NAME_INTRO_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"저는\s*([가-힣]{2,4})입니다").unwrap());

// =============================================================================
// RECOGNIZERS
// =============================================================================

/// First Korean mobile number, verbatim (dashes kept as written)
pub fn recognize_phone(text: &str) -> Option<String> {
    PHONE_PATTERN.find(text).map(|m| m.as_str().to_string())
}

/// First email address, as written
pub fn recognize_email(text: &str) -> Option<String> {
    EMAIL_PATTERN.find(text).map(|m| m.as_str().to_string())
}

/// First business registration number, stripped to ten raw digits
pub fn recognize_reg_no(text: &str) -> Option<String> {
    REG_NO_PATTERN
        .find(text)
        .map(|m| regno::strip_digits(m.as_str()))
}

/// Loan term in months from "<n>개월", "<n>달" or "<n>월"
pub fn recognize_term_months(text: &str) -> Option<u32> {
    let caps = TERM_PATTERN.captures(text)?;
    match caps[1].parse::<u32>() {
        Ok(months) => Some(months),
        Err(_) => {
            tracing::debug!(value = %&caps[1], "Skipping term extraction - out of range");
            None
        }
    }
}

/// Loan purpose by vocabulary order, not text order
pub fn recognize_purpose(text: &str) -> Option<LoanPurpose> {
    LoanPurpose::ALL
        .into_iter()
        .find(|purpose| text.contains(purpose.as_str()))
}

/// Representative's name: labelled form first, then self-introduction
pub fn recognize_person_name(text: &str) -> Option<String> {
    NAME_LABEL_PATTERN
        .captures(text)
        .or_else(|| NAME_INTRO_PATTERN.captures(text))
        .map(|caps| caps[1].to_string())
}

//! Korean currency amount normalizer
//!
//! Converts mixed digit/word expressions such as "2억 3천만원", "5천만원" or
//! "50,000,000원" into whole won. A direct digit amount always wins over the
//! word units; the word units are summed independently.
//!
//! Best-effort heuristic, not a general Korean numeral parser: "삼천만원"
//! (spelled-out digits) is not recognized.

use once_cell::sync::Lazy;
use regex::Regex;

const EOK: f64 = 100_000_000.0;
const CHEON_MAN: u64 = 10_000_000;
const BAEK_MAN: u64 = 1_000_000;
const MAN: u64 = 10_000;

// "50,000,000원"
static DIRECT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9][0-9,]*)\s*원").unwrap());

// "2억", "1.5억"
static EOK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9][0-9,]*(?:\.[0-9]+)?)\s*억").unwrap());

// "3천만" and "3천 만" are the same quantity and are counted once
static CHEON_MAN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9][0-9,]*)\s*천\s*만").unwrap());

static BAEK_MAN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9][0-9,]*)\s*백\s*만").unwrap());

// A bare 만 count must not be followed by another digit; "1,000만" is grouped
static MAN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9][0-9,]*)\s*만(?:[^0-9]|$)").unwrap());

/// Normalize an amount expression to whole won
///
/// Returns `None` when nothing matched or every matched component is zero.
/// A parseable direct amount decides the result on its own, even when it is
/// zero; word units are only read when there is none.
pub fn normalize_amount(text: &str) -> Option<u64> {
    if let Some(caps) = DIRECT_PATTERN.captures(text) {
        match parse_grouped(&caps[1]) {
            Some(amount) => return Some(amount).filter(|a| *a > 0),
            None => {
                tracing::debug!(raw = %&caps[1], "Direct amount not parseable, trying word units")
            }
        }
    }
    word_amount(text)
}

/// Digits with optional thousands commas
fn parse_grouped(raw: &str) -> Option<u64> {
    raw.chars()
        .filter(|c| *c != ',')
        .collect::<String>()
        .parse()
        .ok()
}

fn word_amount(text: &str) -> Option<u64> {
    let mut matched = false;
    let mut total: u64 = 0;

    if let Some(count) = EOK_PATTERN
        .captures(text)
        .and_then(|c| c[1].replace(',', "").parse::<f64>().ok())
    {
        matched = true;
        total = total.saturating_add((count * EOK).round() as u64);
    }

    // 천만 is checked before the bare 만 so "3천만" is not also read as "3만"
    let mut rest = text.to_string();
    if let Some(caps) = CHEON_MAN_PATTERN.captures(text) {
        if let Some(count) = parse_grouped(&caps[1]) {
            matched = true;
            total = total.saturating_add(count.saturating_mul(CHEON_MAN));
        }
        rest = CHEON_MAN_PATTERN.replace_all(&rest, " ").into_owned();
    }

    if let Some(caps) = BAEK_MAN_PATTERN.captures(&rest) {
        if let Some(count) = parse_grouped(&caps[1]) {
            matched = true;
            total = total.saturating_add(count.saturating_mul(BAEK_MAN));
        }
        rest = BAEK_MAN_PATTERN.replace_all(&rest, " ").into_owned();
    }

    if let Some(count) = MAN_PATTERN
        .captures(&rest)
        .and_then(|c| parse_grouped(&c[1]))
    {
        matched = true;
        total = total.saturating_add(count.saturating_mul(MAN));
    }

    if !matched || total == 0 {
        return None;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_word_units() {
        assert_eq!(normalize_amount("2억 3천만원"), Some(230_000_000));
        assert_eq!(normalize_amount("5천만원"), Some(50_000_000));
        assert_eq!(normalize_amount("5천 만원 정도"), Some(50_000_000));
        assert_eq!(normalize_amount("1.5억"), Some(150_000_000));
        assert_eq!(normalize_amount("3백만원"), Some(3_000_000));
    }

    #[test]
    fn test_direct_amount_takes_precedence() {
        assert_eq!(normalize_amount("50,000,000원"), Some(50_000_000));
        assert_eq!(normalize_amount("2억, 정확히는 210,000,000원"), Some(210_000_000));
    }

    #[test]
    fn test_bare_man() {
        assert_eq!(normalize_amount("500만 필요해요"), Some(5_000_000));
        assert_eq!(normalize_amount("1억 500만"), Some(105_000_000));
    }

    #[test]
    fn test_no_amount() {
        assert_eq!(normalize_amount("문의드립니다"), None);
        assert_eq!(normalize_amount(""), None);
    }

    #[test]
    fn test_all_zero_is_none() {
        assert_eq!(normalize_amount("0원"), None);
        assert_eq!(normalize_amount("0억 0천만"), None);
    }

    #[test]
    fn test_zero_direct_amount_blocks_word_units() {
        assert_eq!(normalize_amount("수수료 0원, 대출은 5천만원"), None);
    }

    #[test]
    fn test_grouped_unit_counts() {
        assert_eq!(normalize_amount("1,000만원"), Some(10_000_000));
        assert_eq!(normalize_amount("2억 1,500만"), Some(215_000_000));
    }

    #[test]
    fn test_cheon_man_is_not_double_counted() {
        // Only the 천만 component, never an extra bare 만
        assert_eq!(normalize_amount("3천만"), Some(30_000_000));
    }
}

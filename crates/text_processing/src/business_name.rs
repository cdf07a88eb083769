//! Business name recognizer
//!
//! Only label-anchored values are accepted ("상호명: 한빛상사"). The assistant
//! side of a transcript frequently asks for the same label ("상호명은
//! 무엇인가요?"), so candidates that read like a question or request are
//! rejected and older messages are consulted.

use once_cell::sync::Lazy;
use regex::Regex;

use loan_autofill_config::constants::MAX_BUSINESS_NAME_CHARS;
use loan_autofill_core::Message;

const MIN_BUSINESS_NAME_CHARS: usize = 2;

// Label, then a ':' or '-' separator, then up to the next newline/bullet/dash
static LABEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:사업자명|상호명?|회사명|법인명|점명)\s*[:\-]\s*([^\n#•\-]{1,40})").unwrap()
});

static EDGE_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\s,:\-–—]+|[\s,:\-–—]+$").unwrap());

static DISALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s·().&가-힣\-]").unwrap());

static QUESTION_GUARD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"무엇|뭐|인가요|인가|요\?|있나요|\?|주세요|해줘|작성할래").unwrap()
});

static CORPORATION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+주식회사$").unwrap());

/// Scan messages newest first and return the first acceptable business name
pub fn recognize_business_name(messages: &[Message]) -> Option<String> {
    messages
        .iter()
        .rev()
        .find_map(|message| candidate_from(&message.content))
}

/// Business name from a single text, if its label candidate survives the guards
pub fn candidate_from(text: &str) -> Option<String> {
    let caps = LABEL_PATTERN.captures(text)?;
    let raw = &caps[1];

    if QUESTION_GUARD.is_match(raw) {
        tracing::debug!("Business name candidate looks like a question");
        return None;
    }

    let cleaned = clean(raw);
    if cleaned.is_empty() || QUESTION_GUARD.is_match(&cleaned) {
        return None;
    }

    let len = cleaned.chars().count();
    if !(MIN_BUSINESS_NAME_CHARS..=MAX_BUSINESS_NAME_CHARS).contains(&len) {
        tracing::debug!(len, "Business name candidate length out of range");
        return None;
    }

    Some(CORPORATION_SUFFIX.replace(&cleaned, "주식회사").into_owned())
}

fn clean(raw: &str) -> String {
    let unbolded = raw.replace("**", "");
    let trimmed = EDGE_PUNCTUATION.replace_all(&unbolded, "");
    DISALLOWED_CHARS
        .replace_all(&trimmed, "")
        .trim()
        .to_string()
}

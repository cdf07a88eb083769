//! Korean business registration number (사업자등록번호) helpers

const WEIGHTS: [u32; 9] = [1, 3, 7, 1, 3, 7, 1, 3, 5];

/// Keep only ASCII digits
pub fn strip_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validate the weighted check digit of a 10-digit registration number
///
/// Dashes and other separators are ignored; anything that does not reduce
/// to exactly ten digits is invalid.
pub fn is_valid(raw: &str) -> bool {
    let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 10 {
        return false;
    }

    let weighted: u32 = digits
        .iter()
        .zip(WEIGHTS.iter())
        .map(|(d, w)| d * w)
        .sum();
    let sum = weighted + (digits[8] * 5) / 10;

    (10 - sum % 10) % 10 == digits[9]
}

/// Render ten raw digits as `XXX-XX-XXXXX`; other input is returned as-is
pub fn format_display(raw: &str) -> String {
    let digits = strip_digits(raw);
    if digits.len() == 10 {
        format!("{}-{}-{}", &digits[..3], &digits[3..5], &digits[5..])
    } else {
        raw.to_string()
    }
}

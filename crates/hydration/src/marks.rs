//! Confidence marks and soft validation applied after a fill

use loan_autofill_config::FillPolicy;
use loan_autofill_core::{paths, regno, FieldMark, FormField};

pub const NOTE_CONFIRMED: &str = "신뢰도 높음";
pub const NOTE_CAUTION: &str = "신뢰도 보통 — 제출 전 확인";
pub const NOTE_REG_NO_REVIEW: &str = "사업자등록번호 확인 필요";

/// Tier for a confidence value; unknown or below weak gets no mark
pub fn confidence_mark(policy: &FillPolicy, confidence: Option<f64>) -> Option<FieldMark> {
    match confidence {
        Some(c) if c >= policy.strong => Some(FieldMark::Confirmed),
        Some(c) if c >= policy.weak => Some(FieldMark::Caution),
        _ => None,
    }
}

/// Replace the field's mark from its confidence and re-validate what was written
pub fn apply_marks(policy: &FillPolicy, field: &mut FormField, confidence: Option<f64>) {
    field.clear_mark();

    match confidence_mark(policy, confidence) {
        Some(FieldMark::Confirmed) => mark(field, FieldMark::Confirmed, NOTE_CONFIRMED),
        Some(FieldMark::Caution) => mark(field, FieldMark::Caution, NOTE_CAUTION),
        _ => {}
    }

    if field.path == paths::BUSINESS_REG_NO {
        let digits = regno::strip_digits(&field.value);
        if !digits.is_empty() && !regno::is_valid(&digits) {
            tracing::warn!(path = %field.path, "Filled registration number failed checksum");
            mark(field, FieldMark::NeedsReview, NOTE_REG_NO_REVIEW);
        }
    }
}

fn mark(field: &mut FormField, mark: FieldMark, note: &str) {
    field.mark = Some(mark);
    if !field.notes.iter().any(|n| n == note) {
        field.add_note(note);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers() {
        let policy = FillPolicy::default();
        assert_eq!(confidence_mark(&policy, Some(0.95)), Some(FieldMark::Confirmed));
        assert_eq!(confidence_mark(&policy, Some(0.85)), Some(FieldMark::Confirmed));
        assert_eq!(confidence_mark(&policy, Some(0.84)), Some(FieldMark::Caution));
        assert_eq!(confidence_mark(&policy, Some(0.60)), Some(FieldMark::Caution));
        assert_eq!(confidence_mark(&policy, Some(0.59)), None);
        assert_eq!(confidence_mark(&policy, None), None);
    }

    #[test]
    fn test_notes_are_added_once() {
        let policy = FillPolicy::default();
        let mut field = FormField::text("borrower.phone").with_value("010-1234-5678");

        apply_marks(&policy, &mut field, Some(0.95));
        apply_marks(&policy, &mut field, Some(0.95));

        assert_eq!(field.mark, Some(FieldMark::Confirmed));
        assert_eq!(field.notes, vec![NOTE_CONFIRMED.to_string()]);
    }

    #[test]
    fn test_invalid_reg_no_needs_review() {
        let policy = FillPolicy::default();
        let mut field = FormField::text("business.regNo").with_value("123-45-67890");

        apply_marks(&policy, &mut field, Some(0.30));

        assert_eq!(field.mark, Some(FieldMark::NeedsReview));
        assert_eq!(field.notes, vec![NOTE_REG_NO_REVIEW.to_string()]);
    }

    #[test]
    fn test_valid_reg_no_keeps_tier() {
        let policy = FillPolicy::default();
        let mut field = FormField::text("business.regNo").with_value("123-45-67891");

        apply_marks(&policy, &mut field, Some(0.85));

        assert_eq!(field.mark, Some(FieldMark::Confirmed));
    }

    #[test]
    fn test_low_confidence_clears_old_mark() {
        let policy = FillPolicy::default();
        let mut field = FormField::text("borrower.name").with_value("홍길동");
        field.mark = Some(FieldMark::Confirmed);

        apply_marks(&policy, &mut field, Some(0.2));

        assert!(field.mark.is_none());
    }
}

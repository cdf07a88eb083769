//! Entity extraction engine
//!
//! Runs the field recognizers over a chat transcript and assembles a fresh
//! [`EntityRecord`] with a confidence entry for every field it filled.
//!
//! Recognizers run on the newline-joined transcript, except the business
//! name which scans messages newest first. Confidence comes from fixed
//! priors; a registration number failing its checksum is kept but its
//! confidence is capped.

mod request;

pub use request::ExtractionRequest;

use std::sync::Arc;

use loan_autofill_config::{ConfidencePriors, ExtractionConfig};
use loan_autofill_core::{
    paths, regno, transcript_text, Clock, EntityRecord, Message, SystemClock,
};

use crate::amount::normalize_amount;
use crate::business_name::recognize_business_name;
use crate::patterns;

/// Transcript to [`EntityRecord`] extractor
///
/// Holds no per-call state; one instance serves every request.
#[derive(Clone)]
pub struct EntityExtractor {
    source: String,
    priors: ConfidencePriors,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for EntityExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityExtractor")
            .field("source", &self.source)
            .field("priors", &self.priors)
            .finish()
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

impl EntityExtractor {
    /// Create an extractor stamping records with the wall clock
    pub fn new(config: ExtractionConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: ExtractionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            source: config.source,
            priors: config.priors,
            clock,
        }
    }

    /// Extract entities from an ordered transcript
    pub fn extract(&self, messages: &[Message]) -> EntityRecord {
        let text = transcript_text(messages);
        let mut record = EntityRecord::empty(self.source.clone(), self.clock.now());
        let priors = &self.priors;

        if let Some(phone) = patterns::recognize_phone(&text) {
            record.borrower.phone = Some(phone);
            record.metadata.confidence.set(paths::BORROWER_PHONE, priors.phone);
        }

        if let Some(email) = patterns::recognize_email(&text) {
            record.borrower.email = Some(email);
            record.metadata.confidence.set(paths::BORROWER_EMAIL, priors.email);
        }

        if let Some(reg_no) = patterns::recognize_reg_no(&text) {
            let confidence = if regno::is_valid(&reg_no) {
                priors.reg_no
            } else {
                tracing::warn!(
                    path = paths::BUSINESS_REG_NO,
                    "Registration number failed checksum, downgrading confidence"
                );
                priors.reg_no.min(priors.reg_no_invalid_cap)
            };
            record.business.reg_no = Some(reg_no);
            record.metadata.confidence.set(paths::BUSINESS_REG_NO, confidence);
        }

        if let Some(amount) = normalize_amount(&text) {
            record.loan.desired_amount_krw = Some(amount);
            record.metadata.confidence.set(paths::LOAN_AMOUNT, priors.amount);
        }

        if let Some(months) = patterns::recognize_term_months(&text) {
            record.loan.desired_term_months = Some(months);
            record.metadata.confidence.set(paths::LOAN_TERM, priors.term);
        }

        if let Some(purpose) = patterns::recognize_purpose(&text) {
            record.loan.purpose = Some(purpose);
            record.metadata.confidence.set(paths::LOAN_PURPOSE, priors.purpose);
        }

        if let Some(name) = patterns::recognize_person_name(&text) {
            record.borrower.name = Some(name);
            record.metadata.confidence.set(paths::BORROWER_NAME, priors.name);
        }

        if let Some(name) = recognize_business_name(messages) {
            let confidence = record
                .confidence(paths::BUSINESS_NAME)
                .unwrap_or(priors.business_name)
                .max(priors.business_name);
            record.business.name = Some(name);
            record.metadata.confidence.set(paths::BUSINESS_NAME, confidence);
        }

        tracing::debug!(
            messages = messages.len(),
            fields = record.metadata.confidence.len(),
            "Extraction complete"
        );

        record
    }

    /// Extract from a parsed request
    pub fn extract_request(&self, request: &ExtractionRequest) -> EntityRecord {
        self.extract(&request.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use loan_autofill_core::{LoanPurpose, ManualClock};

    fn extractor() -> EntityExtractor {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        EntityExtractor::with_clock(ExtractionConfig::default(), Arc::new(ManualClock::new(at)))
    }

    #[test]
    fn test_end_to_end_transcript() {
        let messages = vec![Message::user(
            "대표 이름 홍길동입니다. 010-1234-5678로 연락주세요. 운전자금으로 5천만원 정도 6개월 쓰려고 합니다.",
        )];
        let record = extractor().extract(&messages);

        assert_eq!(record.borrower.name.as_deref(), Some("홍길동"));
        assert_eq!(record.borrower.phone.as_deref(), Some("010-1234-5678"));
        assert_eq!(record.loan.purpose, Some(LoanPurpose::WorkingCapital));
        assert_eq!(record.loan.desired_amount_krw, Some(50_000_000));
        assert_eq!(record.loan.desired_term_months, Some(6));

        let confidence = &record.metadata.confidence;
        assert_eq!(confidence.get("borrower.phone"), Some(0.95));
        assert_eq!(confidence.get("loan.purpose"), Some(0.80));
        assert_eq!(confidence.get("loan.desiredAmountKRW"), Some(0.80));
        assert_eq!(confidence.get("loan.desiredTermMonths"), Some(0.60));
        assert_eq!(confidence.get("borrower.name"), Some(0.70));
        assert_eq!(confidence.len(), 5);
        assert!(record.confidence_is_consistent());
    }

    #[test]
    fn test_metadata_is_stamped() {
        let record = extractor().extract(&[]);
        assert_eq!(record.metadata.source, "chat");
        assert_eq!(
            record.metadata.updated_at,
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
        );
        assert!(record.metadata.confidence.is_empty());
        assert!(record.present_paths().is_empty());
    }

    #[test]
    fn test_valid_reg_no_keeps_prior() {
        let record = extractor().extract(&[Message::user("사업자번호는 123-45-67891입니다")]);
        assert_eq!(record.business.reg_no.as_deref(), Some("1234567891"));
        assert_eq!(record.confidence("business.regNo"), Some(0.85));
    }

    #[test]
    fn test_invalid_reg_no_is_kept_with_low_confidence() {
        let record = extractor().extract(&[Message::user("사업자번호는 123-45-67890입니다")]);
        assert_eq!(record.business.reg_no.as_deref(), Some("1234567890"));
        assert_eq!(record.confidence("business.regNo"), Some(0.30));
    }

    #[test]
    fn test_business_name_uses_message_order() {
        let messages = vec![
            Message::user("상호명: 한빛상사"),
            Message::assistant("상호명: 무엇인가요?"),
        ];
        let record = extractor().extract(&messages);
        assert_eq!(record.business.name.as_deref(), Some("한빛상사"));
        assert_eq!(record.confidence("business.name"), Some(0.80));
    }

    #[test]
    fn test_fields_are_found_across_messages() {
        let messages = vec![
            Message::assistant("연락처를 알려주세요"),
            Message::user("010-9876-5432"),
            Message::assistant("이메일도 부탁드립니다"),
            Message::user("owner@hanbit.kr"),
        ];
        let record = extractor().extract(&messages);
        assert_eq!(record.borrower.phone.as_deref(), Some("010-9876-5432"));
        assert_eq!(record.borrower.email.as_deref(), Some("owner@hanbit.kr"));
        assert_eq!(record.confidence("borrower.email"), Some(0.90));
    }

    #[test]
    fn test_nothing_recognized() {
        let record = extractor().extract(&[Message::user("문의드립니다")]);
        assert!(record.present_paths().is_empty());
        assert!(record.metadata.confidence.is_empty());
        assert!(!record.has_useful());
    }

    #[test]
    fn test_custom_priors_are_applied() {
        let mut config = ExtractionConfig::default();
        config.priors.phone = 0.5;
        config.source = "kiosk".to_string();
        let extractor = EntityExtractor::new(config);

        let record = extractor.extract(&[Message::user("010-1234-5678")]);
        assert_eq!(record.confidence("borrower.phone"), Some(0.5));
        assert_eq!(record.metadata.source, "kiosk");
    }

    #[test]
    fn test_each_call_returns_fresh_record() {
        let extractor = extractor();
        let first = extractor.extract(&[Message::user("010-1234-5678")]);
        let second = extractor.extract(&[Message::user("창업자금 문의")]);

        assert!(first.loan.purpose.is_none());
        assert!(second.borrower.phone.is_none());
        assert_eq!(second.loan.purpose, Some(LoanPurpose::Startup));
    }
}

//! Extraction over full request payloads

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use loan_autofill_config::ExtractionConfig;
use loan_autofill_core::{paths, LoanPurpose, ManualClock};
use loan_autofill_text_processing::{EntityExtractor, ExtractionRequest};

fn extractor() -> EntityExtractor {
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    EntityExtractor::with_clock(ExtractionConfig::default(), Arc::new(ManualClock::new(at)))
}

#[test]
fn test_full_consultation_transcript() {
    let body = serde_json::json!({
        "messages": [
            { "role": "assistant", "content": "안녕하세요. 상호명은 무엇인가요?" },
            { "role": "user", "content": "상호명: 한빛 주식회사" },
            { "role": "assistant", "content": "사업자등록번호와 연락처를 알려주세요." },
            { "role": "user", "content": "220-81-12341 이고 010-2222-3333, hanbit@corp.co.kr 입니다" },
            { "role": "assistant", "content": "자금 용도와 금액, 기간을 알려주세요." },
            { "role": "user", "content": "시설자금 2억 3천만원, 36개월이요. 저는 박서준입니다" }
        ]
    });
    let request = ExtractionRequest::from_slice(body.to_string().as_bytes()).unwrap();
    let record = extractor().extract_request(&request);

    assert_eq!(record.business.name.as_deref(), Some("한빛주식회사"));
    assert_eq!(record.business.reg_no.as_deref(), Some("2208112341"));
    assert_eq!(record.borrower.phone.as_deref(), Some("010-2222-3333"));
    assert_eq!(record.borrower.email.as_deref(), Some("hanbit@corp.co.kr"));
    assert_eq!(record.borrower.name.as_deref(), Some("박서준"));
    assert_eq!(record.loan.purpose, Some(LoanPurpose::Facility));
    assert_eq!(record.loan.desired_amount_krw, Some(230_000_000));
    assert_eq!(record.loan.desired_term_months, Some(36));

    assert_eq!(record.confidence(paths::BUSINESS_REG_NO), Some(0.85));
    assert_eq!(record.confidence(paths::BUSINESS_NAME), Some(0.80));
    assert!(record.confidence_is_consistent());
    assert!(record.has_useful());
}

#[test]
fn test_confidence_keys_match_present_leaves() {
    let transcripts = [
        "",
        "문의드립니다",
        "010-1234-5678",
        "사업자번호 123-45-67890, 5천만원",
        "대표자 성함: 김철수, 창업자금, 12개월",
    ];

    for text in transcripts {
        let record = extractor().extract(&[loan_autofill_core::Message::user(text)]);
        let present = record.present_paths();
        let keys: Vec<&str> = record.metadata.confidence.paths().collect();

        assert_eq!(keys.len(), present.len(), "transcript: {text}");
        for key in keys {
            assert!(present.contains(&key), "transcript: {text}, key: {key}");
        }
        for (_, c) in record.metadata.confidence.iter() {
            assert!((0.0..=1.0).contains(&c));
        }
    }
}

#[test]
fn test_query_shape_is_extracted() {
    let request =
        ExtractionRequest::from_slice(r#"{"query":"운전자금 3천만원 필요합니다"}"#.as_bytes()).unwrap();
    let record = extractor().extract_request(&request);

    assert_eq!(record.loan.purpose, Some(LoanPurpose::WorkingCapital));
    assert_eq!(record.loan.desired_amount_krw, Some(30_000_000));
}

#[test]
fn test_record_serializes_with_null_leaves() {
    let record = extractor().extract(&[loan_autofill_core::Message::user("010-1234-5678")]);
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["borrower"]["phone"], "010-1234-5678");
    assert!(json["borrower"]["name"].is_null());
    assert!(json["business"]["regNo"].is_null());
    assert!(json["loan"]["desiredAmountKRW"].is_null());
    assert_eq!(json["metadata"]["confidence"].as_object().unwrap().len(), 1);
}

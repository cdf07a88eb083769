//! Chat page to application page handoff

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use loan_autofill_config::HandoffConfig;
use loan_autofill_core::{EntityRecord, LoanPurpose, ManualClock, SOURCE_CHAT};
use loan_autofill_persistence::{
    decode_prefill, encode_prefill, HandoffMessage, InMemoryPendingStore, OriginAllowList,
    PendingEntityStore,
};

fn record() -> EntityRecord {
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    let mut record = EntityRecord::empty(SOURCE_CHAT, at);
    record.loan.purpose = Some(LoanPurpose::Startup);
    record.metadata.confidence.set("loan.purpose", 0.8);
    record
}

#[tokio::test]
async fn test_prefill_then_pending_store() {
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()));
    let config = HandoffConfig {
        ttl_seconds: 60,
        ..Default::default()
    };
    let store = InMemoryPendingStore::with_clock(&config, clock.clone());

    let param = encode_prefill(&record()).unwrap();
    let decoded = decode_prefill(&param).unwrap();
    store.put("chat-42", decoded).await.unwrap();

    assert_eq!(store.ttl(), Duration::seconds(60));
    assert_eq!(store.peek("chat-42").await.unwrap(), Some(record()));

    clock.advance(Duration::seconds(61));
    assert_eq!(store.take("chat-42").await.unwrap(), None);
}

#[test]
fn test_message_from_allowed_origin() {
    let allow = OriginAllowList::new(vec!["http://localhost:8080".to_string()]);
    let raw = serde_json::to_value(HandoffMessage::entities(record())).unwrap();

    let record = allow
        .receive("http://localhost:8080", &raw)
        .unwrap()
        .into_record()
        .unwrap();
    assert_eq!(record.loan.purpose, Some(LoanPurpose::Startup));
    assert!(allow.receive("http://localhost:3000", &raw).is_err());
}

#[tokio::test]
async fn test_store_is_usable_as_trait_object() {
    let store: Arc<dyn PendingEntityStore> = Arc::new(InMemoryPendingStore::default());
    store.put("s", record()).await.unwrap();
    store.clear("s").await.unwrap();
    assert!(store.peek("s").await.unwrap().is_none());
    assert!(store.put("bad key", record()).await.is_err());
}

//! Cross-context handoff
//!
//! The chat page passes its extraction to the application page either as a
//! message envelope or as a `?prefill=` URL parameter holding base64 JSON.
//! Both carry the same [`EntityRecord`].
//!
//! ```text
//! { "type": "AI_LINKER_ENTITIES", "payload": { ...record... } }
//! { "type": "AI_LINKER_APPLY_READY" }
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use loan_autofill_core::EntityRecord;

use crate::HandoffError;

/// Message exchanged between the chat and application contexts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HandoffMessage {
    /// Extracted entities for the receiver to hydrate
    #[serde(rename = "AI_LINKER_ENTITIES")]
    Entities { payload: EntityRecord },

    /// Receiver is loaded and listening
    #[serde(rename = "AI_LINKER_APPLY_READY")]
    ApplyReady,
}

impl HandoffMessage {
    pub fn entities(record: EntityRecord) -> Self {
        HandoffMessage::Entities { payload: record }
    }

    /// Record carried by the message, if any
    pub fn into_record(self) -> Option<EntityRecord> {
        match self {
            HandoffMessage::Entities { payload } => Some(payload),
            HandoffMessage::ApplyReady => None,
        }
    }
}

/// Origins whose handoff messages are accepted
#[derive(Debug, Clone, Default)]
pub struct OriginAllowList {
    origins: Vec<String>,
}

impl OriginAllowList {
    pub fn new(origins: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            origins: origins
                .into_iter()
                .map(|o| o.into().trim_end_matches('/').to_string())
                .collect(),
        }
    }

    /// Exact origin match; an empty list accepts nothing
    pub fn allows(&self, origin: &str) -> bool {
        let origin = origin.trim_end_matches('/');
        self.origins.iter().any(|o| o == origin)
    }

    /// Parse a message, rejecting it when the sender is not allowed
    pub fn receive(&self, origin: &str, raw: &serde_json::Value) -> Result<HandoffMessage, HandoffError> {
        if !self.allows(origin) {
            tracing::warn!(origin = %origin, "Ignoring handoff message from unlisted origin");
            return Err(HandoffError::OriginNotAllowed(origin.to_string()));
        }
        parse_message(raw)
    }
}

/// Decode a handoff message envelope
pub fn parse_message(raw: &serde_json::Value) -> Result<HandoffMessage, HandoffError> {
    match raw.get("type").and_then(|t| t.as_str()) {
        Some("AI_LINKER_ENTITIES") | Some("AI_LINKER_APPLY_READY") => {
            serde_json::from_value(raw.clone())
                .map_err(|e| HandoffError::InvalidPayload(e.to_string()))
        }
        Some(other) => Err(HandoffError::UnknownMessage(other.to_string())),
        None => Err(HandoffError::UnknownMessage("missing type".to_string())),
    }
}

/// Encode a record as a `prefill` parameter value
pub fn encode_prefill(record: &EntityRecord) -> Result<String, HandoffError> {
    let json = serde_json::to_vec(record).map_err(|e| HandoffError::InvalidPayload(e.to_string()))?;
    Ok(BASE64.encode(json))
}

/// Decode a `prefill` parameter value into a record
pub fn decode_prefill(param: &str) -> Result<EntityRecord, HandoffError> {
    let bytes = BASE64
        .decode(param.trim())
        .map_err(|e| HandoffError::InvalidBase64(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| HandoffError::InvalidPayload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use loan_autofill_core::SOURCE_CHAT;
    use serde_json::json;

    fn record() -> EntityRecord {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let mut record = EntityRecord::empty(SOURCE_CHAT, at);
        record.business.name = Some("한빛상사".into());
        record
    }

    #[test]
    fn test_prefill_round_trip() {
        let encoded = encode_prefill(&record()).unwrap();
        assert_eq!(decode_prefill(&encoded).unwrap(), record());
    }

    #[test]
    fn test_prefill_rejects_garbage() {
        assert!(matches!(decode_prefill("%%%"), Err(HandoffError::InvalidBase64(_))));

        let not_a_record = BASE64.encode(br#"{"hello":"world"}"#);
        assert!(matches!(
            decode_prefill(&not_a_record),
            Err(HandoffError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_message_wire_format() {
        let msg = serde_json::to_value(HandoffMessage::ApplyReady).unwrap();
        assert_eq!(msg, json!({ "type": "AI_LINKER_APPLY_READY" }));

        let msg = serde_json::to_value(HandoffMessage::entities(record())).unwrap();
        assert_eq!(msg["type"], "AI_LINKER_ENTITIES");
        assert_eq!(msg["payload"]["business"]["name"], "한빛상사");
    }

    #[test]
    fn test_parse_entities_message() {
        let raw = serde_json::to_value(HandoffMessage::entities(record())).unwrap();
        let parsed = parse_message(&raw).unwrap();
        assert_eq!(parsed.into_record(), Some(record()));
    }

    #[test]
    fn test_entities_without_payload_is_invalid() {
        let err = parse_message(&json!({ "type": "AI_LINKER_ENTITIES" })).unwrap_err();
        assert!(matches!(err, HandoffError::InvalidPayload(_)));
    }

    #[test]
    fn test_unknown_message_type() {
        let err = parse_message(&json!({ "type": "PING" })).unwrap_err();
        assert!(matches!(err, HandoffError::UnknownMessage(_)));
        assert!(parse_message(&json!({})).is_err());
    }

    #[test]
    fn test_origin_allow_list() {
        let allow = OriginAllowList::new(["https://apply.example.kr/"]);
        assert!(allow.allows("https://apply.example.kr"));
        assert!(!allow.allows("https://evil.example.com"));

        let raw = json!({ "type": "AI_LINKER_APPLY_READY" });
        assert!(allow.receive("https://apply.example.kr", &raw).is_ok());
        assert!(matches!(
            allow.receive("https://evil.example.com", &raw),
            Err(HandoffError::OriginNotAllowed(_))
        ));
    }

    #[test]
    fn test_empty_allow_list_accepts_nothing() {
        let allow = OriginAllowList::default();
        assert!(!allow.allows("http://localhost:8080"));
    }
}

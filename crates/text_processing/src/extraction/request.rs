//! Extraction request payload
//!
//! Three request shapes reach the extractor:
//!
//! ```text
//! { "messages": [{ "role", "content" }, ...] }
//! { "data": { "messages": [...] } }
//! { "query": "..." }
//! ```
//!
//! `messages` wins over `data.messages`, which wins over `query`. A missing or
//! non-array `messages` is an empty transcript, not an error; only a body that
//! is not JSON at all is rejected.

use serde_json::Value;

use loan_autofill_core::{Error, Message, Result, TurnRole};

/// Parsed transcript submitted for extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub messages: Vec<Message>,
}

impl ExtractionRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Parse a raw request body
    ///
    /// An empty body is treated as `{}`.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_slice(body)
            .map_err(|e| Error::MalformedRequest(e.to_string()))?;
        Ok(Self::from_value(&value))
    }

    /// Build from an already-decoded JSON value
    pub fn from_value(value: &Value) -> Self {
        let messages = value
            .get("messages")
            .and_then(Value::as_array)
            .or_else(|| {
                value
                    .get("data")
                    .and_then(|d| d.get("messages"))
                    .and_then(Value::as_array)
            });

        if let Some(items) = messages {
            return Self::new(items.iter().map(message_from_value).collect());
        }

        match value.get("query").and_then(Value::as_str) {
            Some(query) if !query.trim().is_empty() => Self::new(vec![Message::user(query)]),
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn message_from_value(value: &Value) -> Message {
    let role = value
        .get("role")
        .and_then(Value::as_str)
        .map(TurnRole::parse)
        .unwrap_or_default();
    let content = value
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Message::new(role, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_shape() {
        let request = ExtractionRequest::from_slice(
            r#"{"messages":[{"role":"assistant","content":"상호명을 알려주세요"},{"role":"user","content":"상호명: 한빛상사"}]}"#
                .as_bytes(),
        )
        .unwrap();
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, TurnRole::Assistant);
        assert_eq!(request.messages[1].content, "상호명: 한빛상사");
    }

    #[test]
    fn test_data_messages_shape() {
        let request = ExtractionRequest::from_slice(
            br#"{"data":{"messages":[{"role":"user","content":"010-1234-5678"}]}}"#,
        )
        .unwrap();
        assert_eq!(request.messages, vec![Message::user("010-1234-5678")]);
    }

    #[test]
    fn test_query_shape() {
        let body = r#"{"user_id":"u1","query":"운전자금 5천만원"}"#;
        let request = ExtractionRequest::from_slice(body.as_bytes()).unwrap();
        assert_eq!(request.messages, vec![Message::user("운전자금 5천만원")]);
    }

    #[test]
    fn test_messages_win_over_query() {
        let request = ExtractionRequest::from_slice(
            br#"{"messages":[{"content":"a"}],"query":"b"}"#,
        )
        .unwrap();
        assert_eq!(request.messages, vec![Message::user("a")]);
    }

    #[test]
    fn test_missing_or_non_array_messages_is_empty() {
        assert!(ExtractionRequest::from_slice(b"{}").unwrap().is_empty());
        assert!(ExtractionRequest::from_slice(br#"{"messages":"hello"}"#)
            .unwrap()
            .is_empty());
        assert!(ExtractionRequest::from_slice(b"[1,2,3]").unwrap().is_empty());
        assert!(ExtractionRequest::from_slice(b"").unwrap().is_empty());
    }

    #[test]
    fn test_lenient_message_fields() {
        let request = ExtractionRequest::from_slice(
            br#"{"messages":[{"content":42},{"role":"tool","content":"x"},null]}"#,
        )
        .unwrap();
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0], Message::user(""));
        assert_eq!(request.messages[1].role, TurnRole::Other);
        assert_eq!(request.messages[2], Message::user(""));
    }

    #[test]
    fn test_unparseable_body_is_malformed() {
        let err = ExtractionRequest::from_slice(b"{not json").unwrap_err();
        assert!(matches!(err, Error::MalformedRequest(_)));
        assert!(err.is_client_error());
    }
}

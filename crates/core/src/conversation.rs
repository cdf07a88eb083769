//! Chat transcript types

use serde::{Deserialize, Serialize};

/// Who sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// End user filling in the application
    #[default]
    User,
    /// Chatbot reply
    Assistant,
    /// System instructions
    System,
    /// Any role the chat UI invents (tool output, logs)
    #[serde(other)]
    Other,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
            TurnRole::System => "system",
            TurnRole::Other => "other",
        }
    }

    /// Lenient parse used for transcript payloads; unknown roles map to `Other`
    pub fn parse(role: &str) -> Self {
        match role.trim().to_ascii_lowercase().as_str() {
            "user" => TurnRole::User,
            "assistant" => TurnRole::Assistant,
            "system" => TurnRole::System,
            _ => TurnRole::Other,
        }
    }
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One chat message of a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub role: TurnRole,
    /// Message text; absent content is carried as an empty string
    #[serde(default)]
    pub content: String,
}

impl Message {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }
}

/// Join every message's content with newlines into one text blob
pub fn transcript_text(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_lenient() {
        assert_eq!(TurnRole::parse("User"), TurnRole::User);
        assert_eq!(TurnRole::parse("assistant"), TurnRole::Assistant);
        assert_eq!(TurnRole::parse("tool"), TurnRole::Other);
    }

    #[test]
    fn test_transcript_text_joins_with_newlines() {
        let messages = vec![
            Message::user("안녕하세요"),
            Message::assistant(""),
            Message::user("상호명: 한빛상사"),
        ];
        assert_eq!(transcript_text(&messages), "안녕하세요\n\n상호명: 한빛상사");
    }

    #[test]
    fn test_message_deserialize_defaults() {
        let msg: Message = serde_json::from_str(r#"{"content":"hi"}"#).unwrap();
        assert_eq!(msg.role, TurnRole::User);

        let msg: Message = serde_json::from_str(r#"{"role":"tool"}"#).unwrap();
        assert_eq!(msg.role, TurnRole::Other);
        assert_eq!(msg.content, "");
    }
}

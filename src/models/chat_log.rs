use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{as_object, required_text, sanitize_string, timestamp};

pub const TABLE: &str = "chat_logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Rag,
    Chatbot,
}

impl MessageType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "rag" => Some(Self::Rag),
            "chatbot" => Some(Self::Chatbot),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rag => "rag",
            Self::Chatbot => "chatbot",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChatLog {
    pub session_id: String,
    pub message: String,
    pub response: String,
    pub message_type: MessageType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatLog {
    pub session_id: String,
    pub message: String,
    pub response: String,
    pub message_type: MessageType,
    pub created_at: String,
}

impl NewChatLog {
    pub fn validate(input: &Value) -> Result<Self, Vec<String>> {
        let obj = as_object(input)?;
        let mut errors = Vec::new();

        let session_id = required_text(
            obj,
            "session_id",
            "Session ID is required and must be a non-empty string",
            &mut errors,
        );
        let message = required_text(obj, "message", "Message is required and must be a non-empty string", &mut errors);
        let response =
            required_text(obj, "response", "Response is required and must be a non-empty string", &mut errors);

        let message_type = obj.get("message_type").and_then(Value::as_str).and_then(MessageType::parse);
        if message_type.is_none() {
            errors.push("Message type must be either \"rag\" or \"chatbot\"".to_string());
        }

        match message_type {
            Some(message_type) if errors.is_empty() => Ok(Self {
                session_id,
                message,
                response,
                message_type,
            }),
            _ => Err(errors),
        }
    }

    pub fn sanitize(self) -> Self {
        Self {
            session_id: sanitize_string(&self.session_id),
            message: sanitize_string(&self.message),
            response: sanitize_string(&self.response),
            message_type: self.message_type,
        }
    }

    pub fn into_record(self, now: DateTime<Utc>) -> ChatLog {
        ChatLog {
            session_id: self.session_id,
            message: self.message,
            response: self.response,
            message_type: self.message_type,
            created_at: timestamp(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_both_message_types() {
        for kind in ["rag", "chatbot"] {
            let log = NewChatLog::validate(&json!({
                "session_id": "session-123",
                "message": "What services do you offer?",
                "response": "We offer AI consulting",
                "message_type": kind,
            }))
            .unwrap();
            assert_eq!(log.message_type.as_str(), kind);
        }
    }

    #[test]
    fn rejects_unknown_message_type() {
        let errors = NewChatLog::validate(&json!({
            "session_id": "s",
            "message": "m",
            "response": "r",
            "message_type": "RAG",
        }))
        .unwrap_err();
        assert_eq!(errors, vec!["Message type must be either \"rag\" or \"chatbot\"".to_string()]);
    }

    #[test]
    fn reports_every_missing_field() {
        let errors = NewChatLog::validate(&json!({})).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0], "Session ID is required and must be a non-empty string");
    }

    #[test]
    fn record_serializes_message_type_lowercase() {
        let log = NewChatLog {
            session_id: "s".into(),
            message: "m".into(),
            response: "r".into(),
            message_type: MessageType::Rag,
        };
        let value = serde_json::to_value(log.into_record(Utc::now())).unwrap();
        assert_eq!(value["message_type"], "rag");
        assert!(value["created_at"].is_string());
    }
}

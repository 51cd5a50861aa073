//! Handler outcomes: successful content or a structured failure

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Failure category carried back to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    InvalidParams,
    InternalError,
    NotFound,
}

impl FailureKind {
    /// JSON-RPC error code used on the wire
    pub fn code(&self) -> i64 {
        match self {
            FailureKind::InvalidParams => -32602,
            FailureKind::InternalError => -32603,
            FailureKind::NotFound => -32001,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::InvalidParams => "InvalidParams",
            FailureKind::InternalError => "InternalError",
            FailureKind::NotFound => "NotFound",
        };
        f.write_str(name)
    }
}

/// Structured failure returned by validation or by a handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidParams, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InternalError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FailureKind::NotFound, message)
    }
}

/// Role attached to a prompt message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub text: String,
}

impl PromptMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }
}

/// Successful handler content
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    Structured(Value),
    Messages(Vec<PromptMessage>),
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text(text.into())
    }

    /// Render as plain text; structured payloads are pretty-printed JSON
    pub fn to_text(&self) -> String {
        match self {
            Content::Text(text) => text.clone(),
            Content::Structured(value) => serde_json::to_string_pretty(value).unwrap_or_default(),
            Content::Messages(messages) => messages
                .iter()
                .map(|m| m.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }
}

pub type HandlerOutcome = std::result::Result<Content, Failure>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_kind_codes() {
        assert_eq!(FailureKind::InvalidParams.code(), -32602);
        assert_eq!(FailureKind::InternalError.code(), -32603);
        assert_eq!(FailureKind::NotFound.code(), -32001);
    }

    #[test]
    fn test_failure_serializes_kind_by_name() {
        let failure = Failure::not_found("unknown capability: foo");
        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(
            value,
            json!({"kind": "NotFound", "message": "unknown capability: foo"})
        );
    }

    #[test]
    fn test_structured_content_as_text() {
        let content = Content::Structured(json!({"os": "linux"}));
        assert_eq!(content.to_text(), "{\n  \"os\": \"linux\"\n}");
    }
}

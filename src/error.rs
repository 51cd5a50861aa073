//! Error types for Toolhost

use thiserror::Error;

use crate::registry::Namespace;

/// Result type alias for Toolhost operations
pub type Result<T> = std::result::Result<T, ToolhostError>;

/// Main error type for Toolhost
#[derive(Error, Debug)]
pub enum ToolhostError {
    #[error("Duplicate {namespace} name: {name}")]
    DuplicateName { namespace: Namespace, name: String },

    #[error("unknown capability: {0}")]
    NotFound(String),

    #[error("Invalid descriptor for '{name}': {reason}")]
    InvalidDescriptor { name: String, reason: String },

    #[error("Invalid URI template '{template}': {reason}")]
    InvalidUriTemplate { template: String, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ToolhostError {
    /// Whether the error ends the transport loop
    pub fn is_fatal(&self) -> bool {
        matches!(self, ToolhostError::Io(_))
    }

    /// Get error code for MCP protocol
    pub fn code(&self) -> i64 {
        match self {
            ToolhostError::NotFound(_) => -32001,
            ToolhostError::InvalidRequest(_) => -32600,
            ToolhostError::Serialization(_) => -32700,
            _ => -32603,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_matches_wire_text() {
        let err = ToolhostError::NotFound("foo".to_string());
        assert_eq!(err.to_string(), "unknown capability: foo");
        assert_eq!(err.code(), -32001);
    }

    #[test]
    fn test_only_io_is_fatal() {
        let io = ToolhostError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "closed",
        ));
        assert!(io.is_fatal());
        assert!(!ToolhostError::Config("x".into()).is_fatal());
    }

    #[test]
    fn test_duplicate_name_display() {
        let err = ToolhostError::DuplicateName {
            namespace: Namespace::Tools,
            name: "echo".into(),
        };
        assert_eq!(err.to_string(), "Duplicate tool name: echo");
    }
}

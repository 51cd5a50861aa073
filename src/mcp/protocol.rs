//! MCP JSON-RPC protocol types

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::DEFAULT_SERVER_NAME;
use crate::error::{Result, ToolhostError};
use crate::registry::{CapabilityDescriptor, Content, Failure, PromptMessage, Role};

/// MCP JSON-RPC request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpRequest {
    pub jsonrpc: String,
    /// `None` only when the member is absent; `"id": null` is `Some(Value::Null)`
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl McpRequest {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: None,
            method: method.into(),
            params: Value::Null,
        }
    }

    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    /// Requests without an id are notifications and get no response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Interpret an already-parsed JSON frame as a request
    pub fn from_value(value: Value) -> Result<Self> {
        let request: McpRequest = serde_json::from_value(value)
            .map_err(|e| ToolhostError::InvalidRequest(e.to_string()))?;
        if request.jsonrpc != "2.0" {
            return Err(ToolhostError::InvalidRequest(format!(
                "unsupported jsonrpc version '{}'",
                request.jsonrpc
            )));
        }
        Ok(request)
    }
}

fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// MCP JSON-RPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

/// MCP error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl McpResponse {
    /// Create a success response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Option<Value>, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(McpError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Create error from ToolhostError
    pub fn from_error(id: Option<Value>, err: ToolhostError) -> Self {
        Self::error(id, err.code(), err.to_string())
    }

    /// Error response carrying a handler or validation failure as `{kind, message}`
    pub fn failure(id: Option<Value>, failure: &Failure) -> Self {
        let mut response = Self::error(id, failure.kind.code(), failure.message.clone());
        if let Some(error) = response.error.as_mut() {
            error.data = Some(json!({
                "kind": failure.kind,
                "message": failure.message,
            }));
        }
        response
    }
}

/// Standard JSON-RPC error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const NOT_FOUND: i64 = -32001;
}

/// Standard MCP methods
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const INITIALIZED: &str = "notifications/initialized";
    pub const PING: &str = "ping";
    pub const LIST_TOOLS: &str = "tools/list";
    pub const CALL_TOOL: &str = "tools/call";
    pub const LIST_RESOURCES: &str = "resources/list";
    pub const LIST_RESOURCE_TEMPLATES: &str = "resources/templates/list";
    pub const READ_RESOURCE: &str = "resources/read";
    pub const LIST_PROMPTS: &str = "prompts/list";
    pub const GET_PROMPT: &str = "prompts/get";
}

/// MCP tool definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl From<&CapabilityDescriptor> for ToolDefinition {
    fn from(descriptor: &CapabilityDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            input_schema: descriptor.input_schema(),
        }
    }
}

/// MCP resource template definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceTemplateDefinition {
    #[serde(rename = "uriTemplate")]
    pub uri_template: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl From<&CapabilityDescriptor> for ResourceTemplateDefinition {
    fn from(descriptor: &CapabilityDescriptor) -> Self {
        Self {
            uri_template: descriptor
                .uri_template
                .as_ref()
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            mime_type: descriptor.mime_type.clone(),
        }
    }
}

/// MCP prompt definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    pub name: String,
    pub description: String,
    pub arguments: Vec<PromptArgument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptArgument {
    pub name: String,
    pub description: String,
    pub required: bool,
}

impl From<&CapabilityDescriptor> for PromptDefinition {
    fn from(descriptor: &CapabilityDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            arguments: descriptor
                .parameters
                .iter()
                .map(|p| PromptArgument {
                    name: p.name.clone(),
                    description: p.description.clone(),
                    required: p.required,
                })
                .collect(),
        }
    }
}

/// MCP initialize result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

/// Server capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub tools: Option<ToolsCapability>,
    pub resources: Option<ResourcesCapability>,
    pub prompts: Option<PromptsCapability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsCapability {
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesCapability {
    pub subscribe: bool,
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptsCapability {
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

/// Server info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl InitializeResult {
    pub fn for_server(name: impl Into<String>) -> Self {
        Self {
            protocol_version: "2024-11-05".to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
                resources: Some(ResourcesCapability {
                    subscribe: false,
                    list_changed: false,
                }),
                prompts: Some(PromptsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: name.into(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

impl Default for InitializeResult {
    fn default() -> Self {
        Self::for_server(DEFAULT_SERVER_NAME)
    }
}

/// Tool call result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolContent {
    pub fn text(text: impl Into<String>) -> Self {
        ToolContent::Text { text: text.into() }
    }
}

impl ToolCallResult {
    /// Create a text result
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            structured_content: None,
        }
    }

    /// Create a structured result, mirrored as pretty JSON text
    pub fn structured(value: Value) -> Self {
        let text = serde_json::to_string_pretty(&value).unwrap_or_default();
        Self {
            content: vec![ToolContent::text(text)],
            structured_content: Some(value),
        }
    }
}

impl From<Content> for ToolCallResult {
    fn from(content: Content) -> Self {
        match content {
            Content::Structured(value) => Self::structured(value),
            other => Self::text(other.to_text()),
        }
    }
}

/// Contents of one resource read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceContent {
    pub uri: String,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContent>,
}

impl ReadResourceResult {
    pub fn from_content(uri: &str, mime_type: Option<String>, content: Content) -> Self {
        let mime_type = match &content {
            Content::Structured(_) => Some("application/json".to_string()),
            _ => mime_type,
        };
        Self {
            contents: vec![ResourceContent {
                uri: uri.to_string(),
                mime_type,
                text: content.to_text(),
            }],
        }
    }
}

/// Prompt message as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WirePromptMessage {
    pub role: Role,
    pub content: ToolContent,
}

impl From<PromptMessage> for WirePromptMessage {
    fn from(message: PromptMessage) -> Self {
        Self {
            role: message.role,
            content: ToolContent::text(message.text),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPromptResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub messages: Vec<WirePromptMessage>,
}

impl GetPromptResult {
    pub fn from_content(description: Option<String>, content: Content) -> Self {
        let messages = match content {
            Content::Messages(messages) => messages,
            other => vec![PromptMessage::user(other.to_text())],
        };
        Self {
            description,
            messages: messages.into_iter().map(WirePromptMessage::from).collect(),
        }
    }
}

//! Maps MCP methods onto the dispatcher

use serde_json::{json, Value};

use super::protocol::{
    error_codes, methods, GetPromptResult, InitializeResult, McpRequest, McpResponse,
    PromptDefinition, ReadResourceResult, ResourceTemplateDefinition, ToolCallResult,
    ToolDefinition,
};
use crate::config::ServerConfig;
use crate::registry::{CapabilityDescriptor, Dispatcher, Failure, IncomingCall, Namespace};

/// Trait for handling MCP requests
pub trait McpHandler: Send + Sync {
    fn handle_request(&self, request: McpRequest) -> McpResponse;
}

/// MCP request handler backed by the capability registry
pub struct ToolhostHandler {
    dispatcher: Dispatcher,
    config: ServerConfig,
}

impl ToolhostHandler {
    pub fn new(dispatcher: Dispatcher, config: ServerConfig) -> Self {
        Self { dispatcher, config }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    fn list<T, F>(&self, namespace: Namespace, convert: F) -> Vec<T>
    where
        F: Fn(&CapabilityDescriptor) -> T,
    {
        self.dispatcher
            .registry()
            .descriptors(namespace)
            .map(convert)
            .collect()
    }

    /// Build a call from `{name, arguments}` params
    fn incoming_call(namespace: Namespace, params: &Value) -> Result<IncomingCall, Failure> {
        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Failure::invalid_params("name is required"))?;
        IncomingCall::from_value(namespace, name, params.get("arguments"))
    }

    fn call_tool(&self, params: &Value) -> Result<Value, Failure> {
        let call = Self::incoming_call(Namespace::Tools, params)?;
        let content = self.dispatcher.dispatch(&call)?;
        Ok(json!(ToolCallResult::from(content)))
    }

    fn read_resource(&self, params: &Value) -> Result<Value, Failure> {
        let uri = params
            .get("uri")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Failure::invalid_params("uri is required"))?;
        let content = self.dispatcher.read_resource(uri)?;
        let mime_type = self
            .dispatcher
            .registry()
            .resolve_uri(uri)
            .and_then(|(entry, _)| entry.descriptor.mime_type.clone());
        Ok(json!(ReadResourceResult::from_content(uri, mime_type, content)))
    }

    fn get_prompt(&self, params: &Value) -> Result<Value, Failure> {
        let call = Self::incoming_call(Namespace::Prompts, params)?;
        let content = self.dispatcher.dispatch(&call)?;
        let description = self
            .dispatcher
            .registry()
            .lookup(Namespace::Prompts, &call.name)
            .ok()
            .map(|entry| entry.descriptor.description.clone());
        Ok(json!(GetPromptResult::from_content(description, content)))
    }
}

impl McpHandler for ToolhostHandler {
    fn handle_request(&self, request: McpRequest) -> McpResponse {
        let id = request.id;
        let outcome = match request.method.as_str() {
            methods::INITIALIZE => Ok(json!(InitializeResult::for_server(
                self.config.server_name.clone()
            ))),
            // Notification and liveness check, nothing to report
            methods::INITIALIZED | methods::PING => Ok(json!({})),
            methods::LIST_TOOLS => {
                let tools = self.list(Namespace::Tools, |d| ToolDefinition::from(d));
                Ok(json!({ "tools": tools }))
            }
            methods::CALL_TOOL => self.call_tool(&request.params),
            methods::LIST_RESOURCES => Ok(json!({ "resources": [] })),
            methods::LIST_RESOURCE_TEMPLATES => {
                let templates = self.list(Namespace::ResourceTemplates, |d| {
                    ResourceTemplateDefinition::from(d)
                });
                Ok(json!({ "resourceTemplates": templates }))
            }
            methods::READ_RESOURCE => self.read_resource(&request.params),
            methods::LIST_PROMPTS => {
                let prompts = self.list(Namespace::Prompts, |d| PromptDefinition::from(d));
                Ok(json!({ "prompts": prompts }))
            }
            methods::GET_PROMPT => self.get_prompt(&request.params),
            other => {
                return McpResponse::error(
                    id,
                    error_codes::METHOD_NOT_FOUND,
                    format!("Method not found: {}", other),
                );
            }
        };

        match outcome {
            Ok(result) => McpResponse::success(id, result),
            Err(failure) => McpResponse::failure(id, &failure),
        }
    }
}

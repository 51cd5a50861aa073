//! MCP (Model Context Protocol) server implementation
//!
//! JSON-RPC over stdio for AI tool integration.

pub mod handler;
pub mod protocol;
pub mod transport;

pub use handler::{McpHandler, ToolhostHandler};
pub use protocol::{
    error_codes, methods, InitializeResult, McpError, McpRequest, McpResponse, ToolCallResult,
};
pub use transport::{LoopState, McpServer};

//! Toolhost - local MCP tool server
//!
//! Registers a fixed catalog of tools, resource templates and prompts at
//! startup and serves them to an MCP client over stdio.

pub mod catalog;
pub mod config;
pub mod error;
pub mod mcp;
pub mod prompts;
pub mod registry;
pub mod resources;
pub mod tools;

pub use catalog::build_registry;
pub use config::ServerConfig;
pub use error::{Result, ToolhostError};
pub use registry::{Dispatcher, Registry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

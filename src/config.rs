//! Server configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolhostError};

pub const DEFAULT_SERVER_NAME: &str = "Toolhost MCP Server";

/// Upper bound applied to `execute_command` timeouts, in seconds
pub const DEFAULT_MAX_COMMAND_TIMEOUT_SECS: f64 = 300.0;

#[cfg(windows)]
pub const DEFAULT_SHELL: &str = "cmd";
#[cfg(not(windows))]
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Runtime settings shared by the catalog and the protocol handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Name reported in `initialize` and in greetings
    pub server_name: String,
    /// Shell used by `execute_command`
    pub shell: String,
    pub max_command_timeout_secs: f64,
    /// Whether `execute_command` is registered at all
    pub enable_exec: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_name: DEFAULT_SERVER_NAME.to_string(),
            shell: DEFAULT_SHELL.to_string(),
            max_command_timeout_secs: DEFAULT_MAX_COMMAND_TIMEOUT_SECS,
            enable_exec: true,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.server_name.trim().is_empty() {
            return Err(ToolhostError::Config("server name must not be empty".into()));
        }
        if self.shell.trim().is_empty() {
            return Err(ToolhostError::Config("shell must not be empty".into()));
        }
        self.max_command_timeout()?;
        Ok(())
    }

    /// The command timeout ceiling as a `Duration`
    pub fn max_command_timeout(&self) -> Result<Duration> {
        let secs = self.max_command_timeout_secs;
        if !secs.is_finite() || secs <= 0.0 {
            return Err(ToolhostError::Config(format!(
                "max command timeout must be a positive number of seconds, got {}",
                secs
            )));
        }
        Duration::try_from_secs_f64(secs).map_err(|_| {
            ToolhostError::Config(format!("max command timeout is too large: {}", secs))
        })
    }
}

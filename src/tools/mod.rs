//! Built-in tools
//!
//! Each tool is a descriptor plus a handler over [`ValidatedArgs`](crate::registry::ValidatedArgs).

pub mod calculator;
pub mod command;
pub mod json;
pub mod system;
pub mod text;

use crate::config::ServerConfig;
use crate::error::Result;
use crate::registry::{Namespace, Registry};

pub use command::CommandRunner;

/// Register every built-in tool, in listing order
pub fn register_tools(registry: &mut Registry, config: &ServerConfig) -> Result<()> {
    registry.register(Namespace::Tools, text::echo_descriptor(), text::echo)?;
    registry.register(Namespace::Tools, calculator::descriptor(), calculator::handle)?;
    registry.register(
        Namespace::Tools,
        system::system_info_descriptor(),
        system::system_info,
    )?;
    registry.register(Namespace::Tools, system::get_time_descriptor(), system::get_time)?;

    if config.enable_exec {
        let runner = CommandRunner::from_config(config)?;
        registry.register(Namespace::Tools, command::descriptor(), move |args| {
            runner.handle(args)
        })?;
    } else {
        tracing::info!("execute_command disabled by configuration");
    }

    registry.register(Namespace::Tools, json::descriptor(), json::handle)?;
    registry.register(
        Namespace::Tools,
        text::string_operations_descriptor(),
        text::string_operations,
    )?;
    Ok(())
}

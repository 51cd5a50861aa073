//! Assembles the built-in registry at startup

use crate::config::ServerConfig;
use crate::error::Result;
use crate::prompts::register_prompts;
use crate::registry::{Namespace, Registry};
use crate::resources::register_resources;
use crate::tools::register_tools;

/// Build the registry of every built-in tool, resource template and prompt
pub fn build_registry(config: &ServerConfig) -> Result<Registry> {
    config.validate()?;

    let mut registry = Registry::new();
    register_tools(&mut registry, config)?;
    register_resources(&mut registry, config)?;
    register_prompts(&mut registry)?;

    tracing::info!(
        "Registered {} tools, {} resource templates, {} prompts",
        registry.len(Namespace::Tools),
        registry.len(Namespace::ResourceTemplates),
        registry.len(Namespace::Prompts)
    );
    Ok(registry)
}

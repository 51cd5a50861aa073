//! Built-in resource templates

use crate::config::ServerConfig;
use crate::error::Result;
use crate::registry::{CapabilityDescriptor, Content, Namespace, Registry};

pub const GREETING_TEMPLATE: &str = "greeting://{name}";

pub fn greeting(server_name: &str, name: &str) -> String {
    format!("Hello, {}! Welcome to the {}.", name, server_name)
}

pub fn register_resources(registry: &mut Registry, config: &ServerConfig) -> Result<()> {
    let server_name = config.server_name.clone();
    registry.register(
        Namespace::ResourceTemplates,
        CapabilityDescriptor::resource_template(
            "getGreeting",
            "Get a personalized greeting",
            GREETING_TEMPLATE,
        )?,
        move |args| Ok(Content::text(greeting(&server_name, args.str("name")?))),
    )
}

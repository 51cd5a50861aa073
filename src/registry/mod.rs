//! Capability registry and dispatch
//!
//! Capabilities live in three independent namespaces (tools, resource
//! templates, prompts). The [`Registry`] is filled once at startup and is
//! read-only afterwards; the [`Dispatcher`] owns it while serving.

pub mod descriptor;
pub mod dispatch;
pub mod outcome;
pub mod uri;
pub mod validate;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ToolhostError};

pub use descriptor::{ArgValue, CapabilityDescriptor, ParamKind, ParameterSpec};
pub use dispatch::{Dispatcher, IncomingCall};
pub use outcome::{Content, Failure, FailureKind, HandlerOutcome, PromptMessage, Role};
pub use uri::UriTemplate;
pub use validate::{validate_arguments, ValidatedArgs};

/// Capability category; names only need to be unique within one namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    Tools,
    ResourceTemplates,
    Prompts,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Namespace::Tools => "tool",
            Namespace::ResourceTemplates => "resource template",
            Namespace::Prompts => "prompt",
        };
        f.write_str(label)
    }
}

/// Handler invoked with arguments that already passed validation
pub type Handler = Arc<dyn Fn(&ValidatedArgs) -> HandlerOutcome + Send + Sync>;

/// A registered capability
#[derive(Clone)]
pub struct RegistryEntry {
    pub descriptor: CapabilityDescriptor,
    pub handler: Handler,
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct Table {
    entries: Vec<RegistryEntry>,
    index: HashMap<String, usize>,
}

/// Name → (descriptor, handler) mapping for all three namespaces
#[derive(Debug, Default)]
pub struct Registry {
    tools: Table,
    resource_templates: Table,
    prompts: Table,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, namespace: Namespace) -> &Table {
        match namespace {
            Namespace::Tools => &self.tools,
            Namespace::ResourceTemplates => &self.resource_templates,
            Namespace::Prompts => &self.prompts,
        }
    }

    fn table_mut(&mut self, namespace: Namespace) -> &mut Table {
        match namespace {
            Namespace::Tools => &mut self.tools,
            Namespace::ResourceTemplates => &mut self.resource_templates,
            Namespace::Prompts => &mut self.prompts,
        }
    }

    /// Register a capability with a closure handler
    pub fn register<F>(
        &mut self,
        namespace: Namespace,
        descriptor: CapabilityDescriptor,
        handler: F,
    ) -> Result<()>
    where
        F: Fn(&ValidatedArgs) -> HandlerOutcome + Send + Sync + 'static,
    {
        self.register_handler(namespace, descriptor, Arc::new(handler))
    }

    /// Register a capability with a shared handler
    pub fn register_handler(
        &mut self,
        namespace: Namespace,
        descriptor: CapabilityDescriptor,
        handler: Handler,
    ) -> Result<()> {
        descriptor.validate()?;

        let has_template = descriptor.uri_template.is_some();
        if (namespace == Namespace::ResourceTemplates) != has_template {
            return Err(ToolhostError::InvalidDescriptor {
                name: descriptor.name.clone(),
                reason: "only resource templates carry a URI template".to_string(),
            });
        }

        let table = self.table_mut(namespace);
        if table.index.contains_key(&descriptor.name) {
            return Err(ToolhostError::DuplicateName {
                namespace,
                name: descriptor.name,
            });
        }

        tracing::debug!("Registered {} '{}'", namespace, descriptor.name);
        table
            .index
            .insert(descriptor.name.clone(), table.entries.len());
        table.entries.push(RegistryEntry {
            descriptor,
            handler,
        });
        Ok(())
    }

    pub fn lookup(&self, namespace: Namespace, name: &str) -> Result<&RegistryEntry> {
        let table = self.table(namespace);
        table
            .index
            .get(name)
            .and_then(|&i| table.entries.get(i))
            .ok_or_else(|| ToolhostError::NotFound(name.to_string()))
    }

    /// Entries of one namespace, in registration order
    pub fn entries(&self, namespace: Namespace) -> &[RegistryEntry] {
        &self.table(namespace).entries
    }

    pub fn descriptors(&self, namespace: Namespace) -> impl Iterator<Item = &CapabilityDescriptor> {
        self.entries(namespace).iter().map(|e| &e.descriptor)
    }

    pub fn len(&self, namespace: Namespace) -> usize {
        self.table(namespace).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.entries.is_empty()
            && self.resource_templates.entries.is_empty()
            && self.prompts.entries.is_empty()
    }

    /// Find the first resource template matching `uri`, with its placeholder values
    pub fn resolve_uri(&self, uri: &str) -> Option<(&RegistryEntry, Map<String, Value>)> {
        self.resource_templates.entries.iter().find_map(|entry| {
            entry
                .descriptor
                .uri_template
                .as_ref()
                .and_then(|t| t.match_uri(uri))
                .map(|args| (entry, args))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo_descriptor() -> CapabilityDescriptor {
        CapabilityDescriptor::new("echo", "Echo back the input text")
            .param(ParameterSpec::string("text", "The text to echo back").required())
    }

    fn echo(args: &ValidatedArgs) -> HandlerOutcome {
        Ok(Content::text(format!("Echo: {}", args.str("text")?)))
    }

    #[test]
    fn test_lookup_returns_registered_pair() {
        let mut registry = Registry::new();
        let handler: Handler = Arc::new(echo);
        registry
            .register_handler(Namespace::Tools, echo_descriptor(), handler.clone())
            .unwrap();

        let entry = registry.lookup(Namespace::Tools, "echo").unwrap();
        assert_eq!(entry.descriptor.name, "echo");
        assert_eq!(entry.descriptor.parameters, echo_descriptor().parameters);
        assert!(Arc::ptr_eq(&entry.handler, &handler));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = Registry::new();
        registry
            .register(Namespace::Tools, echo_descriptor(), echo)
            .unwrap();
        let err = registry
            .register(Namespace::Tools, echo_descriptor(), echo)
            .unwrap_err();
        assert!(matches!(err, ToolhostError::DuplicateName { .. }));
        assert_eq!(registry.len(Namespace::Tools), 1);
    }

    #[test]
    fn test_namespaces_are_independent() {
        let mut registry = Registry::new();
        registry
            .register(Namespace::Tools, echo_descriptor(), echo)
            .unwrap();
        registry
            .register(Namespace::Prompts, echo_descriptor(), echo)
            .unwrap();
        assert!(registry.lookup(Namespace::Prompts, "echo").is_ok());
        assert!(registry.lookup(Namespace::ResourceTemplates, "echo").is_err());
    }

    #[test]
    fn test_unknown_name_not_found() {
        let registry = Registry::new();
        let err = registry.lookup(Namespace::Tools, "foo").unwrap_err();
        assert_eq!(err.to_string(), "unknown capability: foo");
    }

    #[test]
    fn test_invalid_descriptor_not_registered() {
        let mut registry = Registry::new();
        let descriptor = CapabilityDescriptor::new("bad", "")
            .param(ParameterSpec::string("x", "").required().with_default("y"));
        assert!(registry.register(Namespace::Tools, descriptor, echo).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_template_only_in_resource_namespace() {
        let mut registry = Registry::new();
        let template =
            CapabilityDescriptor::resource_template("greeting", "", "greeting://{name}").unwrap();
        assert!(registry
            .register(Namespace::Tools, template.clone(), echo)
            .is_err());
        assert!(registry
            .register(Namespace::ResourceTemplates, echo_descriptor(), echo)
            .is_err());
        assert!(registry
            .register(Namespace::ResourceTemplates, template, echo)
            .is_ok());
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut registry = Registry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry
                .register(Namespace::Tools, CapabilityDescriptor::new(name, ""), |_| {
                    Ok(Content::text(""))
                })
                .unwrap();
        }
        let names: Vec<_> = registry
            .descriptors(Namespace::Tools)
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_resolve_uri() {
        let mut registry = Registry::new();
        let template =
            CapabilityDescriptor::resource_template("greeting", "", "greeting://{name}").unwrap();
        registry
            .register(Namespace::ResourceTemplates, template, |_| Ok(Content::text("")))
            .unwrap();

        let (entry, args) = registry.resolve_uri("greeting://Ada").unwrap();
        assert_eq!(entry.descriptor.name, "greeting");
        assert_eq!(args["name"], "Ada");
        assert!(registry.resolve_uri("other://Ada").is_none());
    }
}

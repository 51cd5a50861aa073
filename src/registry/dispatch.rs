//! Dispatcher: lookup, validation and guarded handler invocation

use std::panic::{self, AssertUnwindSafe};

use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use super::outcome::{Failure, HandlerOutcome};
use super::validate::validate_arguments;
use super::{Namespace, Registry, RegistryEntry};

/// One call arriving from the wire
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingCall {
    pub namespace: Namespace,
    pub name: String,
    pub arguments: Map<String, Value>,
}

impl IncomingCall {
    pub fn new(namespace: Namespace, name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            namespace,
            name: name.into(),
            arguments,
        }
    }

    /// Build a call from an untyped `arguments` value; absent or null means no arguments
    pub fn from_value(
        namespace: Namespace,
        name: impl Into<String>,
        arguments: Option<&Value>,
    ) -> Result<Self, Failure> {
        let arguments = match arguments {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => return Err(Failure::invalid_params("arguments must be an object")),
        };
        Ok(Self::new(namespace, name, arguments))
    }
}

/// Routes calls to handlers without ever passing unvalidated input
#[derive(Debug)]
pub struct Dispatcher {
    registry: Registry,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn dispatch(&self, call: &IncomingCall) -> HandlerOutcome {
        debug!("Dispatching {} '{}'", call.namespace, call.name);
        let entry = self
            .registry
            .lookup(call.namespace, &call.name)
            .map_err(|e| Failure::not_found(e.to_string()))?;
        invoke(entry, &call.arguments)
    }

    /// Resolve a concrete resource URI against the registered templates
    pub fn read_resource(&self, uri: &str) -> HandlerOutcome {
        debug!("Reading resource '{}'", uri);
        let (entry, arguments) = self
            .registry
            .resolve_uri(uri)
            .ok_or_else(|| Failure::not_found(format!("unknown capability: {}", uri)))?;
        invoke(entry, &arguments)
    }
}

fn invoke(entry: &RegistryEntry, raw: &Map<String, Value>) -> HandlerOutcome {
    let name = &entry.descriptor.name;
    let args = validate_arguments(&entry.descriptor, raw).map_err(|failure| {
        debug!("Rejected arguments for '{}': {}", name, failure.message);
        failure
    })?;

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| (entry.handler)(&args)))
        .unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            error!("Handler '{}' panicked: {}", name, message);
            Err(Failure::internal(message))
        });

    if let Err(failure) = &outcome {
        warn!("'{}' failed ({}): {}", name, failure.kind, failure.message);
    }
    outcome
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("handler panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("handler panicked: {}", s)
    } else {
        "handler panicked".to_string()
    }
}

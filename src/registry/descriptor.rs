//! Capability descriptors and typed parameter specs
//!
//! A descriptor is the static schema of one capability. It is built once at
//! startup, checked by [`CapabilityDescriptor::validate`] when registered, and
//! never mutated afterwards.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::uri::UriTemplate;
use crate::error::{Result, ToolhostError};

/// Declared kind of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Number,
    Boolean,
}

impl ParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
        }
    }

    /// Value used for an absent optional parameter without a declared default
    pub fn zero_value(&self) -> ArgValue {
        match self {
            ParamKind::String => ArgValue::String(String::new()),
            ParamKind::Number => ArgValue::Number(0.0),
            ParamKind::Boolean => ArgValue::Boolean(false),
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that has been coerced to one of the declared kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl ArgValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ArgValue::String(_) => ParamKind::String,
            ArgValue::Number(_) => ParamKind::Number,
            ArgValue::Boolean(_) => ParamKind::Boolean,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ArgValue::String(s) => json!(s),
            ArgValue::Number(n) => json!(n),
            ArgValue::Boolean(b) => json!(b),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::String(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::String(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Number(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Boolean(value)
    }
}

/// Schema for a single named parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub description: String,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<ArgValue>,
    /// Enumeration constraint, string parameters only
    pub allowed: Option<Vec<String>>,
}

impl ParameterSpec {
    fn new(kind: ParamKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
            default: None,
            allowed: None,
        }
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ParamKind::String, name, description)
    }

    pub fn number(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ParamKind::Number, name, description)
    }

    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ParamKind::Boolean, name, description)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<ArgValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.allowed = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }

    /// Check the parameter's own invariants
    pub fn check(&self) -> std::result::Result<(), String> {
        if self.name.is_empty() {
            return Err("parameter name must not be empty".to_string());
        }
        if self.required && self.default.is_some() {
            return Err(format!("{} is required and cannot declare a default", self.name));
        }
        if self.allowed.is_some() && self.kind != ParamKind::String {
            return Err(format!(
                "{} declares allowed values but is a {}",
                self.name, self.kind
            ));
        }
        if self.allowed.is_some() && !self.required && self.default.is_none() {
            return Err(format!(
                "{} restricts its values and must be required or declare a default",
                self.name
            ));
        }
        if let Some(default) = &self.default {
            if default.kind() != self.kind {
                return Err(format!(
                    "{} default is a {} but the parameter is a {}",
                    self.name,
                    default.kind(),
                    self.kind
                ));
            }
            if let (Some(allowed), Some(value)) = (&self.allowed, default.as_str()) {
                if !allowed.iter().any(|a| a == value) {
                    return Err(format!(
                        "{} default '{}' is not an allowed value",
                        self.name, value
                    ));
                }
            }
        }
        Ok(())
    }

    /// JSON Schema fragment for this parameter
    pub fn to_schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".into(), json!(self.kind.as_str()));
        if !self.description.is_empty() {
            schema.insert("description".into(), json!(self.description));
        }
        if let Some(allowed) = &self.allowed {
            schema.insert("enum".into(), json!(allowed));
        }
        if let Some(default) = &self.default {
            schema.insert("default".into(), default.to_json());
        }
        Value::Object(schema)
    }
}

/// Immutable declaration of one tool, resource template or prompt
#[derive(Debug, Clone)]
pub struct CapabilityDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
    /// Set for resource templates only
    pub uri_template: Option<UriTemplate>,
    pub mime_type: Option<String>,
}

impl CapabilityDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            uri_template: None,
            mime_type: None,
        }
    }

    /// Build a resource template descriptor.
    ///
    /// Every placeholder in the template becomes a required string parameter,
    /// in the order the placeholders appear.
    pub fn resource_template(
        name: impl Into<String>,
        description: impl Into<String>,
        template: &str,
    ) -> Result<Self> {
        let template = UriTemplate::parse(template)?;
        let parameters = template
            .placeholders()
            .iter()
            .map(|p| ParameterSpec::string(p.clone(), format!("{{{}}} segment of the URI", p)).required())
            .collect();
        Ok(Self {
            name: name.into(),
            description: description.into(),
            parameters,
            uri_template: Some(template),
            mime_type: Some("text/plain".to_string()),
        })
    }

    pub fn param(mut self, spec: ParameterSpec) -> Self {
        self.parameters.push(spec);
        self
    }

    /// Reject descriptors that break a parameter invariant or repeat a name
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| ToolhostError::InvalidDescriptor {
            name: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for spec in &self.parameters {
            spec.check().map_err(invalid)?;
            if !seen.insert(spec.name.as_str()) {
                return Err(invalid(format!("parameter {} is declared twice", spec.name)));
            }
        }
        Ok(())
    }

    /// JSON Schema object describing the parameters, as listed by `tools/list`
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.to_schema()))
            .collect();
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }
}

//! URI templates for resource addressing
//!
//! Templates use `{name}` placeholders, e.g. `greeting://{name}`. A placeholder
//! matches one or more characters up to the next `/`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{Result, ToolhostError};

static PLACEHOLDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"));

#[derive(Debug, Clone)]
pub struct UriTemplate {
    raw: String,
    pattern: Regex,
    placeholders: Vec<String>,
}

impl UriTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let invalid = |reason: &str| ToolhostError::InvalidUriTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        if template.is_empty() {
            return Err(invalid("template is empty"));
        }

        let mut pattern = String::from("^");
        let mut placeholders: Vec<String> = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER_PATTERN.captures_iter(template) {
            let whole = caps.get(0).ok_or_else(|| invalid("malformed placeholder"))?;
            let literal = &template[last..whole.start()];
            if literal.contains('{') || literal.contains('}') {
                return Err(invalid("unbalanced or malformed braces"));
            }
            pattern.push_str(&regex::escape(literal));

            let name = caps[1].to_string();
            if placeholders.contains(&name) {
                return Err(invalid("placeholder declared twice"));
            }
            pattern.push_str(&format!("(?P<{}>[^/]+)", name));
            placeholders.push(name);
            last = whole.end();
        }

        let tail = &template[last..];
        if tail.contains('{') || tail.contains('}') {
            return Err(invalid("unbalanced or malformed braces"));
        }
        pattern.push_str(&regex::escape(tail));
        pattern.push('$');

        let pattern = Regex::new(&pattern).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            raw: template.to_string(),
            pattern,
            placeholders,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Match a concrete URI, returning placeholder values as a raw argument bag
    pub fn match_uri(&self, uri: &str) -> Option<Map<String, Value>> {
        let caps = self.pattern.captures(uri)?;
        let mut args = Map::new();
        for name in &self.placeholders {
            let value = caps.name(name)?.as_str();
            args.insert(name.clone(), Value::String(value.to_string()));
        }
        Some(args)
    }
}

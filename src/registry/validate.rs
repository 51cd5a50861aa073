//! Argument validation and coercion
//!
//! Turns an untyped argument bag into [`ValidatedArgs`] by walking the
//! descriptor's parameters in declaration order and stopping at the first
//! failure.
//!
//! ## Coercion rules
//!
//! - `string` accepts JSON strings only
//! - `number` accepts JSON numbers and strings that parse as a finite number
//! - `boolean` accepts JSON booleans and the strings `"true"` / `"false"`
//! - `null` is treated as an absent argument
//! - arguments the descriptor does not declare are ignored

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::descriptor::{ArgValue, CapabilityDescriptor, ParamKind, ParameterSpec};
use super::outcome::Failure;

/// Arguments coerced to their declared kinds, with defaults filled in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedArgs {
    values: HashMap<String, ArgValue>,
}

impl ValidatedArgs {
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn str(&self, name: &str) -> Result<&str, Failure> {
        self.get(name)
            .and_then(ArgValue::as_str)
            .ok_or_else(|| undeclared(name, ParamKind::String))
    }

    pub fn number(&self, name: &str) -> Result<f64, Failure> {
        self.get(name)
            .and_then(ArgValue::as_f64)
            .ok_or_else(|| undeclared(name, ParamKind::Number))
    }

    pub fn boolean(&self, name: &str) -> Result<bool, Failure> {
        self.get(name)
            .and_then(ArgValue::as_bool)
            .ok_or_else(|| undeclared(name, ParamKind::Boolean))
    }
}

impl FromIterator<(String, ArgValue)> for ValidatedArgs {
    fn from_iter<I: IntoIterator<Item = (String, ArgValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

fn undeclared(name: &str, kind: ParamKind) -> Failure {
    Failure::internal(format!("argument {} was not validated as a {}", name, kind))
}

/// Validate a raw argument bag against a descriptor
pub fn validate_arguments(
    descriptor: &CapabilityDescriptor,
    raw: &Map<String, Value>,
) -> Result<ValidatedArgs, Failure> {
    let mut values = HashMap::with_capacity(descriptor.parameters.len());

    for spec in &descriptor.parameters {
        let value = match raw.get(&spec.name).filter(|v| !v.is_null()) {
            Some(raw_value) => coerce(spec, raw_value)?,
            None if spec.required => {
                return Err(Failure::invalid_params(format!("{} is required", spec.name)));
            }
            None => spec
                .default
                .clone()
                .unwrap_or_else(|| spec.kind.zero_value()),
        };

        check_allowed(spec, &value)?;
        values.insert(spec.name.clone(), value);
    }

    Ok(ValidatedArgs { values })
}

/// Coerce one raw value to the parameter's declared kind
pub fn coerce(spec: &ParameterSpec, raw: &Value) -> Result<ArgValue, Failure> {
    let coerced = match (spec.kind, raw) {
        (ParamKind::String, Value::String(s)) => Some(ArgValue::String(s.clone())),
        (ParamKind::Number, Value::Number(n)) => n.as_f64().map(ArgValue::Number),
        (ParamKind::Number, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(ArgValue::Number),
        (ParamKind::Boolean, Value::Bool(b)) => Some(ArgValue::Boolean(*b)),
        (ParamKind::Boolean, Value::String(s)) => match s.as_str() {
            "true" => Some(ArgValue::Boolean(true)),
            "false" => Some(ArgValue::Boolean(false)),
            _ => None,
        },
        _ => None,
    };

    coerced.ok_or_else(|| Failure::invalid_params(format!("{} must be a {}", spec.name, spec.kind)))
}

fn check_allowed(spec: &ParameterSpec, value: &ArgValue) -> Result<(), Failure> {
    let (Some(allowed), Some(s)) = (&spec.allowed, value.as_str()) else {
        return Ok(());
    };
    if allowed.iter().any(|a| a == s) {
        Ok(())
    } else {
        Err(Failure::invalid_params(format!(
            "{} must be one of: {}",
            spec.name,
            allowed.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FailureKind;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn command_descriptor() -> CapabilityDescriptor {
        CapabilityDescriptor::new("execute_command", "")
            .param(ParameterSpec::string("command", "").required())
            .param(ParameterSpec::number("timeout", "").with_default(30.0))
    }

    #[test]
    fn test_defaults_filled_in() {
        let validated =
            validate_arguments(&command_descriptor(), &args(json!({"command": "ls"}))).unwrap();
        assert_eq!(validated.str("command").unwrap(), "ls");
        assert_eq!(validated.number("timeout").unwrap(), 30.0);
    }

    #[test]
    fn test_zero_value_without_default() {
        let descriptor =
            CapabilityDescriptor::new("t", "").param(ParameterSpec::boolean("verbose", ""));
        let validated = validate_arguments(&descriptor, &Map::new()).unwrap();
        assert!(!validated.boolean("verbose").unwrap());
    }

    #[test]
    fn test_missing_required() {
        let err = validate_arguments(&command_descriptor(), &Map::new()).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidParams);
        assert_eq!(err.message, "command is required");
    }

    #[test]
    fn test_null_counts_as_absent() {
        let err = validate_arguments(&command_descriptor(), &args(json!({"command": null})))
            .unwrap_err();
        assert_eq!(err.message, "command is required");
    }

    #[test]
    fn test_wrong_kind() {
        let err = validate_arguments(&command_descriptor(), &args(json!({"command": 5})))
            .unwrap_err();
        assert_eq!(err.message, "command must be a string");
    }

    #[test]
    fn test_numeric_string_coerced() {
        let validated = validate_arguments(
            &command_descriptor(),
            &args(json!({"command": "ls", "timeout": " 2.5 "})),
        )
        .unwrap();
        assert_eq!(validated.number("timeout").unwrap(), 2.5);
    }

    #[test]
    fn test_non_numeric_string_rejected() {
        let err = validate_arguments(
            &command_descriptor(),
            &args(json!({"command": "ls", "timeout": "soon"})),
        )
        .unwrap_err();
        assert_eq!(err.message, "timeout must be a number");
    }

    #[test]
    fn test_boolean_string_coerced() {
        let descriptor =
            CapabilityDescriptor::new("t", "").param(ParameterSpec::boolean("indent", ""));
        let validated =
            validate_arguments(&descriptor, &args(json!({"indent": "false"}))).unwrap();
        assert!(!validated.boolean("indent").unwrap());

        let err = validate_arguments(&descriptor, &args(json!({"indent": "no"}))).unwrap_err();
        assert_eq!(err.message, "indent must be a boolean");
    }

    #[test]
    fn test_allowed_values_enforced() {
        let descriptor = CapabilityDescriptor::new("t", "").param(
            ParameterSpec::string("operation", "")
                .required()
                .one_of(&["upper", "lower"]),
        );
        let err = validate_arguments(&descriptor, &args(json!({"operation": "shout"})))
            .unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidParams);
        assert_eq!(err.message, "operation must be one of: upper, lower");
    }

    #[test]
    fn test_fail_fast_in_declaration_order() {
        let descriptor = CapabilityDescriptor::new("t", "")
            .param(ParameterSpec::string("first", "").required())
            .param(ParameterSpec::string("second", "").required());
        let err = validate_arguments(&descriptor, &args(json!({"second": 1}))).unwrap_err();
        assert_eq!(err.message, "first is required");
    }

    #[test]
    fn test_undeclared_arguments_ignored() {
        let validated = validate_arguments(
            &command_descriptor(),
            &args(json!({"command": "ls", "extra": [1, 2]})),
        )
        .unwrap();
        assert_eq!(validated.len(), 2);
        assert!(validated.get("extra").is_none());
    }

    #[test]
    fn test_accessor_kind_mismatch_is_internal() {
        let validated =
            validate_arguments(&command_descriptor(), &args(json!({"command": "ls"}))).unwrap();
        let err = validated.number("command").unwrap_err();
        assert_eq!(err.kind, FailureKind::InternalError);
    }
}

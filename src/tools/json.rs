//! `format_json`: validate and reformat a JSON document

use serde_json::Value;

use crate::registry::{
    CapabilityDescriptor, Content, Failure, HandlerOutcome, ParameterSpec, ValidatedArgs,
};

/// Parse and re-serialize, pretty (two-space indent) or compact. Key order is kept.
pub fn format_json(input: &str, indent: bool) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::from_str(input)?;
    if indent {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
}

pub fn descriptor() -> CapabilityDescriptor {
    CapabilityDescriptor::new("format_json", "Format and validate JSON string")
        .param(ParameterSpec::string("json", "The JSON string to format").required())
        .param(
            ParameterSpec::boolean("indent", "Whether to indent the output (default: true)")
                .with_default(true),
        )
}

pub fn handle(args: &ValidatedArgs) -> HandlerOutcome {
    let input = args.str("json")?;
    let indent = args.boolean("indent")?;
    format_json(input, indent)
        .map(Content::Text)
        .map_err(|e| Failure::invalid_params(format!("Invalid JSON: {}", e)))
}

//! Text tools: `echo` and `string_operations`

use std::str::FromStr;

use crate::registry::{
    CapabilityDescriptor, Content, Failure, HandlerOutcome, ParameterSpec, ValidatedArgs,
};

pub fn echo_descriptor() -> CapabilityDescriptor {
    CapabilityDescriptor::new("echo", "Echo back the input text")
        .param(ParameterSpec::string("text", "The text to echo back").required())
}

pub fn echo(args: &ValidatedArgs) -> HandlerOutcome {
    Ok(Content::text(format!("Echo: {}", args.str("text")?)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringOperation {
    Upper,
    Lower,
    Reverse,
    Length,
}

impl StringOperation {
    pub const NAMES: [&'static str; 4] = ["upper", "lower", "reverse", "length"];

    pub fn apply(&self, text: &str) -> String {
        match self {
            StringOperation::Upper => text.to_uppercase(),
            StringOperation::Lower => text.to_lowercase(),
            StringOperation::Reverse => text.chars().rev().collect(),
            StringOperation::Length => text.chars().count().to_string(),
        }
    }
}

impl FromStr for StringOperation {
    type Err = Failure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upper" => Ok(StringOperation::Upper),
            "lower" => Ok(StringOperation::Lower),
            "reverse" => Ok(StringOperation::Reverse),
            "length" => Ok(StringOperation::Length),
            _ => Err(Failure::invalid_params(
                "Invalid operation. Use 'upper', 'lower', 'reverse', or 'length'",
            )),
        }
    }
}

pub fn string_operations_descriptor() -> CapabilityDescriptor {
    CapabilityDescriptor::new(
        "string_operations",
        "Perform string operations (upper, lower, reverse, length)",
    )
    .param(ParameterSpec::string("text", "The text to operate on").required())
    .param(
        ParameterSpec::string(
            "operation",
            "Operation to perform: 'upper', 'lower', 'reverse', 'length'",
        )
        .required()
        .one_of(&StringOperation::NAMES),
    )
}

pub fn string_operations(args: &ValidatedArgs) -> HandlerOutcome {
    let operation: StringOperation = args.str("operation")?.parse()?;
    Ok(Content::text(operation.apply(args.str("text")?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations() {
        assert_eq!(StringOperation::Upper.apply("Hello"), "HELLO");
        assert_eq!(StringOperation::Lower.apply("Hello"), "hello");
        assert_eq!(StringOperation::Reverse.apply("Hello"), "olleH");
        assert_eq!(StringOperation::Length.apply("Hello"), "5");
    }

    #[test]
    fn test_unicode_reverse_and_length() {
        assert_eq!(StringOperation::Reverse.apply("añb"), "bña");
        assert_eq!(StringOperation::Length.apply("こんにちは"), "5");
    }

    #[test]
    fn test_unknown_operation() {
        assert!("shout".parse::<StringOperation>().is_err());
    }

    #[test]
    fn test_names_round_trip_through_parse() {
        for name in StringOperation::NAMES {
            assert!(name.parse::<StringOperation>().is_ok());
        }
    }
}

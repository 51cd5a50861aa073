//! Property-based tests for toolhost
//!
//! These tests verify invariants that must hold for all inputs:
//! - Validation rejects missing required and out-of-set arguments
//! - Reformatting JSON preserves its meaning
//! - Reversing text twice is the identity
//! - Parsers never panic
//!
//! Run with: cargo test --test property_tests

use proptest::prelude::*;

// ============================================================================
// DISPATCH VALIDATION TESTS
// ============================================================================

mod dispatch_tests {
    use super::*;
    use serde_json::{json, Map, Value};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use toolhost::registry::{
        CapabilityDescriptor, Content, Dispatcher, FailureKind, IncomingCall, Namespace,
        ParameterSpec, Registry,
    };

    fn single_param_dispatcher(spec: ParameterSpec, invoked: Arc<AtomicBool>) -> Dispatcher {
        let mut registry = Registry::new();
        registry
            .register(
                Namespace::Tools,
                CapabilityDescriptor::new("probe", "").param(spec),
                move |_| {
                    invoked.store(true, Ordering::SeqCst);
                    Ok(Content::text("ok"))
                },
            )
            .unwrap();
        Dispatcher::new(registry)
    }

    proptest! {
        /// Invariant: omitting a required argument fails before the handler runs
        #[test]
        fn missing_required_never_invokes_handler(
            name in "[a-z_]{1,12}",
            kind in 0u8..3,
            other_key in "[A-Z]{1,8}",
        ) {
            let spec = match kind {
                0 => ParameterSpec::string(name.clone(), ""),
                1 => ParameterSpec::number(name.clone(), ""),
                _ => ParameterSpec::boolean(name.clone(), ""),
            }
            .required();
            let invoked = Arc::new(AtomicBool::new(false));
            let dispatcher = single_param_dispatcher(spec, invoked.clone());

            let mut args = Map::new();
            args.insert(other_key, json!("unrelated"));
            let outcome = dispatcher.dispatch(&IncomingCall::new(Namespace::Tools, "probe", args));

            let failure = outcome.unwrap_err();
            prop_assert_eq!(failure.kind, FailureKind::InvalidParams);
            prop_assert_eq!(failure.message, format!("{} is required", name));
            prop_assert!(!invoked.load(Ordering::SeqCst));
        }

        /// Invariant: values outside the allowed set are rejected
        #[test]
        fn outside_allowed_set_rejected(value in "[a-z]{1,10}") {
            let allowed = ["upper", "lower", "reverse", "length"];
            prop_assume!(!allowed.contains(&value.as_str()));

            let invoked = Arc::new(AtomicBool::new(false));
            let spec = ParameterSpec::string("operation", "").required().one_of(&allowed);
            let dispatcher = single_param_dispatcher(spec, invoked.clone());

            let mut args = Map::new();
            args.insert("operation".into(), Value::String(value));
            let failure = dispatcher
                .dispatch(&IncomingCall::new(Namespace::Tools, "probe", args))
                .unwrap_err();

            prop_assert_eq!(failure.kind, FailureKind::InvalidParams);
            prop_assert!(!invoked.load(Ordering::SeqCst));
        }

        /// Invariant: every allowed value passes validation
        #[test]
        fn inside_allowed_set_accepted(index in 0usize..4) {
            let allowed = ["upper", "lower", "reverse", "length"];
            let invoked = Arc::new(AtomicBool::new(false));
            let spec = ParameterSpec::string("operation", "").required().one_of(&allowed);
            let dispatcher = single_param_dispatcher(spec, invoked.clone());

            let mut args = Map::new();
            args.insert("operation".into(), json!(allowed[index]));
            prop_assert!(dispatcher
                .dispatch(&IncomingCall::new(Namespace::Tools, "probe", args))
                .is_ok());
            prop_assert!(invoked.load(Ordering::SeqCst));
        }
    }
}

// ============================================================================
// FORMAT_JSON TESTS
// ============================================================================

mod format_json_tests {
    use super::*;
    use serde_json::Value;
    use toolhost::tools::json::format_json;

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| Value::from(n)),
            "\\PC{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::vec(("[a-z]{1,6}", inner), 0..6)
                    .prop_map(|pairs| Value::Object(pairs.into_iter().collect())),
            ]
        })
    }

    proptest! {
        /// Invariant: compact output parses back to the same document
        #[test]
        fn compact_preserves_structure(doc in arb_json()) {
            let source = serde_json::to_string_pretty(&doc).unwrap();
            let formatted = format_json(&source, false).unwrap();
            let reparsed: Value = serde_json::from_str(&formatted).unwrap();
            prop_assert_eq!(reparsed, doc);
        }

        /// Invariant: indented output parses back to the same document
        #[test]
        fn indented_preserves_structure(doc in arb_json()) {
            let source = serde_json::to_string(&doc).unwrap();
            let formatted = format_json(&source, true).unwrap();
            let reparsed: Value = serde_json::from_str(&formatted).unwrap();
            prop_assert_eq!(reparsed, doc);
        }

        /// Invariant: format_json never panics on any string input
        #[test]
        fn never_panics(s in "\\PC{0,64}") {
            let _ = format_json(&s, true);
        }
    }
}

// ============================================================================
// STRING OPERATION TESTS
// ============================================================================

mod string_tests {
    use super::*;
    use toolhost::tools::text::StringOperation;

    proptest! {
        /// Invariant: reverse is an involution
        #[test]
        fn reverse_twice_is_identity(s in "\\PC{0,100}") {
            let once = StringOperation::Reverse.apply(&s);
            prop_assert_eq!(StringOperation::Reverse.apply(&once), s);
        }

        /// Invariant: length counts characters, not bytes
        #[test]
        fn length_counts_chars(s in "\\PC{0,100}") {
            let reported: usize = StringOperation::Length.apply(&s).parse().unwrap();
            prop_assert_eq!(reported, s.chars().count());
        }
    }
}

// ============================================================================
// CALCULATOR TESTS
// ============================================================================

mod calculator_tests {
    use super::*;
    use toolhost::tools::calculator::{evaluate, CalcError};

    proptest! {
        /// Invariant: evaluate never panics on any string input
        #[test]
        fn never_panics(s in "\\PC{0,64}") {
            let _ = evaluate(&s);
        }

        /// Invariant: single binary integer operations match native arithmetic
        #[test]
        fn binary_matches_native(a in -10_000i64..10_000, b in -10_000i64..10_000, op in 0u8..4) {
            let (symbol, expected) = match op {
                0 => ("+", Some((a + b) as f64)),
                1 => ("-", Some((a - b) as f64)),
                2 => ("*", Some((a * b) as f64)),
                _ => ("/", if b == 0 { None } else { Some(a as f64 / b as f64) }),
            };
            let expression = format!("{} {} ({})", a, symbol, b);
            match expected {
                Some(value) => prop_assert_eq!(evaluate(&expression), Ok(value)),
                None => prop_assert_eq!(evaluate(&expression), Err(CalcError::DivisionByZero)),
            }
        }
    }
}

// ============================================================================
// URI TEMPLATE TESTS
// ============================================================================

mod uri_tests {
    use super::*;
    use toolhost::registry::UriTemplate;

    proptest! {
        /// Invariant: any slash-free segment is extracted verbatim
        #[test]
        fn placeholder_extracted(name in "[^/]{1,40}") {
            let template = UriTemplate::parse("greeting://{name}").unwrap();
            let args = template.match_uri(&format!("greeting://{}", name)).unwrap();
            prop_assert_eq!(args["name"].as_str(), Some(name.as_str()));
        }
    }
}

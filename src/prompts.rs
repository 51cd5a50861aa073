//! Built-in prompt templates

use crate::error::Result;
use crate::registry::{
    CapabilityDescriptor, Content, HandlerOutcome, Namespace, ParameterSpec, PromptMessage,
    Registry, ValidatedArgs,
};

pub const DEFAULT_TEXT: &str = "Hello, world!";
pub const DEFAULT_LANGUAGE: &str = "es";

/// Canned translations of [`DEFAULT_TEXT`]
const KNOWN_TRANSLATIONS: &[(&str, &str)] = &[
    ("es", "Hola, mundo!"),
    ("fr", "Bonjour, le monde!"),
    ("de", "Hallo, Welt!"),
    ("ja", "こんにちは、世界！"),
];

/// Build the translation request text.
///
/// A canned translation is used only when `text` is exactly [`DEFAULT_TEXT`];
/// any other text, and any language without a canned entry, gets a
/// `[Translation to <lang>: <text>]` placeholder. Empty arguments are kept as
/// given rather than replaced by the defaults.
pub fn translation_prompt(text: &str, target_language: &str) -> String {
    let translated = KNOWN_TRANSLATIONS
        .iter()
        .find(|(lang, _)| text == DEFAULT_TEXT && *lang == target_language)
        .map(|(_, t)| t.to_string())
        .unwrap_or_else(|| format!("[Translation to {}: {}]", target_language, text));

    format!(
        "Translate the following text to {}:\n\nOriginal: {}\nTranslation: {}",
        target_language, text, translated
    )
}

pub fn translate_descriptor() -> CapabilityDescriptor {
    CapabilityDescriptor::new("translate", "Translate text to another language")
        .param(ParameterSpec::string("text", "Text to translate").with_default(DEFAULT_TEXT))
        .param(
            ParameterSpec::string(
                "target_language",
                "Target language code (e.g., 'es', 'fr', 'de')",
            )
            .with_default(DEFAULT_LANGUAGE),
        )
}

pub fn translate(args: &ValidatedArgs) -> HandlerOutcome {
    let prompt = translation_prompt(args.str("text")?, args.str("target_language")?);
    Ok(Content::Messages(vec![PromptMessage::user(prompt)]))
}

pub fn register_prompts(registry: &mut Registry) -> Result<()> {
    registry.register(Namespace::Prompts, translate_descriptor(), translate)
}

//! API key classification and the static provider model catalog.

use crate::types::Provider;

const OPENAI_MODELS: &[&str] = &[
    "gpt-4o",
    "gpt-4-turbo",
    "gpt-4",
    "gpt-3.5-turbo",
    "gpt-4o-mini",
];

const ANTHROPIC_MODELS: &[&str] = &[
    "claude-3-opus-20240229",
    "claude-3-sonnet-20240229",
    "claude-3-haiku-20240307",
    "claude-3-5-sonnet-20241022",
];

const GOOGLE_MODELS: &[&str] = &[
    "gemini-pro",
    "gemini-1.5-pro",
    "gemini-1.5-flash",
    "gemini-2.0-flash",
];

/// Classify an opaque API key by its lexical shape. Pure and total: any
/// string input, including empty or non-ASCII, resolves to a provider.
///
/// The `sk-ant-` check runs before the bare `sk-` check; the more specific
/// prefix must win or Anthropic keys would classify as OpenAI.
pub fn detect_provider(api_key: &str) -> Provider {
    let key = api_key.trim();
    if key.is_empty() {
        return Provider::Unknown;
    }
    if key.starts_with("sk-ant-") {
        return Provider::Anthropic;
    }
    if key.starts_with("sk-proj-") || key.starts_with("sk-") {
        return Provider::OpenAI;
    }
    if key.starts_with("AIza") {
        return Provider::Google;
    }
    Provider::Unknown
}

/// Supported model identifiers for a provider, in display/preference order.
/// Empty for `Unknown`.
pub fn available_models(provider: Provider) -> &'static [&'static str] {
    match provider {
        Provider::OpenAI => OPENAI_MODELS,
        Provider::Anthropic => ANTHROPIC_MODELS,
        Provider::Google => GOOGLE_MODELS,
        Provider::Unknown => &[],
    }
}

/// Cheapest model per provider, used only for key-validation probes.
/// Falls back to gpt-4o-mini for unrecognized providers.
pub fn default_validation_model(provider: Provider) -> &'static str {
    match provider {
        Provider::Anthropic => "claude-3-haiku-20240307",
        Provider::Google => "gemini-1.5-flash",
        Provider::OpenAI | Provider::Unknown => "gpt-4o-mini",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_prefixes_detected() {
        assert_eq!(detect_provider("sk-proj-abc123"), Provider::OpenAI);
        assert_eq!(detect_provider("sk-abc123"), Provider::OpenAI);
    }

    #[test]
    fn anthropic_prefix_wins_over_bare_sk() {
        assert_eq!(detect_provider("sk-ant-xyz"), Provider::Anthropic);
    }

    #[test]
    fn google_prefix_detected() {
        assert_eq!(detect_provider("AIzaSyFake"), Provider::Google);
    }

    #[test]
    fn unrecognized_keys_are_unknown() {
        assert_eq!(detect_provider("totally-invalid"), Provider::Unknown);
        assert_eq!(detect_provider(""), Provider::Unknown);
        assert_eq!(detect_provider("   "), Provider::Unknown);
        assert_eq!(detect_provider("ключ-доступа"), Provider::Unknown);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(detect_provider("  sk-proj-abc  "), Provider::OpenAI);
        assert_eq!(detect_provider("\tAIzaSyFake\n"), Provider::Google);
    }

    #[test]
    fn classification_is_deterministic() {
        for key in ["sk-abc", "sk-ant-abc", "AIzaX", "nope", ""] {
            assert_eq!(detect_provider(key), detect_provider(key));
        }
    }

    #[test]
    fn catalog_order_is_stable() {
        let openai = available_models(Provider::OpenAI);
        assert_eq!(openai.first(), Some(&"gpt-4o"));
        assert_eq!(openai.len(), 5);
        assert_eq!(available_models(Provider::Anthropic).len(), 4);
        assert_eq!(
            available_models(Provider::Google).to_vec(),
            vec!["gemini-pro", "gemini-1.5-pro", "gemini-1.5-flash", "gemini-2.0-flash"]
        );
        assert!(available_models(Provider::Unknown).is_empty());
        // Idempotent across calls.
        assert_eq!(available_models(Provider::OpenAI), openai);
    }

    #[test]
    fn validation_models_are_the_cheap_tier() {
        assert_eq!(default_validation_model(Provider::OpenAI), "gpt-4o-mini");
        assert_eq!(
            default_validation_model(Provider::Anthropic),
            "claude-3-haiku-20240307"
        );
        assert_eq!(default_validation_model(Provider::Google), "gemini-1.5-flash");
        assert_eq!(default_validation_model(Provider::Unknown), "gpt-4o-mini");
    }

    #[test]
    fn every_validation_model_is_in_its_catalog() {
        for provider in [Provider::OpenAI, Provider::Anthropic, Provider::Google] {
            let model = default_validation_model(provider);
            assert!(available_models(provider).contains(&model));
        }
    }
}

//! Single-turn chat dispatch and key-validation probes.
//!
//! Both operations are stateless and single-shot. They never return `Err`:
//! every adapter failure is folded into the returned result so callers see a
//! structured outcome, not a raised error.

use crate::client::LlmClient;
use crate::keys::default_validation_model;
use crate::types::{ChatTurn, DispatchResult, KeyValidationResult, Provider};

/// Persona for normal chat turns: a cybersecurity-education assistant.
pub const CYBERSECURITY_SYSTEM_PROMPT: &str = "\
You are a highly knowledgeable cybersecurity expert and ethical hacking instructor. Your purpose is to educate users about:

1. Cybersecurity concepts and best practices
2. Vulnerability identification and exploitation techniques (for educational purposes only)
3. Penetration testing methodologies
4. Security tools and their usage
5. OWASP Top 10 and common vulnerabilities
6. Network security, web application security, and system hardening
7. Real-world attack scenarios and defensive strategies

You help users learn about:
- SQL Injection, XSS, CSRF, and other web vulnerabilities
- Network scanning and reconnaissance
- Privilege escalation techniques
- Cryptography and secure communication
- Malware analysis and reverse engineering
- Security compliance and frameworks (NIST, ISO 27001, etc.)

IMPORTANT:
- Always emphasize ethical hacking and legal boundaries
- Provide educational explanations with practical examples
- Include defensive measures alongside attack techniques
- Support learners preparing for certifications (CEH, OSCP, etc.)
- Answer questions about real hacking scenarios for educational purposes

Be thorough, technical, and educational in your responses.";

/// Minimal prompt for key-validation probes. Validation only confirms the
/// key/provider pair is live, so it must not reuse the chat persona.
const VALIDATION_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
const VALIDATION_PROBE_TEXT: &str = "Hi";

/// Serve one chat turn. Only the content of the last element of `turns` is
/// forwarded (empty string when `turns` is empty); earlier turns and
/// `session_id` have no durable effect here. `session_id` is logged as a
/// correlation tag only.
#[tracing::instrument(
    level = "info",
    skip_all,
    fields(provider = %provider, model = %model, session_id = %session_id, turns = turns.len())
)]
pub async fn complete_chat(
    turns: &[ChatTurn],
    api_key: &str,
    provider: Provider,
    model: &str,
    session_id: &str,
) -> DispatchResult {
    let user_text = turns.last().map(|t| t.content.as_str()).unwrap_or("");

    let client = LlmClient::new(api_key, provider, model);
    match client
        .send_single_turn(CYBERSECURITY_SYSTEM_PROMPT, user_text)
        .await
    {
        Ok(text) => {
            tracing::info!(provider = %provider, model = %model, "chat completion succeeded");
            DispatchResult::Success {
                text,
                provider,
                model: model.to_string(),
            }
        }
        Err(e) => {
            tracing::error!(provider = %provider, model = %model, error = %e, "chat completion failed");
            DispatchResult::Failure {
                reason: e.to_string(),
                provider,
                model: model.to_string(),
            }
        }
    }
}

/// Probe a provider with the caller's key. The probe result is never
/// persisted; the key is dropped with the client when this returns.
#[tracing::instrument(level = "info", skip_all, fields(provider = %provider))]
pub async fn validate_key(api_key: &str, provider: Provider) -> KeyValidationResult {
    let model = default_validation_model(provider);
    let client = LlmClient::new(api_key, provider, model);

    match client
        .send_single_turn(VALIDATION_SYSTEM_PROMPT, VALIDATION_PROBE_TEXT)
        .await
    {
        Ok(_) => KeyValidationResult {
            is_valid: true,
            provider,
            error: None,
        },
        Err(e) => {
            tracing::warn!(provider = %provider, error = %e, "api key validation failed");
            KeyValidationResult {
                is_valid: false,
                provider,
                error: Some(e.to_string()),
            }
        }
    }
}

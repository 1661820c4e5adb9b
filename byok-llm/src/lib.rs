//! BYO-key LLM dispatch for the CyberAI gateway.
//!
//! Pure HTTP clients over the provider REST APIs; the caller supplies the
//! credential per request and nothing outlives a single dispatch.

mod anthropic;
mod client;
mod dispatch;
mod error;
mod google;
mod keys;
mod openai;
mod types;

pub use client::LlmClient;
pub use dispatch::{complete_chat, validate_key, CYBERSECURITY_SYSTEM_PROMPT};
pub use error::{LlmError, Result};
pub use keys::{available_models, default_validation_model, detect_provider};
pub use types::{ChatTurn, DispatchResult, KeyValidationResult, Provider, Role};

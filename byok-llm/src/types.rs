use serde::{Deserialize, Serialize};

/// AI vendor a BYOK key belongs to. `Unknown` is a valid classification
/// result, not an error: it carries no model catalog and cannot be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Provider {
    OpenAI,
    Anthropic,
    Google,
    Unknown,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Google => "google",
            Provider::Unknown => "unknown",
        }
    }

    /// Unrecognized names resolve to `Unknown` so stringly wire input never
    /// rejects a request outright.
    pub fn parse(name: &str) -> Provider {
        match name.trim().to_ascii_lowercase().as_str() {
            "openai" => Provider::OpenAI,
            "anthropic" => Provider::Anthropic,
            "google" => Provider::Google,
            _ => Provider::Unknown,
        }
    }
}

impl From<String> for Provider {
    fn from(name: String) -> Self {
        Provider::parse(&name)
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of the caller-supplied conversation. Only the content of the
/// most recent turn is forwarded to the provider; earlier turns and the
/// timestamp are accepted for wire compatibility but otherwise unused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Outcome of a single chat dispatch. Exactly one variant; provider and
/// model always echo the caller's request, success or not.
#[derive(Debug, Clone)]
pub enum DispatchResult {
    Success {
        text: String,
        provider: Provider,
        model: String,
    },
    Failure {
        reason: String,
        provider: Provider,
        model: String,
    },
}

impl DispatchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchResult::Success { .. })
    }

    pub fn provider(&self) -> Provider {
        match self {
            DispatchResult::Success { provider, .. } => *provider,
            DispatchResult::Failure { provider, .. } => *provider,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            DispatchResult::Success { model, .. } => model,
            DispatchResult::Failure { model, .. } => model,
        }
    }
}

/// Result of a zero-persistence liveness probe against a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyValidationResult {
    pub is_valid: bool,
    pub provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

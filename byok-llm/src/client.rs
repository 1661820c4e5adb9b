use crate::anthropic::AnthropicClient;
use crate::error::{LlmError, Result};
use crate::google::GoogleClient;
use crate::openai::OpenAiClient;
use crate::types::Provider;
use std::time::Duration;

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Single-turn BYOK client. Holds the caller's key only for the lifetime of
/// one instance; nothing is shared or persisted across calls.
#[derive(Clone)]
pub struct LlmClient {
    provider: Provider,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl LlmClient {
    #[tracing::instrument(level = "debug", skip_all, fields(provider = %provider, model = %model))]
    pub fn new(api_key: &str, provider: Provider, model: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(%e, "reqwest client build failed; falling back to default client");
                reqwest::Client::new()
            });
        Self {
            provider,
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Forward one user turn and return the provider's text. Makes exactly
    /// one outbound request; no retries at this layer.
    #[tracing::instrument(level = "info", skip_all, fields(provider = %self.provider, model = %self.model))]
    pub async fn send_single_turn(&self, system_prompt: &str, user_text: &str) -> Result<String> {
        match self.provider {
            Provider::OpenAI => {
                let c = OpenAiClient::new(self.client.clone(), &self.api_key, &self.model);
                c.send(system_prompt, user_text).await
            }
            Provider::Anthropic => {
                let c = AnthropicClient::new(self.client.clone(), &self.api_key, &self.model);
                c.send(system_prompt, user_text).await
            }
            Provider::Google => {
                let c = GoogleClient::new(self.client.clone(), &self.api_key, &self.model);
                c.send(system_prompt, user_text).await
            }
            Provider::Unknown => Err(LlmError::InvalidInput(
                "cannot dispatch to unknown provider".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_provider_fails_without_network() {
        let client = LlmClient::new("sk-whatever", Provider::Unknown, "gpt-4o-mini");
        let err = client
            .send_single_turn("be helpful", "Hi")
            .await
            .expect_err("unknown provider must not dispatch");
        assert!(matches!(err, LlmError::InvalidInput(_)));
    }

    #[test]
    fn client_echoes_provider_and_model() {
        let client = LlmClient::new("sk-ant-key", Provider::Anthropic, "claude-3-haiku-20240307");
        assert_eq!(client.provider(), Provider::Anthropic);
        assert_eq!(client.model(), "claude-3-haiku-20240307");
    }
}

use crate::error::{LlmError, Result};
use serde::{Deserialize, Serialize};

const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 2048;

#[derive(Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(http: reqwest::Client, api_key: &str, model: &str) -> Self {
        Self {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    #[tracing::instrument(level = "info", skip_all)]
    pub async fn send(&self, system_prompt: &str, user_text: &str) -> Result<String> {
        let req = AnthropicRequest::new(&self.model, system_prompt, user_text);

        let response = self
            .http
            .post(ANTHROPIC_MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&req)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Http(format!(
                "anthropic chat status={status} body={body}"
            )));
        }

        let parsed: AnthropicResponse = serde_json::from_str(&body)?;
        parsed.into_text()
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text { text: String },
}

impl AnthropicRequest {
    fn new(model: &str, system_prompt: &str, user_text: &str) -> Self {
        Self {
            model: model.to_string(),
            max_tokens: MAX_TOKENS,
            system: system_prompt.to_string(),
            messages: vec![AnthropicMessage {
                role: "user",
                content: vec![AnthropicContentBlock::Text {
                    text: user_text.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContentBlock>,
}

impl AnthropicResponse {
    fn into_text(self) -> Result<String> {
        if self.content.is_empty() {
            return Err(LlmError::ResponseFormat(
                "anthropic response missing content blocks".to_string(),
            ));
        }
        let mut text = String::new();
        for block in self.content {
            let AnthropicContentBlock::Text { text: t } = block;
            text.push_str(&t);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_puts_system_prompt_at_top_level() {
        let req = AnthropicRequest::new("claude-3-haiku-20240307", "be helpful", "Hi");
        let v = serde_json::to_value(&req).expect("serialize");
        assert_eq!(v["model"], "claude-3-haiku-20240307");
        assert_eq!(v["max_tokens"], 2048);
        assert_eq!(v["system"], "be helpful");
        assert_eq!(v["messages"][0]["role"], "user");
        assert_eq!(v["messages"][0]["content"][0]["type"], "text");
        assert_eq!(v["messages"][0]["content"][0]["text"], "Hi");
    }

    #[test]
    fn response_text_concatenates_text_blocks() {
        let parsed: AnthropicResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"hel"},{"type":"text","text":"lo"}]}"#,
        )
        .expect("parse");
        assert_eq!(parsed.into_text().expect("text"), "hello");
    }

    #[test]
    fn empty_content_is_a_format_error() {
        let parsed: AnthropicResponse = serde_json::from_str(r#"{"content":[]}"#).expect("parse");
        assert!(matches!(
            parsed.into_text(),
            Err(LlmError::ResponseFormat(_))
        ));
    }
}

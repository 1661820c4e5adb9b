use crate::error::{LlmError, Result};
use serde::{Deserialize, Serialize};

const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, api_key: &str, model: &str) -> Self {
        Self {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    #[tracing::instrument(level = "info", skip_all)]
    pub async fn send(&self, system_prompt: &str, user_text: &str) -> Result<String> {
        let req = OpenAiChatRequest::new(&self.model, system_prompt, user_text);

        let response = self
            .http
            .post(OPENAI_CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Http(format!(
                "openai chat status={status} body={body}"
            )));
        }

        let parsed: OpenAiChatResponse = serde_json::from_str(&body)?;
        parsed.into_text()
    }
}

#[derive(Debug, Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: &'static str,
    content: String,
}

impl OpenAiChatRequest {
    fn new(model: &str, system_prompt: &str, user_text: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                OpenAiMessage {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                OpenAiMessage {
                    role: "user",
                    content: user_text.to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiChatResponse {
    fn into_text(self) -> Result<String> {
        let choice = self.choices.into_iter().next().ok_or_else(|| {
            LlmError::ResponseFormat("openai response missing choices".to_string())
        })?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_system_then_user_message() {
        let req = OpenAiChatRequest::new("gpt-4o-mini", "be helpful", "Hi");
        let v = serde_json::to_value(&req).expect("serialize");
        assert_eq!(v["model"], "gpt-4o-mini");
        assert_eq!(v["messages"][0]["role"], "system");
        assert_eq!(v["messages"][0]["content"], "be helpful");
        assert_eq!(v["messages"][1]["role"], "user");
        assert_eq!(v["messages"][1]["content"], "Hi");
    }

    #[test]
    fn response_text_is_first_choice_content() {
        let parsed: OpenAiChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#,
        )
        .expect("parse");
        assert_eq!(parsed.into_text().expect("text"), "hello");
    }

    #[test]
    fn missing_choices_is_a_format_error() {
        let parsed: OpenAiChatResponse =
            serde_json::from_str(r#"{"choices":[]}"#).expect("parse");
        assert!(matches!(
            parsed.into_text(),
            Err(LlmError::ResponseFormat(_))
        ));
    }
}

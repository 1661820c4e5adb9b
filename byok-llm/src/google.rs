use crate::error::{LlmError, Result};
use serde::{Deserialize, Serialize};

const GOOGLE_GENERATE_CONTENT_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GoogleClient {
    pub fn new(http: reqwest::Client, api_key: &str, model: &str) -> Self {
        Self {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    #[tracing::instrument(level = "info", skip_all)]
    pub async fn send(&self, system_prompt: &str, user_text: &str) -> Result<String> {
        let req = GeminiRequest::new(system_prompt, user_text);
        // The key travels as a query parameter; Gemini has no auth header scheme.
        let url = format!(
            "{GOOGLE_GENERATE_CONTENT_BASE}/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let response = self
            .http
            .post(&url)
            .json(&req)
            .send()
            .await
            .map_err(strip_url_from_error)?;

        let status = response.status();
        let body = response.text().await.map_err(strip_url_from_error)?;
        if !status.is_success() {
            return Err(LlmError::Http(format!(
                "google chat status={status} body={body}"
            )));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body)?;
        parsed.into_text()
    }
}

/// reqwest errors carry the request URL in their display output, and here the
/// URL carries the caller's key. Drop the URL before the message can reach
/// logs or result envelopes.
fn strip_url_from_error(e: reqwest::Error) -> LlmError {
    LlmError::from(e.without_url())
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

impl GeminiRequest {
    fn new(system_prompt: &str, user_text: &str) -> Self {
        Self {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: system_prompt.to_string(),
                }],
            },
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: user_text.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

impl GeminiResponse {
    fn into_text(self) -> Result<String> {
        let candidate = self.candidates.into_iter().next().ok_or_else(|| {
            LlmError::ResponseFormat("google response missing candidates".to_string())
        })?;
        let content = candidate.content.ok_or_else(|| {
            LlmError::ResponseFormat("google candidate missing content".to_string())
        })?;
        Ok(content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_system_instruction_and_user_content() {
        let req = GeminiRequest::new("be helpful", "Hi");
        let v = serde_json::to_value(&req).expect("serialize");
        assert_eq!(v["system_instruction"]["parts"][0]["text"], "be helpful");
        assert!(v["system_instruction"].get("role").is_none());
        assert_eq!(v["contents"][0]["role"], "user");
        assert_eq!(v["contents"][0]["parts"][0]["text"], "Hi");
    }

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let parsed: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"hel"},{"text":"lo"}]}}]}"#,
        )
        .expect("parse");
        assert_eq!(parsed.into_text().expect("text"), "hello");
    }

    #[test]
    fn missing_candidates_is_a_format_error() {
        let parsed: GeminiResponse = serde_json::from_str(r#"{}"#).expect("parse");
        assert!(matches!(
            parsed.into_text(),
            Err(LlmError::ResponseFormat(_))
        ));
    }

    #[tokio::test]
    async fn transport_errors_never_contain_the_api_key() {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(1))
            .build()
            .expect("build client");
        let client = GoogleClient::new(http, "AIzaSECRETSECRET123", "gemini-pro");
        let err = client
            .send("be helpful", "Hi")
            .await
            .expect_err("1ms timeout cannot succeed");
        let rendered = err.to_string();
        assert!(
            !rendered.contains("AIzaSECRETSECRET123"),
            "api key leaked into error message: {rendered}"
        );
    }
}

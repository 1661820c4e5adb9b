use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Json;
use byok_llm::{complete_chat, ChatTurn, DispatchResult, Provider};
use serde::{Deserialize, Serialize};

pub fn router() -> axum::Router {
    axum::Router::new().route("/api/chat/completions", post(chat_completion))
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionRequest {
    pub messages: Vec<ChatTurn>,
    pub api_key: String,
    pub provider: Provider,
    pub model: String,
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

fn default_session_id() -> String {
    "default".to_string()
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub provider: Provider,
    pub model: String,
}

/// Request-shape failures are the only 400s; everything past this boundary
/// comes back as HTTP 200 with `success:false`.
#[tracing::instrument(level = "info", skip_all, fields(provider = %req.provider, model = %req.model))]
async fn chat_completion(Json(req): Json<ChatCompletionRequest>) -> Response {
    if let Err(detail) = validate_request(&req) {
        tracing::warn!(%detail, "rejected malformed chat request");
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "detail": detail })),
        )
            .into_response();
    }

    let result = complete_chat(
        &req.messages,
        &req.api_key,
        req.provider,
        &req.model,
        &req.session_id,
    )
    .await;

    Json(to_response(result)).into_response()
}

fn validate_request(req: &ChatCompletionRequest) -> Result<(), &'static str> {
    if req.api_key.trim().is_empty() {
        return Err("API key is required");
    }
    if req.messages.is_empty() {
        return Err("Messages are required");
    }
    Ok(())
}

fn to_response(result: DispatchResult) -> ChatCompletionResponse {
    match result {
        DispatchResult::Success {
            text,
            provider,
            model,
        } => ChatCompletionResponse {
            success: true,
            message: Some(text),
            error: None,
            provider,
            model,
        },
        DispatchResult::Failure {
            reason,
            provider,
            model,
        } => ChatCompletionResponse {
            success: false,
            message: Some(format!("Failed to get response: {reason}")),
            error: Some(reason),
            provider,
            model,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byok_llm::Role;

    fn request(api_key: &str, messages: Vec<ChatTurn>) -> ChatCompletionRequest {
        ChatCompletionRequest {
            messages,
            api_key: api_key.to_string(),
            provider: Provider::OpenAI,
            model: "gpt-4o-mini".to_string(),
            session_id: default_session_id(),
        }
    }

    fn user_turn(content: &str) -> ChatTurn {
        ChatTurn {
            role: Role::User,
            content: content.to_string(),
            timestamp: None,
        }
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let req = request("   ", vec![user_turn("hello")]);
        assert_eq!(validate_request(&req), Err("API key is required"));
    }

    #[test]
    fn missing_messages_are_rejected() {
        let req = request("sk-abc", vec![]);
        assert_eq!(validate_request(&req), Err("Messages are required"));
    }

    #[test]
    fn well_formed_request_passes_validation() {
        let req = request("sk-abc", vec![user_turn("What is XSS?")]);
        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn session_id_defaults_when_absent() {
        let req: ChatCompletionRequest = serde_json::from_str(
            r#"{
                "messages": [{"role":"user","content":"hi"}],
                "api_key": "sk-abc",
                "provider": "openai",
                "model": "gpt-4o"
            }"#,
        )
        .expect("parse");
        assert_eq!(req.session_id, "default");
    }

    #[test]
    fn failure_envelope_echoes_provider_and_model() {
        let resp = to_response(DispatchResult::Failure {
            reason: "http error: 401".to_string(),
            provider: Provider::OpenAI,
            model: "gpt-4o-mini".to_string(),
        });
        assert!(!resp.success);
        assert_eq!(resp.provider, Provider::OpenAI);
        assert_eq!(resp.model, "gpt-4o-mini");
        assert_eq!(resp.error.as_deref(), Some("http error: 401"));
        assert!(resp.message.is_some_and(|m| m.contains("401")));
    }

    #[test]
    fn success_envelope_carries_text() {
        let resp = to_response(DispatchResult::Success {
            text: "XSS is...".to_string(),
            provider: Provider::Anthropic,
            model: "claude-3-5-sonnet-20241022".to_string(),
        });
        assert!(resp.success);
        assert_eq!(resp.message.as_deref(), Some("XSS is..."));
        assert!(resp.error.is_none());
    }
}

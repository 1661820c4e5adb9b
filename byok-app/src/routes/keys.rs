use axum::routing::post;
use axum::Json;
use byok_llm::{available_models, detect_provider, validate_key, KeyValidationResult, Provider};
use serde::{Deserialize, Serialize};

pub fn router() -> axum::Router {
    axum::Router::new()
        .route("/api/keys/detect", post(detect_key))
        .route("/api/keys/validate", post(validate_key_route))
}

#[derive(Debug, Deserialize)]
pub struct DetectKeyRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct DetectKeyResponse {
    pub provider: Provider,
    pub models: Vec<&'static str>,
    /// Shape recognized only; says nothing about whether the key authenticates.
    pub is_valid: bool,
}

#[derive(Debug, Deserialize)]
pub struct ValidateKeyRequest {
    pub api_key: String,
    pub provider: Provider,
}

#[tracing::instrument(level = "info", skip_all)]
async fn detect_key(Json(req): Json<DetectKeyRequest>) -> Json<DetectKeyResponse> {
    let provider = detect_provider(&req.api_key);
    tracing::info!(provider = %provider, key_len = req.api_key.trim().len(), "detected key provider");
    Json(detect_response(provider))
}

#[tracing::instrument(level = "info", skip_all, fields(provider = %req.provider))]
async fn validate_key_route(Json(req): Json<ValidateKeyRequest>) -> Json<KeyValidationResult> {
    Json(validate_key(&req.api_key, req.provider).await)
}

fn detect_response(provider: Provider) -> DetectKeyResponse {
    DetectKeyResponse {
        provider,
        models: available_models(provider).to_vec(),
        is_valid: provider != Provider::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_response_for_openai_lists_catalog() {
        let resp = detect_response(detect_provider("sk-proj-abc123"));
        assert_eq!(resp.provider, Provider::OpenAI);
        assert!(resp.is_valid);
        assert_eq!(resp.models.first(), Some(&"gpt-4o"));
    }

    #[test]
    fn detect_response_for_unknown_is_empty_and_invalid() {
        let resp = detect_response(detect_provider("totally-invalid"));
        assert_eq!(resp.provider, Provider::Unknown);
        assert!(!resp.is_valid);
        assert!(resp.models.is_empty());
    }
}

use axum::routing::get;
use axum::Json;

pub fn router() -> axum::Router {
    axum::Router::new().route("/api/", get(root))
}

#[tracing::instrument(level = "debug", skip_all)]
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "CyberAI Backend - BYOK Cybersecurity Assistant"
    }))
}

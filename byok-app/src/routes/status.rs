use crate::server::AppState;
use axum::routing::{get, post};
use axum::{Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

const STATUS_LIST_LIMIT: usize = 1000;

pub fn router() -> axum::Router {
    axum::Router::new()
        .route("/api/status", post(create_status_check))
        .route("/api/status", get(list_status_checks))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StatusCheckCreate {
    client_name: String,
}

#[tracing::instrument(level = "info", skip_all)]
async fn create_status_check(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<StatusCheckCreate>,
) -> Json<serde_json::Value> {
    match state.status_store.create(req.client_name).await {
        Ok(check) => Json(serde_json::to_value(check).unwrap_or_else(
            |e| serde_json::json!({ "status": "error", "error": e.to_string() }),
        )),
        Err(e) => {
            tracing::error!(error = %e, "status check insert failed");
            Json(serde_json::json!({ "status": "error", "error": e.to_string() }))
        }
    }
}

#[tracing::instrument(level = "debug", skip_all)]
async fn list_status_checks(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<serde_json::Value> {
    match state.status_store.list_recent(STATUS_LIST_LIMIT).await {
        Ok(checks) => Json(serde_json::json!(checks)),
        Err(e) => {
            tracing::error!(error = %e, "status check list failed");
            Json(serde_json::json!({ "status": "error", "error": e.to_string() }))
        }
    }
}

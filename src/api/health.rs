use axum::extract::State;
use axum::Json;

use crate::api::AppState;
use crate::error::AppError;
use crate::store::IndexerState;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Ready once the store answers; reports the per-contract indexer cursors.
pub async fn ready(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let cursors = state.repo.load_cursors().await?;
    Ok(Json(serde_json::json!({
        "status": "ready",
        "cursors": cursors,
    })))
}

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::state::AppState;

/// `GET /api/health` — liveness probe.
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "Server is running",
        "timestamp": Utc::now().to_rfc3339(),
        "uptime": state.started_at.elapsed().as_secs(),
        "environment": state.environment,
    }))
}

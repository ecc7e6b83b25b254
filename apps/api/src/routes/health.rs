use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version. Makes no model calls.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "coach-api"
    }))
}

/// GET /api/v1/models/health
/// Sends a throwaway prompt to every configured model. Slow and billed.
pub async fn models_health_handler(State(state): State<AppState>) -> Json<Value> {
    let models: BTreeMap<String, bool> = state.orchestrator.model_health().await;
    let healthy = models.values().all(|ok| *ok);
    Json(json!({
        "status": if healthy { "ok" } else { "degraded" },
        "models": models
    }))
}

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::monitoring::ServiceMetrics;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PerformanceResponse {
    pub report: String,
    pub services: BTreeMap<String, ServiceMetrics>,
}

#[derive(Debug, Serialize)]
pub struct CostResponse {
    pub report: String,
}

/// GET /api/v1/monitoring/performance
pub async fn handle_performance(State(state): State<AppState>) -> Json<PerformanceResponse> {
    let monitor = state.orchestrator.monitor();
    Json(PerformanceResponse {
        report: monitor.performance_report(),
        services: monitor.snapshot(),
    })
}

/// GET /api/v1/monitoring/cost
pub async fn handle_cost(State(state): State<AppState>) -> Json<CostResponse> {
    Json(CostResponse {
        report: state.orchestrator.monitor().cost_report(),
    })
}

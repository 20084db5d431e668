use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::AppState;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// GET /status
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let cfg = state.alerter.snapshot();

    Json(json!({
        "pair": state.settings.pair,
        "lower_bound": cfg.lower_bound,
        "upper_bound": cfg.upper_bound,
        "alerts_enabled": cfg.alerts_enabled,
        "last_observed_price": cfg.last_observed_price,
        "last_observed_at": cfg.last_observed_at,
        "poll_interval_secs": cfg.poll_interval.as_secs(),
        "monitor": state.alerter.monitor_state(),
    }))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found")
}

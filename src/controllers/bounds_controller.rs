use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::AppState;

// Generous for a single scalar, padded decimals included.
const MAX_BODY_BYTES: usize = 64 * 1024;

fn bad_request(msg: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, msg.into()).into_response()
}

fn success() -> Response {
    (StatusCode::OK, "Success").into_response()
}

/// Rejects non-POST requests and returns the body as text.
async fn read_post_body(req: Request<Body>) -> Result<String, Response> {
    if req.method() != Method::POST {
        return Err(bad_request("Error: Only POST accepted"));
    }

    let bytes = to_bytes(req.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| bad_request(e.to_string()))?;

    String::from_utf8(bytes.to_vec()).map_err(|e| bad_request(e.to_string()))
}

/// Parses a bound, rejecting finite-looking input that overflows to infinity.
pub fn parse_bound(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_infinite() {
        let word = s.trim_start_matches(['+', '-']).to_ascii_lowercase();
        if word != "inf" && word != "infinity" {
            return None;
        }
    }
    Some(v)
}

/// Accepts the same spellings as Go's `strconv.ParseBool`.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

// POST /setUpperPriceBound
pub async fn set_upper_price_bound(State(state): State<AppState>, req: Request<Body>) -> Response {
    let body = match read_post_body(req).await {
        Ok(b) => b,
        Err(res) => return res,
    };

    let Some(upper) = parse_bound(&body) else {
        return bad_request("Error: setUpperBound requires float64");
    };

    state.alerter.set_upper_bound(upper);
    info!(upper, "upper price bound updated");

    success()
}

// POST /setLowerPriceBound
pub async fn set_lower_price_bound(State(state): State<AppState>, req: Request<Body>) -> Response {
    let body = match read_post_body(req).await {
        Ok(b) => b,
        Err(res) => return res,
    };

    let Some(lower) = parse_bound(&body) else {
        return bad_request("Error: setLowerBound requires float64");
    };

    state.alerter.set_lower_bound(lower);
    info!(lower, "lower price bound updated");

    success()
}

// POST /setAlertsEnabled
pub async fn set_alerts_enabled(State(state): State<AppState>, req: Request<Body>) -> Response {
    let body = match read_post_body(req).await {
        Ok(b) => b,
        Err(res) => return res,
    };

    let Some(enabled) = parse_bool(&body) else {
        return bad_request("Error: setAlertsEnabled requires bool");
    };

    state.alerter.set_alerts_enabled(enabled);
    info!(enabled, "alerts toggled");

    success()
}

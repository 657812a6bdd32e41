//! HTTP handlers for the telemetry and pin endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::json;

use crate::actions;
use crate::error::ActionError;
use crate::model::action::MessageData;
use crate::model::pin::{PinConfiguration, PinId};
use crate::web::AppState;

/// Render an action outcome as an HTTP response: bare data on success, a
/// message body with a taxonomy-mapped status on failure.
fn http_response<T: Serialize>(result: Result<T, ActionError>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(error) => {
            let status = match error {
                ActionError::PinNotFound(_) => StatusCode::NOT_FOUND,
                ActionError::NoInputPull | ActionError::NoOutputState => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(MessageData::new(error.to_string()))).into_response()
        }
    }
}

/// Comprehensive system information.
pub async fn get_system(State(state): State<AppState>) -> Response {
    http_response(actions::read_system(state.executor.as_ref()))
}

/// Basic platform information.
pub async fn get_platform() -> Response {
    http_response(actions::read_platform())
}

/// System on chip temperature.
pub async fn get_temperature(State(state): State<AppState>) -> Response {
    http_response(actions::read_temperature(state.executor.as_ref()))
}

/// Past and present throttling.
pub async fn get_throttle(State(state): State<AppState>) -> Response {
    http_response(actions::read_throttle(state.executor.as_ref()))
}

/// System uptime.
pub async fn get_uptime(State(state): State<AppState>) -> Response {
    http_response(actions::read_uptime(state.executor.as_ref()))
}

/// Chip clock frequencies.
pub async fn get_frequency(State(state): State<AppState>) -> Response {
    http_response(actions::read_frequency(state.executor.as_ref()))
}

/// Memory usage.
pub async fn get_memory(State(state): State<AppState>) -> Response {
    http_response(actions::read_memory(state.executor.as_ref()))
}

/// Configurations for every pin on the board.
pub async fn get_pin_configurations(State(state): State<AppState>) -> Response {
    http_response(actions::read_pin_configurations(
        state.pins.as_ref(),
        &PinId::ALL,
    ))
}

/// Configuration for a specific pin by BCM name (e.g. `GPIO17`).
pub async fn get_pin_configuration(
    State(state): State<AppState>,
    Path(bcm_id): Path<String>,
) -> Response {
    match PinId::from_bcm_name(&bcm_id) {
        Some(pin) => http_response(actions::read_pin_configuration(state.pins.as_ref(), pin)),
        None => http_response::<PinConfiguration>(Err(ActionError::PinNotFound(bcm_id))),
    }
}

/// Update the configuration of a specific pin by BCM name.
pub async fn put_pin_configuration(
    State(state): State<AppState>,
    Path(bcm_id): Path<String>,
    Json(configuration): Json<PinConfiguration>,
) -> Response {
    match PinId::from_bcm_name(&bcm_id) {
        Some(pin) => http_response(actions::update_pin_configuration(
            state.pins.as_ref(),
            pin,
            &configuration,
        )),
        None => http_response::<MessageData>(Err(ActionError::PinNotFound(bcm_id))),
    }
}

/// Health check endpoint.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "pi_vitals",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Minimal landing page pointing at the API surface.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Pi Vitals</title>
</head>
<body>
    <h1>Pi Vitals</h1>
    <p>Raspberry Pi telemetry and GPIO control.</p>
    <ul>
        <li><code>GET /system</code> &mdash; aggregate telemetry snapshot</li>
        <li><code>GET /system/{platform,temperature,throttle,uptime,frequency,memory}</code></li>
        <li><code>GET /pins</code>, <code>GET /pins/GPIO17</code>, <code>PUT /pins/GPIO17</code></li>
        <li><code>GET /ws</code> &mdash; WebSocket action protocol</li>
    </ul>
</body>
</html>"#;

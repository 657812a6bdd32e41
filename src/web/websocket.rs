//! WebSocket action protocol.
//!
//! Clients send `{"action": <name>, "params": <optional>}` frames and receive
//! the action result envelope with the action name echoed back. Protocol
//! errors (malformed JSON, missing fields) reply with a null action tag.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::actions;
use crate::error::ActionError;
use crate::model::action::{ActionResult, MessageData};
use crate::model::pin::{PinConfiguration, PinId};
use crate::web::AppState;

/// The available WebSocket actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebSocketAction {
    ReadTemperature,
    ReadThrottle,
    ReadUptime,
    ReadFrequency,
    ReadMemory,
    ReadPinConfigurations,
    UpdatePinConfigurations,
}

impl WebSocketAction {
    fn from_name(name: &str) -> Option<Self> {
        serde_json::from_value(Value::String(name.to_string())).ok()
    }

    fn name(self) -> &'static str {
        match self {
            WebSocketAction::ReadTemperature => "READ_TEMPERATURE",
            WebSocketAction::ReadThrottle => "READ_THROTTLE",
            WebSocketAction::ReadUptime => "READ_UPTIME",
            WebSocketAction::ReadFrequency => "READ_FREQUENCY",
            WebSocketAction::ReadMemory => "READ_MEMORY",
            WebSocketAction::ReadPinConfigurations => "READ_PIN_CONFIGURATIONS",
            WebSocketAction::UpdatePinConfigurations => "UPDATE_PIN_CONFIGURATIONS",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReadPinConfigurationsParams {
    pins: Vec<PinId>,
}

#[derive(Debug, Deserialize)]
struct UpdatePinConfigurationsParams {
    pins: std::collections::BTreeMap<PinId, PinConfiguration>,
}

/// WebSocket upgrade handler.
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    while let Some(message) = socket.recv().await {
        let message = match message {
            Ok(message) => message,
            Err(_) => break,
        };

        match message {
            Message::Text(text) => {
                let reply = dispatch(&state, &text);
                if socket.send(Message::Text(reply.to_string())).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            // Pings are answered by axum; binary frames are ignored.
            _ => {}
        }
    }
}

/// Decode one frame, run the requested action, and build the reply envelope.
fn dispatch(state: &AppState, text: &str) -> Value {
    let frame: Value = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(_) => return protocol_error("Received invalid message"),
    };

    let action = match frame.get("action").and_then(Value::as_str) {
        Some(action) if !action.is_empty() => action,
        _ => return protocol_error("Received message with missing 'action' field"),
    };

    let action = match WebSocketAction::from_name(action) {
        Some(action) => action,
        None => return protocol_error("Received message with invalid 'action' field"),
    };

    let params = frame.get("params").filter(|value| !value.is_null());
    let executor = state.executor.as_ref();

    match action {
        WebSocketAction::ReadTemperature => respond(action, actions::read_temperature(executor)),
        WebSocketAction::ReadThrottle => respond(action, actions::read_throttle(executor)),
        WebSocketAction::ReadUptime => respond(action, actions::read_uptime(executor)),
        WebSocketAction::ReadFrequency => respond(action, actions::read_frequency(executor)),
        WebSocketAction::ReadMemory => respond(action, actions::read_memory(executor)),
        WebSocketAction::ReadPinConfigurations => read_pin_configurations(state, action, params),
        WebSocketAction::UpdatePinConfigurations => {
            update_pin_configurations(state, action, params)
        }
    }
}

fn read_pin_configurations(
    state: &AppState,
    action: WebSocketAction,
    params: Option<&Value>,
) -> Value {
    let params = match params {
        Some(params) => params,
        None => return action_error(action, "Received message with missing 'params' field"),
    };

    let params: ReadPinConfigurationsParams = match serde_json::from_value(params.clone()) {
        Ok(params) => params,
        Err(_) => return action_error(action, "Received message with invalid 'params' field"),
    };

    respond(
        action,
        actions::read_pin_configurations(state.pins.as_ref(), &params.pins),
    )
}

fn update_pin_configurations(
    state: &AppState,
    action: WebSocketAction,
    params: Option<&Value>,
) -> Value {
    let params = match params {
        Some(params) => params,
        None => return action_error(action, "Received message with missing 'params' field"),
    };

    let params: UpdatePinConfigurationsParams = match serde_json::from_value(params.clone()) {
        Ok(params) => params,
        Err(_) => return action_error(action, "Received message with invalid 'params' field"),
    };

    if params.pins.is_empty() {
        return action_error(
            action,
            "At least one pin id and pin configuration must be supplied",
        );
    }

    for (pin, configuration) in &params.pins {
        if let Err(error) =
            actions::update_pin_configuration(state.pins.as_ref(), *pin, configuration)
        {
            return respond::<MessageData>(action, Err(error));
        }
    }

    respond(action, Ok("Pin configurations updated"))
}

fn respond<T: Serialize>(action: WebSocketAction, result: Result<T, ActionError>) -> Value {
    envelope(Some(action.name()), result)
}

fn action_error(action: WebSocketAction, message: &str) -> Value {
    envelope::<()>(Some(action.name()), Err(ActionError::validation(message)))
}

fn protocol_error(message: &str) -> Value {
    envelope::<()>(None, Err(ActionError::validation(message)))
}

fn envelope<T: Serialize>(action: Option<&str>, result: Result<T, ActionError>) -> Value {
    let reply = ActionResult::from(result);
    json!({
        "action": action,
        "success": reply.success,
        "data": reply.data,
        "error": reply.error,
    })
}

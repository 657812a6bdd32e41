//! The uniform success/error envelope returned by every action.

use serde::{Deserialize, Serialize};

use crate::error::ActionError;

/// A simple message wrapped as a data object, used for success confirmations
/// and JSON error bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageData {
    pub message: String,
}

impl MessageData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The result of performing an action, with exactly one of `data` and `error`
/// populated according to `success`.
///
/// Built and discarded per call; the HTTP and WebSocket layers consume it
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<MessageData>,
}

impl<T> ActionResult<T> {
    /// An envelope for a successful action.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// An envelope for a failed action.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(MessageData::new(message)),
        }
    }
}

impl<T> From<Result<T, ActionError>> for ActionResult<T> {
    fn from(result: Result<T, ActionError>) -> Self {
        match result {
            Ok(data) => ActionResult::ok(data),
            Err(error) => ActionResult::error(error.to_string()),
        }
    }
}

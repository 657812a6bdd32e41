//! Error taxonomy for telemetry and pin actions.
//!
//! Every failure is recovered locally into an action result; nothing here is
//! fatal to the process.

use crate::model::pin::PinId;

/// A specialized `Result` type for action functions.
pub type Result<T> = std::result::Result<T, ActionError>;

/// The ways an action can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// An external source was unavailable or returned nothing.
    #[error("{0}")]
    Query(String),

    /// Source output did not match the expected textual shape, or a numeric
    /// conversion failed.
    #[error("{0}")]
    Parse(String),

    /// Structurally parsed values failed a model invariant.
    #[error("{0}")]
    Validation(String),

    /// The hardware cannot address the requested pin.
    #[error("Failed to read unsupported pin `{0}`")]
    UnsupportedPin(PinId),

    /// An input pin configuration was submitted without a pull mode.
    #[error("No pull specified for input pin configuration")]
    NoInputPull,

    /// An output pin configuration was submitted without a state.
    #[error("No state specified for output pin configuration")]
    NoOutputState,

    /// The supplied pin id is not a known BCM pin name.
    #[error("Pin with BCM pin number `{0}` not found")]
    PinNotFound(String),
}

impl ActionError {
    /// Create a new query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Create a new parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

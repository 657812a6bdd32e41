//! Stateless action functions consumed by the HTTP and WebSocket layers.
//!
//! Every action is a single synchronous request/response call returning
//! `Result<T, ActionError>`; the transport layers wrap that into the
//! [`ActionResult`](crate::model::action::ActionResult) envelope.

pub mod pin;
pub mod system;

pub use pin::{read_pin_configuration, read_pin_configurations, update_pin_configuration};
pub use system::{
    read_frequency, read_memory, read_platform, read_system, read_temperature, read_throttle,
    read_uptime,
};

//! # Pi Vitals - Raspberry Pi telemetry and GPIO control
//!
//! Exposes Raspberry Pi board telemetry (temperature, throttle flags, uptime,
//! clock frequency, memory) and GPIO pin configuration through a REST API and
//! a WebSocket action protocol.
//!
//! The core of the crate is the data-acquisition layer: free-form textual
//! output from OS and firmware queries is parsed into strictly-typed,
//! validated records, and GPIO pins are read and updated through a small
//! hardware abstraction. Every operation is a stateless point-in-time read or
//! a single pin write.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pi_vitals::web::{start_server, AppState, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::new("0.0.0.0", 5000);
//!     start_server(config, AppState::new()).await
//! }
//! ```

pub mod actions;
pub mod error;
pub mod exec;
pub mod gpio;
pub mod model;
pub mod web;

// Re-export public API
pub use error::{ActionError, Result};
pub use exec::{CommandExecutor, ProcessExecutor};
pub use gpio::{MockPinDriver, PinDriver, PinDriverError};
pub use model::{
    ActionResult, Frequency, Measurement, Memory, MessageData, PinConfiguration,
    PinConfigurationMap, PinId, PinIo, PinPull, Platform, System, Temperature, Throttle, UpTime,
};
pub use web::{start_server, AppState, ServerConfig};

/// The default web server port
pub const DEFAULT_PORT: u16 = 5000;

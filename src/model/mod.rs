//! Domain models: measurements, telemetry readings, pin configuration, and
//! the action result envelope.

pub mod action;
pub mod measurement;
pub mod pin;
pub mod system;

// Re-export commonly used items
pub use action::{ActionResult, MessageData};
pub use measurement::{FrequencyUnit, InformationUnit, Measurement, TemperatureUnit, UnitPrefix};
pub use pin::{PinConfiguration, PinConfigurationMap, PinId, PinIo, PinPull};
pub use system::{
    Frequency, Memory, OperatingSystem, Platform, System, Temperature, Throttle, UpTime,
};

//! Pin actions: read and update GPIO pin configurations.

use crate::error::{ActionError, Result};
use crate::gpio::{PinDriver, PinDriverError};
use crate::model::action::MessageData;
use crate::model::pin::{PinConfiguration, PinConfigurationMap, PinId, PinIo};

impl From<PinDriverError> for ActionError {
    fn from(error: PinDriverError) -> Self {
        match error {
            PinDriverError::Unsupported(pin) => ActionError::UnsupportedPin(pin),
            PinDriverError::Driver(_) => {
                ActionError::validation("Failed to validate pin configuration")
            }
        }
    }
}

/// Read the current configuration of a single pin.
///
/// Both `state` and `pull` are reported regardless of the pin's direction;
/// the read reflects raw hardware register state.
pub fn read_pin_configuration(driver: &dyn PinDriver, pin: PinId) -> Result<PinConfiguration> {
    Ok(driver.configuration(pin)?)
}

/// Read the configuration of every given pin, in input order.
///
/// Fail-fast: the first read error discards all accumulated results and is
/// returned alone. An empty input yields an empty map without touching the
/// hardware.
pub fn read_pin_configurations(
    driver: &dyn PinDriver,
    pins: &[PinId],
) -> Result<PinConfigurationMap> {
    let mut configurations = PinConfigurationMap::new();
    for &pin in pins {
        configurations.insert(pin, read_pin_configuration(driver, pin)?);
    }
    Ok(configurations)
}

/// Apply a configuration to a pin.
///
/// Input pins require a pull mode and never have their state written; output
/// pins require a state and never have their pull written. Direction is
/// applied before state or pull because a direction change can reset the
/// hardware-latched values.
pub fn update_pin_configuration(
    driver: &dyn PinDriver,
    pin: PinId,
    configuration: &PinConfiguration,
) -> Result<MessageData> {
    driver.probe(pin)?;

    match configuration.io {
        PinIo::Input => {
            let pull = configuration.pull.ok_or(ActionError::NoInputPull)?;
            driver.set_io(pin, PinIo::Input)?;
            driver.set_pull(pin, pull)?;
        }
        PinIo::Output => {
            let state = configuration.state.ok_or(ActionError::NoOutputState)?;
            driver.set_io(pin, PinIo::Output)?;
            driver.set_state(pin, state)?;
        }
    }

    Ok(MessageData::new(format!(
        "Pin configuration for pin `{}` was updated successfully",
        pin
    )))
}

//! Hardware pin abstraction.
//!
//! The real driver talks to the SoC through rppal and is feature-gated so the
//! crate builds on non-Pi hosts; the mock driver keeps an in-memory register
//! file with the same semantics.

use std::sync::Arc;

use crate::model::pin::{PinConfiguration, PinId, PinIo, PinPull};

/// Failures raised by a pin driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PinDriverError {
    /// The platform cannot address this pin.
    #[error("unsupported pin {0}")]
    Unsupported(PinId),

    /// The underlying GPIO peripheral rejected the operation.
    #[error("pin driver error: {0}")]
    Driver(String),
}

/// Per-pin get/set access to direction, logic state, and pull mode.
///
/// The driver is a process-wide singleton resource; this layer performs no
/// locking across calls, so concurrent writers race on the hardware registers
/// unless the caller serializes access.
pub trait PinDriver: Send + Sync {
    /// Check that the pin resolves to a hardware handle.
    fn probe(&self, pin: PinId) -> Result<(), PinDriverError>;

    /// Read the pin's direction plus whatever state and pull the hardware
    /// currently latches, regardless of direction.
    fn configuration(&self, pin: PinId) -> Result<PinConfiguration, PinDriverError>;

    /// Set the pin direction.
    fn set_io(&self, pin: PinId, io: PinIo) -> Result<(), PinDriverError>;

    /// Drive the pin's output state.
    fn set_state(&self, pin: PinId, state: f64) -> Result<(), PinDriverError>;

    /// Apply a pull mode to the pin.
    fn set_pull(&self, pin: PinId, pull: PinPull) -> Result<(), PinDriverError>;
}

/// Build the driver for this process: real GPIO when compiled in and the
/// board cooperates, otherwise the in-memory mock.
pub fn default_driver() -> Arc<dyn PinDriver> {
    #[cfg(feature = "gpio")]
    {
        match raspberry_pi::RppalPinDriver::new() {
            Ok(driver) => return Arc::new(driver),
            Err(err) => {
                tracing::warn!(
                    "Failed Raspberry Pi GPIO initialization ({}), all pin interactions will be mocked",
                    err
                );
            }
        }
    }

    Arc::new(MockPinDriver::new())
}

mod mock {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone, Copy)]
    struct MockPin {
        io: PinIo,
        state: f64,
        pull: PinPull,
    }

    impl Default for MockPin {
        fn default() -> Self {
            Self {
                io: PinIo::Input,
                state: 0.0,
                pull: PinPull::Floating,
            }
        }
    }

    /// An in-memory stand-in for the GPIO peripheral.
    ///
    /// Every registry pin is supported; registers persist for the life of the
    /// driver so reads reflect earlier writes.
    pub struct MockPinDriver {
        pins: Mutex<BTreeMap<PinId, MockPin>>,
    }

    impl MockPinDriver {
        pub fn new() -> Self {
            Self {
                pins: Mutex::new(BTreeMap::new()),
            }
        }

        fn with_pin<T>(&self, pin: PinId, f: impl FnOnce(&mut MockPin) -> T) -> T {
            let mut pins = self.pins.lock().expect("mock pin registers poisoned");
            f(pins.entry(pin).or_default())
        }
    }

    impl Default for MockPinDriver {
        fn default() -> Self {
            Self::new()
        }
    }

    impl PinDriver for MockPinDriver {
        fn probe(&self, _pin: PinId) -> Result<(), PinDriverError> {
            Ok(())
        }

        fn configuration(&self, pin: PinId) -> Result<PinConfiguration, PinDriverError> {
            Ok(self.with_pin(pin, |p| PinConfiguration {
                io: p.io,
                state: Some(p.state),
                pull: Some(p.pull),
            }))
        }

        fn set_io(&self, pin: PinId, io: PinIo) -> Result<(), PinDriverError> {
            self.with_pin(pin, |p| p.io = io);
            Ok(())
        }

        fn set_state(&self, pin: PinId, state: f64) -> Result<(), PinDriverError> {
            self.with_pin(pin, |p| p.state = state);
            Ok(())
        }

        fn set_pull(&self, pin: PinId, pull: PinPull) -> Result<(), PinDriverError> {
            self.with_pin(pin, |p| p.pull = pull);
            Ok(())
        }
    }
}

pub use mock::MockPinDriver;

#[cfg(feature = "gpio")]
mod raspberry_pi {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use rppal::gpio::{Gpio, IoPin, Level, Mode, PullUpDown};

    use super::*;

    /// rppal-backed pin driver.
    ///
    /// Pins are claimed as `IoPin`s on first touch and kept for the life of
    /// the process so output levels stay latched. The SoC does not expose
    /// pull read-back, so the last applied pull mode is tracked here and
    /// reported as floating until a pull is written.
    pub struct RppalPinDriver {
        gpio: Gpio,
        pins: Mutex<HashMap<PinId, IoPin>>,
        pulls: Mutex<HashMap<PinId, PinPull>>,
    }

    impl RppalPinDriver {
        pub fn new() -> Result<Self, rppal::gpio::Error> {
            Ok(Self {
                gpio: Gpio::new()?,
                pins: Mutex::new(HashMap::new()),
                pulls: Mutex::new(HashMap::new()),
            })
        }

        fn with_pin<T>(
            &self,
            pin: PinId,
            f: impl FnOnce(&mut IoPin) -> T,
        ) -> Result<T, PinDriverError> {
            let mut pins = self.pins.lock().expect("gpio pin handles poisoned");
            if let Some(handle) = pins.get_mut(&pin) {
                return Ok(f(handle));
            }

            let handle = self
                .gpio
                .get(pin.bcm_number())
                .map_err(|err| match err {
                    rppal::gpio::Error::PinNotAvailable(_) => PinDriverError::Unsupported(pin),
                    other => PinDriverError::Driver(other.to_string()),
                })?
                .into_io(Mode::Input);
            let handle = pins.entry(pin).or_insert(handle);
            Ok(f(handle))
        }
    }

    impl PinDriver for RppalPinDriver {
        fn probe(&self, pin: PinId) -> Result<(), PinDriverError> {
            self.with_pin(pin, |_| ())
        }

        fn configuration(&self, pin: PinId) -> Result<PinConfiguration, PinDriverError> {
            let (io, state) = self.with_pin(pin, |handle| {
                let io = match handle.mode() {
                    Mode::Output => PinIo::Output,
                    _ => PinIo::Input,
                };
                let state = match handle.read() {
                    Level::High => 1.0,
                    Level::Low => 0.0,
                };
                (io, state)
            })?;

            let pull = self
                .pulls
                .lock()
                .expect("gpio pull cache poisoned")
                .get(&pin)
                .copied()
                .unwrap_or(PinPull::Floating);

            Ok(PinConfiguration {
                io,
                state: Some(state),
                pull: Some(pull),
            })
        }

        fn set_io(&self, pin: PinId, io: PinIo) -> Result<(), PinDriverError> {
            self.with_pin(pin, |handle| {
                handle.set_mode(match io {
                    PinIo::Input => Mode::Input,
                    PinIo::Output => Mode::Output,
                });
            })
        }

        fn set_state(&self, pin: PinId, state: f64) -> Result<(), PinDriverError> {
            self.with_pin(pin, |handle| {
                handle.write(if state == 0.0 { Level::Low } else { Level::High });
            })
        }

        fn set_pull(&self, pin: PinId, pull: PinPull) -> Result<(), PinDriverError> {
            self.with_pin(pin, |handle| {
                handle.set_pullupdown(match pull {
                    PinPull::Floating => PullUpDown::Off,
                    PinPull::Up => PullUpDown::PullUp,
                    PinPull::Down => PullUpDown::PullDown,
                });
            })?;

            self.pulls
                .lock()
                .expect("gpio pull cache poisoned")
                .insert(pin, pull);
            Ok(())
        }
    }
}

#[cfg(feature = "gpio")]
pub use raspberry_pi::RppalPinDriver;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_pins_default_to_floating_inputs() {
        let driver = MockPinDriver::new();
        let config = driver.configuration(PinId::Gpio4).unwrap();
        assert_eq!(config.io, PinIo::Input);
        assert_eq!(config.state, Some(0.0));
        assert_eq!(config.pull, Some(PinPull::Floating));
    }

    #[test]
    fn test_mock_registers_persist() {
        let driver = MockPinDriver::new();
        driver.set_io(PinId::Gpio18, PinIo::Output).unwrap();
        driver.set_state(PinId::Gpio18, 1.0).unwrap();

        let config = driver.configuration(PinId::Gpio18).unwrap();
        assert_eq!(config.io, PinIo::Output);
        assert_eq!(config.state, Some(1.0));
        // The pull register is untouched by direction and state writes.
        assert_eq!(config.pull, Some(PinPull::Floating));
    }

    #[test]
    fn test_mock_probe_supports_every_registry_pin() {
        let driver = MockPinDriver::new();
        for pin in PinId::ALL {
            assert_eq!(driver.probe(pin), Ok(()));
        }
    }
}

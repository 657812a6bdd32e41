//! GPIO pin identifiers and configuration records.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The addressable BCM GPIO pins on the Raspberry Pi header.
///
/// A closed set: unknown textual ids resolve to `None` via
/// [`PinId::from_bcm_name`], never to a coerced value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum PinId {
    Gpio2,
    Gpio3,
    Gpio4,
    Gpio14,
    Gpio15,
    Gpio17,
    Gpio18,
    Gpio27,
    Gpio22,
    Gpio23,
    Gpio24,
    Gpio10,
    Gpio9,
    Gpio25,
    Gpio11,
    Gpio7,
    Gpio5,
    Gpio6,
    Gpio12,
    Gpio13,
    Gpio19,
    Gpio16,
    Gpio26,
    Gpio20,
    Gpio21,
}

impl PinId {
    /// Every addressable pin, in header declaration order.
    pub const ALL: [PinId; 25] = [
        PinId::Gpio2,
        PinId::Gpio3,
        PinId::Gpio4,
        PinId::Gpio14,
        PinId::Gpio15,
        PinId::Gpio17,
        PinId::Gpio18,
        PinId::Gpio27,
        PinId::Gpio22,
        PinId::Gpio23,
        PinId::Gpio24,
        PinId::Gpio10,
        PinId::Gpio9,
        PinId::Gpio25,
        PinId::Gpio11,
        PinId::Gpio7,
        PinId::Gpio5,
        PinId::Gpio6,
        PinId::Gpio12,
        PinId::Gpio13,
        PinId::Gpio19,
        PinId::Gpio16,
        PinId::Gpio26,
        PinId::Gpio20,
        PinId::Gpio21,
    ];

    /// Resolve a BCM pin name such as `"GPIO17"`.
    pub fn from_bcm_name(name: &str) -> Option<PinId> {
        PinId::ALL
            .iter()
            .copied()
            .find(|pin| pin.bcm_name() == name)
    }

    /// The BCM name, e.g. `"GPIO17"`.
    pub fn bcm_name(self) -> &'static str {
        match self {
            PinId::Gpio2 => "GPIO2",
            PinId::Gpio3 => "GPIO3",
            PinId::Gpio4 => "GPIO4",
            PinId::Gpio14 => "GPIO14",
            PinId::Gpio15 => "GPIO15",
            PinId::Gpio17 => "GPIO17",
            PinId::Gpio18 => "GPIO18",
            PinId::Gpio27 => "GPIO27",
            PinId::Gpio22 => "GPIO22",
            PinId::Gpio23 => "GPIO23",
            PinId::Gpio24 => "GPIO24",
            PinId::Gpio10 => "GPIO10",
            PinId::Gpio9 => "GPIO9",
            PinId::Gpio25 => "GPIO25",
            PinId::Gpio11 => "GPIO11",
            PinId::Gpio7 => "GPIO7",
            PinId::Gpio5 => "GPIO5",
            PinId::Gpio6 => "GPIO6",
            PinId::Gpio12 => "GPIO12",
            PinId::Gpio13 => "GPIO13",
            PinId::Gpio19 => "GPIO19",
            PinId::Gpio16 => "GPIO16",
            PinId::Gpio26 => "GPIO26",
            PinId::Gpio20 => "GPIO20",
            PinId::Gpio21 => "GPIO21",
        }
    }

    /// The BCM pin number, e.g. 17 for `GPIO17`.
    pub fn bcm_number(self) -> u8 {
        // The name is always "GPIO" + digits.
        self.bcm_name()[4..].parse().unwrap_or(0)
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bcm_name())
    }
}

/// The io direction of a GPIO pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PinIo {
    Input,
    Output,
}

/// The internal resistor bias applied to an input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PinPull {
    Floating,
    Up,
    Down,
}

/// A pin's io direction, logic state, and pull mode.
///
/// Reads always populate both `state` and `pull` with whatever the hardware
/// currently latches. Updates only honor the field matching `io`: input pins
/// require `pull` and ignore `state`, output pins require `state` and ignore
/// `pull`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinConfiguration {
    pub io: PinIo,
    #[serde(default)]
    pub state: Option<f64>,
    #[serde(default)]
    pub pull: Option<PinPull>,
}

/// Pin configurations keyed by pin id, in pin order.
pub type PinConfigurationMap = BTreeMap<PinId, PinConfiguration>;

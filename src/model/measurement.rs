//! Generic measurement model shared by every numeric reading.

use serde::{Deserialize, Serialize};

/// Standard metric prefixes.
///
/// Only meaningful for information units; frequency and temperature readings
/// carry no prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitPrefix {
    Kilo,
    Mega,
    Giga,
}

/// Temperature units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

/// Frequency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrequencyUnit {
    Hertz,
}

/// Information units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InformationUnit {
    Byte,
}

/// A quantity paired with an optional metric prefix and a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement<U> {
    pub quantity: f64,
    pub prefix: Option<UnitPrefix>,
    pub unit_of_measurement: U,
}

impl<U> Measurement<U> {
    /// Create an unprefixed measurement.
    pub fn new(quantity: f64, unit_of_measurement: U) -> Self {
        Self {
            quantity,
            prefix: None,
            unit_of_measurement,
        }
    }

    /// Create a measurement scaled by a metric prefix.
    pub fn with_prefix(quantity: f64, prefix: UnitPrefix, unit_of_measurement: U) -> Self {
        Self {
            quantity,
            prefix: Some(prefix),
            unit_of_measurement,
        }
    }
}

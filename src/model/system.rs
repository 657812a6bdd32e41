//! Data structures for board telemetry readings.

use serde::{Deserialize, Serialize};

use crate::model::measurement::{FrequencyUnit, InformationUnit, Measurement, TemperatureUnit};

/// System on chip temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Temperature {
    pub system_on_chip: Measurement<TemperatureUnit>,
}

impl Temperature {
    /// Build a celsius reading from the raw milli-degree integer the kernel
    /// thermal zone reports.
    pub fn from_millidegrees_celsius(millidegrees: u64) -> Self {
        Self {
            system_on_chip: Measurement::new(millidegrees as f64 / 1000.0, TemperatureUnit::Celsius),
        }
    }
}

/// Current and historical throttling conditions, one flag per firmware status
/// bit. All flag combinations are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Throttle {
    pub throttling: bool,
    pub throttling_has_occurred: bool,
    pub under_voltage_detected: bool,
    pub under_voltage_has_occurred: bool,
    pub arm_frequency_capped: bool,
    pub arm_frequency_capping_has_occurred: bool,
    pub soft_temperature_limit_active: bool,
    pub soft_temperature_limit_has_occurred: bool,
}

impl Throttle {
    /// Decode the firmware throttle flag field.
    ///
    /// Bits 0-3 report live conditions, bits 16-19 the sticky "has occurred"
    /// counterparts.
    pub fn from_code(code: u32) -> Self {
        Self {
            throttling: is_bit_set(code, 2),
            throttling_has_occurred: is_bit_set(code, 18),
            under_voltage_detected: is_bit_set(code, 0),
            under_voltage_has_occurred: is_bit_set(code, 16),
            arm_frequency_capped: is_bit_set(code, 1),
            arm_frequency_capping_has_occurred: is_bit_set(code, 17),
            soft_temperature_limit_active: is_bit_set(code, 3),
            soft_temperature_limit_has_occurred: is_bit_set(code, 19),
        }
    }
}

pub(crate) fn is_bit_set(value: u32, bit: u8) -> bool {
    value >> bit & 1 == 1
}

/// Seconds since boot plus a human readable rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpTime {
    pub seconds: f64,
    pub formatted: String,
}

impl UpTime {
    /// Wrap an uptime reading, formatting it as `[D day(s), ]H:MM:SS`.
    ///
    /// Seconds are rounded to the nearest whole second before formatting; the
    /// day prefix appears only for durations of a day or more.
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            formatted: format_duration(seconds),
            seconds,
        }
    }
}

fn format_duration(seconds: f64) -> String {
    let total = seconds.round() as u64;
    let days = total / 86_400;
    let rest = total % 86_400;
    let hours = rest / 3_600;
    let minutes = rest % 3_600 / 60;
    let secs = rest % 60;

    match days {
        0 => format!("{}:{:02}:{:02}", hours, minutes, secs),
        1 => format!("1 day, {}:{:02}:{:02}", hours, minutes, secs),
        _ => format!("{} days, {}:{:02}:{:02}", days, hours, minutes, secs),
    }
}

/// ARM and core clock frequencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frequency {
    pub arm: Measurement<FrequencyUnit>,
    pub core: Measurement<FrequencyUnit>,
}

/// Total, free, and available memory in kilobytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub total: Measurement<InformationUnit>,
    pub free: Measurement<InformationUnit>,
    pub available: Measurement<InformationUnit>,
}

/// Operating system identification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingSystem {
    pub name: String,
    pub release: String,
    pub version: String,
}

/// Machine and network identity of the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub machine_type: String,
    pub network_name: String,
    pub operating_system: OperatingSystem,
}

/// Aggregate snapshot of every telemetry reading.
///
/// Built only by the system aggregator; never constructed partially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    pub platform: Platform,
    pub temperature: Temperature,
    pub throttle: Throttle,
    pub uptime: UpTime,
    pub frequency: Frequency,
    pub memory: Memory,
}

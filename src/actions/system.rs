//! Telemetry actions: one parser per metric plus the system aggregator.
//!
//! Every parser follows the same pipeline: query the command executor, match
//! the raw text against the metric's fixed shape, then convert into the typed
//! model. A missing or empty query result is a query error; a shape or
//! numeric conversion mismatch is a parse error. Each call re-queries the
//! source — no caching, no retries.

use sysinfo::System as SysinfoSystem;

use crate::error::{ActionError, Result};
use crate::exec::CommandExecutor;
use crate::model::measurement::{FrequencyUnit, InformationUnit, Measurement, UnitPrefix};
use crate::model::system::{
    Frequency, Memory, OperatingSystem, Platform, System, Temperature, Throttle, UpTime,
};

const TEMPERATURE_QUERY: [&str; 2] = ["cat", "/sys/class/thermal/thermal_zone0/temp"];
const THROTTLE_QUERY: [&str; 2] = ["vcgencmd", "get_throttled"];
const UPTIME_QUERY: [&str; 2] = ["cat", "/proc/uptime"];
const ARM_FREQUENCY_QUERY: [&str; 3] = ["vcgencmd", "measure_clock", "arm"];
const CORE_FREQUENCY_QUERY: [&str; 3] = ["vcgencmd", "measure_clock", "core"];
const MEMORY_QUERY: [&str; 2] = ["cat", "/proc/meminfo"];

/// Read every system status into one aggregate snapshot.
///
/// Sub-readings run in a fixed order and the first failure is returned
/// immediately; no partial aggregate is ever produced.
pub fn read_system(executor: &dyn CommandExecutor) -> Result<System> {
    Ok(System {
        platform: read_platform()?,
        temperature: read_temperature(executor)?,
        throttle: read_throttle(executor)?,
        uptime: read_uptime(executor)?,
        frequency: read_frequency(executor)?,
        memory: read_memory(executor)?,
    })
}

/// Read machine type, network name, and operating system identification.
pub fn read_platform() -> Result<Platform> {
    let unknown = || "unknown".to_string();

    Ok(Platform {
        machine_type: SysinfoSystem::cpu_arch()
            .unwrap_or_else(|| std::env::consts::ARCH.to_string()),
        network_name: SysinfoSystem::host_name().unwrap_or_else(unknown),
        operating_system: OperatingSystem {
            name: SysinfoSystem::name().unwrap_or_else(unknown),
            release: SysinfoSystem::kernel_version().unwrap_or_else(unknown),
            version: SysinfoSystem::os_version().unwrap_or_else(unknown),
        },
    })
}

/// Read the system on chip temperature from the kernel thermal zone.
pub fn read_temperature(executor: &dyn CommandExecutor) -> Result<Temperature> {
    // The thermal zone reports milli-degrees celsius, e.g. '48534'
    let output = query(executor, &TEMPERATURE_QUERY)
        .ok_or_else(|| ActionError::query("Failed to query system on chip temperature"))?;

    // Leading zeros and surrounding whitespace are tolerated, signs are not
    let millidegrees: u64 = output
        .trim()
        .parse()
        .map_err(|_| ActionError::parse("Failed to parse system on chip temperature query"))?;

    Ok(Temperature::from_millidegrees_celsius(millidegrees))
}

/// Read the firmware throttle flag field.
pub fn read_throttle(executor: &dyn CommandExecutor) -> Result<Throttle> {
    // The firmware reports e.g. 'throttled=0x50000'
    let output = query(executor, &THROTTLE_QUERY)
        .ok_or_else(|| ActionError::query("Failed to query system throttle status"))?;

    let code = parse_throttle_code(&output)
        .ok_or_else(|| ActionError::parse("Failed to parse system throttle status query"))?;

    Ok(Throttle::from_code(code))
}

fn parse_throttle_code(output: &str) -> Option<u32> {
    let line = output.strip_suffix('\n').unwrap_or(output);
    let hex = line.strip_prefix("throttled=0x")?;
    if hex.is_empty() || hex.len() > 5 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Read seconds since boot from the kernel.
pub fn read_uptime(executor: &dyn CommandExecutor) -> Result<UpTime> {
    // The kernel reports uptime and idle seconds, e.g. '1648.26 5522.57'
    let output = query(executor, &UPTIME_QUERY)
        .ok_or_else(|| ActionError::query("Failed to query system uptime"))?;

    let seconds = parse_uptime_seconds(&output)
        .ok_or_else(|| ActionError::parse("Failed to parse system uptime query"))?;

    Ok(UpTime::from_seconds(seconds))
}

fn parse_uptime_seconds(output: &str) -> Option<f64> {
    let mut fields = output.split_whitespace();
    let uptime = fields.next()?;
    let idle = fields.next()?;
    if !is_unsigned_decimal(uptime) || !is_unsigned_decimal(idle) {
        return None;
    }
    uptime.parse().ok()
}

// Digits, optionally followed by a point and more digits. No signs, no
// exponents, no leading point.
fn is_unsigned_decimal(text: &str) -> bool {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };
    !whole.is_empty()
        && whole.chars().all(|c| c.is_ascii_digit())
        && fraction.chars().all(|c| c.is_ascii_digit())
}

/// Read the ARM and core clock frequencies from the firmware.
pub fn read_frequency(executor: &dyn CommandExecutor) -> Result<Frequency> {
    // The firmware reports e.g. 'frequency(45)=600000000'; the parenthesized
    // index is a firmware register number and is discarded
    let arm_output = query(executor, &ARM_FREQUENCY_QUERY)
        .ok_or_else(|| ActionError::query("Failed to query system ARM frequency"))?;
    let core_output = query(executor, &CORE_FREQUENCY_QUERY)
        .ok_or_else(|| ActionError::query("Failed to query system core frequency"))?;

    let parse_error = || ActionError::parse("Failed to parse system frequency query");
    let arm_hertz = parse_frequency_hertz(&arm_output).ok_or_else(parse_error)?;
    let core_hertz = parse_frequency_hertz(&core_output).ok_or_else(parse_error)?;

    Ok(Frequency {
        arm: Measurement::new(arm_hertz, FrequencyUnit::Hertz),
        core: Measurement::new(core_hertz, FrequencyUnit::Hertz),
    })
}

fn parse_frequency_hertz(output: &str) -> Option<f64> {
    let line = output.strip_suffix('\n').unwrap_or(output);
    let rest = line.strip_prefix("frequency(")?;
    let (index, rest) = rest.split_once(')')?;
    if index.is_empty() || index.len() > 2 || !index.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let digits = rest.strip_prefix('=')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Read total, free, and available memory from the kernel.
pub fn read_memory(executor: &dyn CommandExecutor) -> Result<Memory> {
    // The kernel reports labeled kilobyte lines, e.g. 'MemTotal:  948280 kB'
    let output = query(executor, &MEMORY_QUERY)
        .ok_or_else(|| ActionError::query("Failed to query system memory"))?;

    let parse_error = || ActionError::parse("Failed to parse system memory query");
    let total_kb = meminfo_kilobytes(&output, "MemTotal:").ok_or_else(parse_error)?;
    let free_kb = meminfo_kilobytes(&output, "MemFree:").ok_or_else(parse_error)?;
    let available_kb = meminfo_kilobytes(&output, "MemAvailable:").ok_or_else(parse_error)?;

    let kilobytes =
        |quantity| Measurement::with_prefix(quantity, UnitPrefix::Kilo, InformationUnit::Byte);
    Ok(Memory {
        total: kilobytes(total_kb),
        free: kilobytes(free_kb),
        available: kilobytes(available_kb),
    })
}

// Finds `<label> <digits> kB` anywhere in the output, tolerating leading
// zeros and arbitrary (but mandatory) whitespace runs.
fn meminfo_kilobytes(output: &str, label: &str) -> Option<f64> {
    let rest = &output[output.find(label)? + label.len()..];

    let rest = skip_whitespace(rest)?;
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let (digits, rest) = rest.split_at(digits_end);

    let rest = skip_whitespace(rest)?;
    if !rest.starts_with("kB") {
        return None;
    }

    digits.parse::<u64>().ok().map(|kb| kb as f64)
}

// At least one whitespace character, returning what follows.
fn skip_whitespace(text: &str) -> Option<&str> {
    let trimmed = text.trim_start();
    (trimmed.len() < text.len()).then_some(trimmed)
}

// Empty output counts as a query failure; whitespace-only output is passed
// through so it fails in the parser instead.
fn query(executor: &dyn CommandExecutor, args: &[&str]) -> Option<String> {
    executor.output(args).filter(|output| !output.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Serves canned output per argument vector and counts queries.
    pub(crate) struct StaticExecutor {
        outputs: HashMap<Vec<String>, String>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl StaticExecutor {
        pub(crate) fn new() -> Self {
            Self {
                outputs: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn with(mut self, args: &[&str], output: &str) -> Self {
            self.outputs.insert(
                args.iter().map(|s| s.to_string()).collect(),
                output.to_string(),
            );
            self
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl CommandExecutor for StaticExecutor {
        fn output(&self, args: &[&str]) -> Option<String> {
            let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
            self.calls.lock().unwrap().push(args.clone());
            self.outputs.get(&args).cloned()
        }
    }

    fn temperature_executor(output: &str) -> StaticExecutor {
        StaticExecutor::new().with(&TEMPERATURE_QUERY, output)
    }

    #[test]
    fn test_temperature_converts_millidegrees() {
        let temperature = read_temperature(&temperature_executor("20000")).unwrap();
        assert_eq!(temperature.system_on_chip.quantity, 20.0);
        assert_eq!(temperature.system_on_chip.prefix, None);

        let temperature = read_temperature(&temperature_executor("1")).unwrap();
        assert_eq!(temperature.system_on_chip.quantity, 0.001);
    }

    #[test]
    fn test_temperature_tolerates_leading_zeros_and_newline() {
        let temperature = read_temperature(&temperature_executor("0102")).unwrap();
        assert_eq!(temperature.system_on_chip.quantity, 0.102);

        let temperature = read_temperature(&temperature_executor("48534\n")).unwrap();
        assert_eq!(temperature.system_on_chip.quantity, 48.534);
    }

    #[test]
    fn test_temperature_query_failure() {
        let error = read_temperature(&StaticExecutor::new()).unwrap_err();
        assert_eq!(
            error,
            ActionError::query("Failed to query system on chip temperature")
        );

        // Empty output is a query failure, never a parse failure.
        let error = read_temperature(&temperature_executor("")).unwrap_err();
        assert!(matches!(error, ActionError::Query(_)));
    }

    #[test]
    fn test_temperature_parse_failure() {
        for bad in ["abc", "-20000", "20.5", "20000 extra"] {
            let error = read_temperature(&temperature_executor(bad)).unwrap_err();
            assert_eq!(
                error,
                ActionError::parse("Failed to parse system on chip temperature query"),
                "input {:?}",
                bad
            );
        }
    }

    fn throttle_executor(output: &str) -> StaticExecutor {
        StaticExecutor::new().with(&THROTTLE_QUERY, output)
    }

    #[test]
    fn test_throttle_decodes_flag_field() {
        let throttle = read_throttle(&throttle_executor("throttled=0x50005\n")).unwrap();
        assert!(throttle.under_voltage_detected);
        assert!(throttle.throttling);
        assert!(!throttle.arm_frequency_capped);
        assert!(throttle.under_voltage_has_occurred);
        assert!(throttle.throttling_has_occurred);
        assert!(!throttle.arm_frequency_capping_has_occurred);
    }

    #[test]
    fn test_throttle_zero_code() {
        let throttle = read_throttle(&throttle_executor("throttled=0x0")).unwrap();
        assert_eq!(throttle, Throttle::from_code(0));
    }

    #[test]
    fn test_throttle_query_failure() {
        let error = read_throttle(&StaticExecutor::new()).unwrap_err();
        assert_eq!(
            error,
            ActionError::query("Failed to query system throttle status")
        );
        let error = read_throttle(&throttle_executor("")).unwrap_err();
        assert!(matches!(error, ActionError::Query(_)));
    }

    #[test]
    fn test_throttle_parse_failure() {
        // More than five hex digits, missing prefix, or stray characters.
        for bad in [
            "throttled=0x123456",
            "throttled=0x",
            "throttled=50000",
            "0x50000",
            "throttled=0xZZ",
            "throttled=0x50000 ",
        ] {
            let error = read_throttle(&throttle_executor(bad)).unwrap_err();
            assert_eq!(
                error,
                ActionError::parse("Failed to parse system throttle status query"),
                "input {:?}",
                bad
            );
        }
    }

    fn uptime_executor(output: &str) -> StaticExecutor {
        StaticExecutor::new().with(&UPTIME_QUERY, output)
    }

    #[test]
    fn test_uptime_uses_first_field() {
        let uptime = read_uptime(&uptime_executor("1648.26 5522.57\n")).unwrap();
        assert_eq!(uptime.seconds, 1648.26);
        assert_eq!(uptime.formatted, "0:27:28");
    }

    #[test]
    fn test_uptime_whole_seconds() {
        let uptime = read_uptime(&uptime_executor("86400 172800")).unwrap();
        assert_eq!(uptime.formatted, "1 day, 0:00:00");
    }

    #[test]
    fn test_uptime_failures() {
        let error = read_uptime(&StaticExecutor::new()).unwrap_err();
        assert_eq!(error, ActionError::query("Failed to query system uptime"));

        for bad in ["1648.26", "up 5522.57", "-1 5522.57"] {
            let error = read_uptime(&uptime_executor(bad)).unwrap_err();
            assert_eq!(
                error,
                ActionError::parse("Failed to parse system uptime query"),
                "input {:?}",
                bad
            );
        }
    }

    fn frequency_executor(arm: &str, core: &str) -> StaticExecutor {
        StaticExecutor::new()
            .with(&ARM_FREQUENCY_QUERY, arm)
            .with(&CORE_FREQUENCY_QUERY, core)
    }

    #[test]
    fn test_frequency_reads_both_clocks() {
        let frequency =
            read_frequency(&frequency_executor("frequency(45)=600000\n", "frequency(1)=400000\n"))
                .unwrap();
        assert_eq!(frequency.arm.quantity, 600000.0);
        assert_eq!(frequency.core.quantity, 400000.0);
        assert_eq!(frequency.arm.prefix, None);
        assert_eq!(frequency.core.prefix, None);
    }

    #[test]
    fn test_frequency_query_failures_name_the_clock() {
        let error = read_frequency(&StaticExecutor::new()).unwrap_err();
        assert_eq!(
            error,
            ActionError::query("Failed to query system ARM frequency")
        );

        let executor = StaticExecutor::new().with(&ARM_FREQUENCY_QUERY, "frequency(45)=600000000");
        let error = read_frequency(&executor).unwrap_err();
        assert_eq!(
            error,
            ActionError::query("Failed to query system core frequency")
        );
    }

    #[test]
    fn test_frequency_parse_failures() {
        for bad in [
            "frequency(456)=600000000",
            "frequency()=600000000",
            "frequency(45)=",
            "frequency(45)=600 extra",
            "600000000",
        ] {
            let executor = frequency_executor(bad, "frequency(1)=400000000");
            let error = read_frequency(&executor).unwrap_err();
            assert_eq!(
                error,
                ActionError::parse("Failed to parse system frequency query"),
                "input {:?}",
                bad
            );
        }
    }

    fn memory_executor(output: &str) -> StaticExecutor {
        StaticExecutor::new().with(&MEMORY_QUERY, output)
    }

    #[test]
    fn test_memory_reads_labeled_fields() {
        let output = "MemTotal:         948280 kB\n\
                      MemFree:          603056 kB\n\
                      MemAvailable:     771196 kB\n\
                      Buffers:           45678 kB\n";
        let memory = read_memory(&memory_executor(output)).unwrap();
        assert_eq!(memory.total.quantity, 948280.0);
        assert_eq!(memory.free.quantity, 603056.0);
        assert_eq!(memory.available.quantity, 771196.0);
        assert_eq!(memory.total.prefix, Some(UnitPrefix::Kilo));
        assert_eq!(memory.total.unit_of_measurement, InformationUnit::Byte);
    }

    #[test]
    fn test_memory_tolerates_padding_and_single_line_output() {
        let output = "MemTotal: 012 kB MemFree: 340 kB MemAvailable: 0560 kB";
        let memory = read_memory(&memory_executor(output)).unwrap();
        assert_eq!(memory.total.quantity, 12.0);
        assert_eq!(memory.free.quantity, 340.0);
        assert_eq!(memory.available.quantity, 560.0);
    }

    #[test]
    fn test_memory_requires_all_three_fields() {
        let output = "MemTotal: 948280 kB\nMemFree: 603056 kB\n";
        let error = read_memory(&memory_executor(output)).unwrap_err();
        assert_eq!(error, ActionError::parse("Failed to parse system memory query"));
    }

    #[test]
    fn test_memory_rejects_malformed_fields() {
        for bad in [
            // Missing whitespace between digits and unit.
            "MemTotal: 948280kB MemFree: 603056 kB MemAvailable: 771196 kB",
            // Missing whitespace after the label.
            "MemTotal:948280 kB MemFree: 603056 kB MemAvailable: 771196 kB",
            // Wrong unit.
            "MemTotal: 948280 MB MemFree: 603056 kB MemAvailable: 771196 kB",
        ] {
            let error = read_memory(&memory_executor(bad)).unwrap_err();
            assert!(matches!(error, ActionError::Parse(_)), "input {:?}", bad);
        }
    }

    #[test]
    fn test_memory_query_failure() {
        let error = read_memory(&StaticExecutor::new()).unwrap_err();
        assert_eq!(error, ActionError::query("Failed to query system memory"));
    }

    #[test]
    fn test_platform_reads_without_subprocess() {
        let platform = read_platform().unwrap();
        assert!(!platform.machine_type.is_empty());
        assert!(!platform.operating_system.name.is_empty());
    }

    #[test]
    fn test_system_aggregation() {
        let executor = StaticExecutor::new()
            .with(&TEMPERATURE_QUERY, "48534\n")
            .with(&THROTTLE_QUERY, "throttled=0x0\n")
            .with(&UPTIME_QUERY, "1648.26 5522.57\n")
            .with(&ARM_FREQUENCY_QUERY, "frequency(45)=600000000\n")
            .with(&CORE_FREQUENCY_QUERY, "frequency(1)=400000000\n")
            .with(&MEMORY_QUERY, "MemTotal: 948280 kB\nMemFree: 603056 kB\nMemAvailable: 771196 kB\n");

        let system = read_system(&executor).unwrap();
        assert_eq!(system.temperature.system_on_chip.quantity, 48.534);
        assert_eq!(system.uptime.formatted, "0:27:28");
        assert_eq!(system.frequency.arm.quantity, 600000000.0);
        assert_eq!(system.memory.available.quantity, 771196.0);
    }

    #[test]
    fn test_system_aggregation_fails_fast() {
        // Temperature is the first executor-backed reading; its failure must
        // be reported verbatim and later metrics never queried.
        let executor = StaticExecutor::new();
        let error = read_system(&executor).unwrap_err();
        assert_eq!(
            error,
            ActionError::query("Failed to query system on chip temperature")
        );
        assert_eq!(executor.call_count(), 1);
    }
}

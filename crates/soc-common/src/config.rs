//! Configuration structures for the platform devices.
//!
//! Supports TOML deserialization with defaults matching a BCM2711
//! board (Raspberry Pi 4), and explicit values for other boards.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Compatible string of the firmware-driven CPU clock.
pub const CPU_CLOCK_COMPATIBLE: &str = "raspberrypi,bcm2835-cpu";

/// Compatible string of the AVS ring-oscillator thermal sensor.
pub const THERMAL_COMPATIBLE: &str = "brcm,bcm2711-thermal";

/// Firmware clock identifier of the ARM core clock.
pub const ARM_CLOCK_ID: u32 = 0x0000_0003;

/// Top-level platform configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// CPU clock device.
    pub clock: CpuClockConfig,

    /// Thermal sensor device.
    pub thermal: ThermalConfig,

    /// Simulated firmware model.
    pub firmware: FirmwareConfig,
}

/// CPU clock device description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuClockConfig {
    /// Human-readable clock name (the device node name).
    pub name: String,

    /// Device compatible string.
    pub compatible: String,

    /// Firmware clock identifier carried in every property message.
    ///
    /// Any id is accepted here; the simulated firmware only serves [`ARM_CLOCK_ID`].
    pub clock_id: u32,
}

impl Default for CpuClockConfig {
    fn default() -> Self {
        Self {
            name: String::from("cpu_clock"),
            compatible: String::from(CPU_CLOCK_COMPATIBLE),
            clock_id: ARM_CLOCK_ID,
        }
    }
}

/// Thermal sensor device description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalConfig {
    /// Device compatible string.
    pub compatible: String,

    /// Millidegrees Celsius per ADC code unit.
    pub slope: i32,

    /// Millidegrees Celsius bias.
    pub offset: i32,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        // BCM2711 thermal zone coefficients.
        Self {
            compatible: String::from(THERMAL_COMPATIBLE),
            slope: -487,
            offset: 410_040,
        }
    }
}

/// Parameters of the in-process firmware model used by tests and `socctl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmwareConfig {
    /// ARM clock rate reported before any SET request.
    pub initial_rate_hz: u32,

    /// Lowest rate the firmware will apply.
    pub min_rate_hz: u32,

    /// Highest rate the firmware will apply.
    pub max_rate_hz: u32,

    /// Granularity the firmware rounds applied rates down to (0 disables rounding).
    pub rate_step_hz: u32,

    /// Deadline reported when the firmware is made to stall.
    #[serde(with = "humantime_serde")]
    pub response_timeout: Duration,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            initial_rate_hz: 1_500_000_000,
            min_rate_hz: 600_000_000,
            max_rate_hz: 1_500_000_000,
            rate_step_hz: 1_000_000,
            response_timeout: Duration::from_secs(1),
        }
    }
}

impl PlatformConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or fails validation.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Check cross-field constraints serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock.name.is_empty() {
            return Err(ConfigError::Invalid("clock.name must not be empty".into()));
        }
        let fw = &self.firmware;
        if fw.min_rate_hz > fw.max_rate_hz {
            return Err(ConfigError::Invalid(format!(
                "firmware.min_rate_hz ({}) exceeds firmware.max_rate_hz ({})",
                fw.min_rate_hz, fw.max_rate_hz
            )));
        }
        if !(fw.min_rate_hz..=fw.max_rate_hz).contains(&fw.initial_rate_hz) {
            return Err(ConfigError::Invalid(format!(
                "firmware.initial_rate_hz ({}) outside [{}, {}]",
                fw.initial_rate_hz, fw.min_rate_hz, fw.max_rate_hz
            )));
        }
        Ok(())
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Semantically invalid configuration.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// `Duration` fields written as human-readable strings such as `"250ms"`.
mod humantime_serde {
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        humantime::format_duration(*duration)
            .to_string()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        String::deserialize(deserializer)?
            .parse::<humantime::Duration>()
            .map(Into::into)
            .map_err(de::Error::custom)
    }
}

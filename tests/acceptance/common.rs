//! Common utilities for acceptance tests.
//!
//! Provides helpers for:
//! - Writing configuration files into a scratch directory
//! - Building a bound clock on top of simulated firmware

#![allow(dead_code)] // Not every scenario uses every helper

use soc_clk::{probe_cpu_clock, ClockHandle, SimulatedFirmware, SimulatedFirmwareNode};
use soc_common::config::PlatformConfig;
use soc_common::state::{DeviceBinding, DeviceState};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Configuration used by the scenarios: a narrower rate window than the
/// defaults, so clamping is visible.
pub const SCENARIO_CONFIG: &str = r#"
[clock]
name = "cpu"

[thermal]
slope = -487
offset = 410040

[firmware]
initial_rate_hz = 1200000000
min_rate_hz = 600000000
max_rate_hz = 1800000000
rate_step_hz = 50000000
response_timeout = "20ms"
"#;

/// Write `content` as `platform.toml` inside a fresh temporary directory.
///
/// The directory is removed when the returned guard is dropped.
pub fn write_config(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("platform.toml");
    std::fs::write(&path, content).expect("write config");
    (dir, path)
}

/// Load the scenario configuration through the file path.
pub fn scenario_config() -> PlatformConfig {
    let (_dir, path) = write_config(SCENARIO_CONFIG);
    PlatformConfig::from_file(&path).expect("load scenario config")
}

/// Simulated firmware plus a bound clock using it.
pub struct ClockRig {
    pub firmware: Arc<SimulatedFirmware>,
    pub clock: ClockHandle,
    pub binding: DeviceBinding,
}

/// Bind the configured clock against ready simulated firmware.
pub fn bind_clock(config: &PlatformConfig) -> ClockRig {
    let firmware = Arc::new(SimulatedFirmware::new(config.firmware.clone()));
    let node = SimulatedFirmwareNode::ready(Arc::clone(&firmware));
    let mut binding = DeviceBinding::new(config.clock.name.clone());

    let clock = binding
        .probe_with(|| probe_cpu_clock(&config.clock, &node))
        .expect("clock probe");
    assert_eq!(binding.state(), DeviceState::Bound);

    ClockRig {
        firmware,
        clock,
        binding,
    }
}

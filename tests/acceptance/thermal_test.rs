//! Thermal sensor acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - Valid readings convert with the configured calibration
//! - Readings never go below zero
//! - Invalid snapshots are reported, not retried
//! - The sensor clock runs exactly while the device is bound

use super::common::{scenario_config, write_config};
use soc_common::config::PlatformConfig;
use soc_common::error::{ProbeError, SensorError};
use soc_common::state::{DeviceBinding, DeviceState};
use soc_thermal::{
    SimulatedClockGate, SimulatedRegister, TemperatureSource, ThermalDevice, ThermalStatusWord,
    STATUS_DATA_MASK,
};

#[test]
fn test_bcm2711_reading() {
    let config = scenario_config();
    let reg = SimulatedRegister::new(ThermalStatusWord::valid_with_code(760).raw());
    let device =
        ThermalDevice::probe(&config.thermal, &reg, Box::new(SimulatedClockGate::new())).unwrap();

    assert_eq!(device.read_temperature(), Ok(39_920));
}

#[test]
fn test_calibration_from_config_file() {
    let (_dir, path) = write_config("[thermal]\nslope = 500\noffset = -200000\n");
    let config = PlatformConfig::from_file(&path).unwrap();
    let reg = SimulatedRegister::new(ThermalStatusWord::valid_with_code(0x3FF).raw());
    let device =
        ThermalDevice::probe(&config.thermal, &reg, Box::new(SimulatedClockGate::new())).unwrap();

    assert_eq!(device.read_temperature(), Ok(311_500));

    // Cold end clamps to zero
    reg.set(ThermalStatusWord::valid_with_code(0).raw());
    assert_eq!(device.read_temperature(), Ok(0));
}

#[test]
fn test_every_code_is_non_negative_and_bounded() {
    let config = scenario_config();
    let reg = SimulatedRegister::default();
    let device =
        ThermalDevice::probe(&config.thermal, &reg, Box::new(SimulatedClockGate::new())).unwrap();

    for code in 0..=STATUS_DATA_MASK {
        let code = u16::try_from(code).unwrap();
        reg.set(ThermalStatusWord::valid_with_code(code).raw());
        let t = device.read_temperature().unwrap();
        assert!(t <= 410_040, "code {code}: {t}");
    }
}

#[test]
fn test_invalid_snapshot_is_surfaced() {
    let config = scenario_config();
    let reg = SimulatedRegister::new(0x0000_0064);
    let device =
        ThermalDevice::probe(&config.thermal, &reg, Box::new(SimulatedClockGate::new())).unwrap();
    let source: &dyn TemperatureSource = &device;

    assert_eq!(
        source.read_temperature(),
        Err(SensorError::InvalidReading { raw: 0x64 })
    );
    assert_eq!(reg.reads(), 1);
}

#[test]
fn test_clock_tracks_binding_lifetime() {
    let config = scenario_config();
    let reg = SimulatedRegister::new(ThermalStatusWord::valid_with_code(500).raw());
    let gate = SimulatedClockGate::new();
    gate.fail_next_enable(ProbeError::NotReady("clock provider".into()));

    let mut binding = DeviceBinding::new("thermal");
    assert!(binding
        .probe_with(|| ThermalDevice::probe(&config.thermal, &reg, Box::new(gate.clone())))
        .is_err());
    assert_eq!(binding.state(), DeviceState::Deferred);
    assert!(!gate.is_enabled());

    let device = binding
        .probe_with(|| ThermalDevice::probe(&config.thermal, &reg, Box::new(gate.clone())))
        .unwrap();
    assert_eq!(binding.state(), DeviceState::Bound);
    assert!(gate.is_enabled());
    assert_eq!(device.read_temperature(), Ok(166_540));

    drop(device);
    binding.unbind().unwrap();
    assert!(!gate.is_enabled());
    assert_eq!(gate.enable_count(), 1);
}

//! Command implementations.
//!
//! Each command probes the device it needs through a [`DeviceBinding`],
//! performs one operation and renders the result.

use anyhow::{ensure, Context, Result};
use soc_clk::{probe_cpu_clock, ClockHandle, SimulatedFirmware, SimulatedFirmwareNode};
use soc_common::config::{PlatformConfig, ARM_CLOCK_ID};
use soc_common::state::DeviceBinding;
use soc_thermal::{SimulatedClockGate, SimulatedRegister, ThermalDevice, ThermalStatusWord};
use std::sync::Arc;
use tracing::debug;

/// Status word loaded into the simulated register when none is given.
const DEFAULT_STATUS_CODE: u16 = 760;

fn bind_clock(config: &PlatformConfig) -> Result<ClockHandle> {
    // The simulated firmware only models the ARM core clock.
    ensure!(
        config.clock.clock_id == ARM_CLOCK_ID,
        "clock.clock_id {} is not served by the simulated firmware (only {ARM_CLOCK_ID})",
        config.clock.clock_id
    );

    let firmware = Arc::new(SimulatedFirmware::new(config.firmware.clone()));
    let node = SimulatedFirmwareNode::ready(firmware);

    let mut binding = DeviceBinding::new(config.clock.name.clone());
    binding
        .probe_with(|| probe_cpu_clock(&config.clock, &node))
        .with_context(|| format!("Failed to probe clock {:?}", config.clock.name))
}

/// `clock get`
pub fn clock_get(config: &PlatformConfig) -> Result<String> {
    let clock = bind_clock(config)?;
    let hz = clock
        .get_rate()
        .with_context(|| format!("Failed to read rate of {}", clock.name()))?;
    Ok(hz.to_string())
}

/// `clock set <HZ>`
pub fn clock_set(config: &PlatformConfig, requested_hz: u32) -> Result<String> {
    let clock = bind_clock(config)?;
    let applied = clock
        .set_rate(requested_hz)
        .with_context(|| format!("Failed to set rate of {} to {requested_hz} Hz", clock.name()))?;
    if applied != requested_hz {
        debug!(requested_hz, applied_hz = applied, "Firmware adjusted requested rate");
    }
    Ok(applied.to_string())
}

/// `clock round <HZ>`
pub fn clock_round(config: &PlatformConfig, requested_hz: u32) -> Result<String> {
    let clock = bind_clock(config)?;
    Ok(clock.round_rate(requested_hz).to_string())
}

/// `thermal read [--raw <WORD>]`
pub fn thermal_read(config: &PlatformConfig, raw: Option<u32>) -> Result<String> {
    let raw = raw.unwrap_or_else(|| ThermalStatusWord::valid_with_code(DEFAULT_STATUS_CODE).raw());
    let register = SimulatedRegister::new(raw);
    debug!(status = %ThermalStatusWord::from_raw(raw), "Loaded simulated status register");

    let mut binding = DeviceBinding::new("thermal");
    let device = binding
        .probe_with(|| {
            ThermalDevice::probe(
                &config.thermal,
                &register,
                Box::new(SimulatedClockGate::new()),
            )
        })
        .context("Failed to probe thermal sensor")?;

    let millicelsius = device
        .read_temperature()
        .with_context(|| format!("Failed to read temperature (status 0x{raw:08X})"))?;
    Ok(millicelsius.to_string())
}

//! Probe ordering acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - A platform without firmware fails the clock probe permanently
//! - Firmware that is still initializing defers the probe
//! - A deferred probe binds once the firmware is ready

use super::common::scenario_config;
use soc_clk::{probe_cpu_clock, SimulatedFirmware, SimulatedFirmwareNode};
use soc_common::error::{PlatformError, ProbeError};
use soc_common::state::{DeviceBinding, DeviceState};
use std::sync::Arc;

#[test]
fn test_missing_firmware_fails_binding() {
    let config = scenario_config();
    let node = SimulatedFirmwareNode::missing();
    let mut binding = DeviceBinding::new(config.clock.name.clone());

    let result = binding.probe_with(|| probe_cpu_clock(&config.clock, &node));
    assert!(matches!(
        result,
        Err(PlatformError::Probe(ProbeError::DependencyUnavailable(_)))
    ));
    assert_eq!(binding.state(), DeviceState::Failed);

    // A failed device is not probed again
    assert!(matches!(
        binding.probe_with(|| probe_cpu_clock(&config.clock, &node)),
        Err(PlatformError::InvalidStateTransition { .. })
    ));
    assert_eq!(binding.probe_attempts(), 1);
}

#[test]
fn test_deferred_probe_binds_when_firmware_ready() {
    let config = scenario_config();
    let firmware = Arc::new(SimulatedFirmware::new(config.firmware.clone()));
    let node = SimulatedFirmwareNode::ready_after(Arc::clone(&firmware), 2);
    let mut binding = DeviceBinding::new(config.clock.name.clone());

    let clock = loop {
        match binding.probe_with(|| probe_cpu_clock(&config.clock, &node)) {
            Ok(clock) => break clock,
            Err(PlatformError::Probe(e)) => {
                assert!(e.is_deferred());
                assert_eq!(binding.state(), DeviceState::Deferred);
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
        assert!(binding.probe_attempts() < 10, "probe never completed");
    };

    assert_eq!(binding.probe_attempts(), 3);
    assert_eq!(binding.state(), DeviceState::Bound);
    assert!(binding.last_error().is_none());
    assert_eq!(clock.get_rate().unwrap(), 1_200_000_000);
    // Deferred attempts never reached the firmware
    assert_eq!(firmware.request_count(), 1);
}

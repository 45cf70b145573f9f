//! CPU clock acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - GET reports the firmware's current ARM rate
//! - SET reports the rate the firmware actually applied
//! - ROUND accepts every request unchanged and never contacts firmware
//! - Firmware failures surface as errors and leave the rate untouched

use super::common::{bind_clock, scenario_config};
use soc_clk::{ClockControl, FirmwareBehavior};
use soc_common::error::TransportError;
use std::sync::Arc;
use std::thread;

#[test]
fn test_get_reports_configured_initial_rate() {
    let config = scenario_config();
    let rig = bind_clock(&config);

    assert_eq!(rig.clock.name(), "cpu");
    assert_eq!(rig.clock.get_rate().unwrap(), 1_200_000_000);
}

#[test]
fn test_set_then_get_agree() {
    let config = scenario_config();
    let rig = bind_clock(&config);

    let applied = rig.clock.set_rate(1_000_000_000).unwrap();
    assert_eq!(applied, 1_000_000_000);
    assert_eq!(rig.clock.get_rate().unwrap(), applied);
    assert_eq!(rig.firmware.arm_rate_hz(), applied);
}

#[test]
fn test_set_reports_adjusted_rate() {
    let config = scenario_config();
    let rig = bind_clock(&config);

    // Rounded down to the 50 MHz step
    assert_eq!(rig.clock.set_rate(1_234_567_890).unwrap(), 1_200_000_000);
    // Clamped to the window
    assert_eq!(rig.clock.set_rate(100_000_000).unwrap(), 600_000_000);
    assert_eq!(rig.clock.set_rate(u32::MAX).unwrap(), 1_800_000_000);
    assert_eq!(rig.clock.get_rate().unwrap(), 1_800_000_000);
}

#[test]
fn test_round_is_identity_and_silent() {
    let config = scenario_config();
    let rig = bind_clock(&config);
    let before = rig.firmware.request_count();

    for hz in [0, 1, 600_000_000, 1_234_567_890, u32::MAX] {
        assert_eq!(rig.clock.round_rate(hz), hz);
    }
    assert_eq!(rig.firmware.request_count(), before);
}

#[test]
fn test_rejected_set_leaves_rate_unchanged() {
    let config = scenario_config();
    let rig = bind_clock(&config);

    rig.firmware.set_behavior(FirmwareBehavior::Reject);
    assert!(matches!(
        rig.clock.set_rate(900_000_000),
        Err(TransportError::Rejected { .. })
    ));
    assert!(rig.clock.get_rate().is_err());
    assert_eq!(rig.clock.rate_or_zero(), 0);

    rig.firmware.set_behavior(FirmwareBehavior::Normal);
    assert_eq!(rig.clock.get_rate().unwrap(), 1_200_000_000);
}

#[test]
fn test_timeout_uses_configured_deadline() {
    let config = scenario_config();
    let rig = bind_clock(&config);

    rig.firmware.set_behavior(FirmwareBehavior::Timeout);
    match rig.clock.get_rate() {
        Err(TransportError::Timeout { after }) => {
            assert_eq!(after, config.firmware.response_timeout);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[test]
fn test_concurrent_callers_through_trait_object() {
    let config = scenario_config();
    let rig = bind_clock(&config);
    let clock: Arc<dyn ClockControl> = Arc::new(rig.clock);

    let handles: Vec<_> = (0..4_u32)
        .map(|i| {
            let clock = Arc::clone(&clock);
            thread::spawn(move || {
                let target = 600_000_000 + i * 100_000_000;
                for _ in 0..50 {
                    assert_eq!(clock.set_rate(target).unwrap(), target);
                    let rate = clock.get_rate().unwrap();
                    assert!((600_000_000..=900_000_000).contains(&rate));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(rig.firmware.request_count(), 4 * 50 * 2);
}

//! Binding the CPU clock device to its firmware.

use crate::clock::ClockHandle;
use crate::transport::FirmwareProvider;
use soc_common::config::{CpuClockConfig, CPU_CLOCK_COMPATIBLE};
use soc_common::error::ProbeError;
use tracing::{debug, error, info};

/// Probe the firmware CPU clock described by `config`.
///
/// # Errors
///
/// - [`ProbeError::Config`] if the configuration does not describe this device
/// - [`ProbeError::DependencyUnavailable`] if the platform has no firmware
/// - [`ProbeError::NotReady`] if the firmware is not initialized yet; the
///   caller decides when to probe again
pub fn probe_cpu_clock(
    config: &CpuClockConfig,
    provider: &dyn FirmwareProvider,
) -> Result<ClockHandle, ProbeError> {
    if config.compatible != CPU_CLOCK_COMPATIBLE {
        return Err(ProbeError::Config(format!(
            "unsupported compatible \"{}\" (expected \"{CPU_CLOCK_COMPATIBLE}\")",
            config.compatible
        )));
    }
    if config.name.is_empty() {
        return Err(ProbeError::Config("clock name must not be empty".into()));
    }

    let firmware = match provider.firmware() {
        Ok(firmware) => firmware,
        Err(e @ ProbeError::NotReady(_)) => {
            debug!(clock = %config.name, error = %e, "Firmware not ready, deferring probe");
            return Err(e);
        }
        Err(e) => {
            error!(clock = %config.name, error = %e, "Missing firmware");
            return Err(e);
        }
    };

    let clock = ClockHandle::with_clock_id(config.name.clone(), config.clock_id, firmware);
    info!(
        clock = %clock.name(),
        clock_id = clock.clock_id(),
        "Registered firmware CPU clock"
    );
    Ok(clock)
}

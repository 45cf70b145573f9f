//! Bound thermal sensor device.
//!
//! Probe checks the device description, enables the sensor clock and builds
//! the calibrated sensor; dropping the device disables the clock again.

use crate::gate::ClockGate;
use crate::register::RegisterIo;
use crate::sensor::CalibratedSensor;
use crate::TemperatureSource;
use soc_common::config::{ThermalConfig, THERMAL_COMPATIBLE};
use soc_common::error::{ProbeError, SensorError};
use tracing::{debug, error, info, warn};

/// A probed thermal sensor holding its clock enabled.
pub struct ThermalDevice<'a, R: RegisterIo + ?Sized> {
    sensor: CalibratedSensor<'a, R>,
    clock: Box<dyn ClockGate + 'a>,
}

impl<R: RegisterIo + ?Sized> std::fmt::Debug for ThermalDevice<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThermalDevice")
            .field("slope", &self.sensor.slope())
            .field("offset", &self.sensor.offset())
            .finish_non_exhaustive()
    }
}

impl<'a, R: RegisterIo + ?Sized> ThermalDevice<'a, R> {
    /// Bind the sensor described by `config` to `regs`.
    ///
    /// # Errors
    ///
    /// - [`ProbeError::Config`] if the configuration does not describe this device
    /// - [`ProbeError::NotReady`] if the clock provider is not ready yet
    /// - any other error returned while enabling the clock
    pub fn probe(
        config: &ThermalConfig,
        regs: &'a R,
        mut clock: Box<dyn ClockGate + 'a>,
    ) -> Result<Self, ProbeError> {
        if config.compatible != THERMAL_COMPATIBLE {
            return Err(ProbeError::Config(format!(
                "unsupported compatible \"{}\" (expected \"{THERMAL_COMPATIBLE}\")",
                config.compatible
            )));
        }

        if let Err(e) = clock.enable() {
            if e.is_deferred() {
                debug!(error = %e, "Sensor clock not ready, deferring probe");
            } else {
                error!(error = %e, "Could not enable sensor clock");
            }
            return Err(e);
        }

        let sensor = CalibratedSensor::new(regs, config.slope, config.offset);
        info!(
            slope = config.slope,
            offset = config.offset,
            "Registered AVS thermal sensor"
        );
        Ok(Self { sensor, clock })
    }

    /// The calibrated sensor.
    #[must_use]
    pub fn sensor(&self) -> &CalibratedSensor<'a, R> {
        &self.sensor
    }

    /// Read the temperature in millidegrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::InvalidReading`] if the snapshot is not valid.
    pub fn read_temperature(&self) -> Result<u32, SensorError> {
        self.sensor.read_temperature().inspect_err(|e| {
            warn!(error = %e, "Reading not valid");
        })
    }
}

impl<R: RegisterIo + ?Sized> TemperatureSource for ThermalDevice<'_, R> {
    fn read_temperature(&self) -> Result<u32, SensorError> {
        ThermalDevice::read_temperature(self)
    }
}

impl<R: RegisterIo + ?Sized> Drop for ThermalDevice<'_, R> {
    fn drop(&mut self) {
        self.clock.disable();
        debug!("AVS thermal sensor detached");
    }
}

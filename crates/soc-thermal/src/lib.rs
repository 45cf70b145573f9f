//! AVS ring-oscillator thermal sensor.
//!
//! Reads a raw status word, rejects it unless both validity bits are set,
//! and converts the 10-bit code to millidegrees Celsius with a linear
//! slope/offset calibration.

pub mod device;
pub mod gate;
pub mod register;
pub mod sensor;
pub mod status;

pub use device::*;
pub use gate::*;
pub use register::*;
pub use sensor::*;
pub use status::*;

use soc_common::error::SensorError;

/// Temperature capability exposed to the thermal framework.
pub trait TemperatureSource {
    /// Read the current temperature in millidegrees Celsius.
    ///
    /// Each call is independent; an invalid reading is returned immediately
    /// and the caller decides whether to poll again.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::InvalidReading`] if the sensor snapshot is not valid.
    fn read_temperature(&self) -> Result<u32, SensorError>;
}

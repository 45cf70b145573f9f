//! Linear slope/offset calibration of the AVS temperature code.

use crate::register::RegisterIo;
use crate::status::ThermalStatusWord;
use crate::TemperatureSource;
use soc_common::error::SensorError;

/// Temperature sensor with fixed linear calibration.
///
/// `temperature = slope * code + offset`, in millidegrees Celsius.
#[derive(Debug)]
pub struct CalibratedSensor<'a, R: RegisterIo + ?Sized> {
    regs: &'a R,
    slope: i32,
    offset: i32,
}

impl<'a, R: RegisterIo + ?Sized> CalibratedSensor<'a, R> {
    /// Create a sensor reading from `regs` with the given calibration.
    pub fn new(regs: &'a R, slope: i32, offset: i32) -> Self {
        Self {
            regs,
            slope,
            offset,
        }
    }

    /// Millidegrees Celsius per code unit.
    #[must_use]
    pub fn slope(&self) -> i32 {
        self.slope
    }

    /// Millidegrees Celsius bias.
    #[must_use]
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Take one snapshot of the status register.
    #[must_use]
    pub fn status(&self) -> ThermalStatusWord {
        ThermalStatusWord::from_raw(self.regs.read_u32())
    }

    /// Convert a code to millidegrees Celsius.
    ///
    /// Results below zero are reported as 0; results beyond `u32::MAX`
    /// saturate.
    #[must_use]
    pub fn convert(&self, code: u16) -> u32 {
        let t = i64::from(self.slope) * i64::from(code) + i64::from(self.offset);
        u32::try_from(t.max(0)).unwrap_or(u32::MAX)
    }

    /// Validate and convert a status snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::InvalidReading`] if either validity bit is clear.
    pub fn temperature_from(&self, status: ThermalStatusWord) -> Result<u32, SensorError> {
        let code = status
            .valid_code()
            .ok_or(SensorError::InvalidReading { raw: status.raw() })?;
        Ok(self.convert(code))
    }

    /// Read the sensor once.
    ///
    /// A single load is performed; an invalid snapshot is reported at once
    /// rather than waited out.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::InvalidReading`] if the snapshot is not valid.
    pub fn read_temperature(&self) -> Result<u32, SensorError> {
        self.temperature_from(self.status())
    }
}

impl<R: RegisterIo + ?Sized> TemperatureSource for CalibratedSensor<'_, R> {
    fn read_temperature(&self) -> Result<u32, SensorError> {
        CalibratedSensor::read_temperature(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::SimulatedRegister;
    use crate::status::STATUS_VALID_MASK;

    fn valid(code: u32) -> u32 {
        STATUS_VALID_MASK | code
    }

    #[test]
    fn test_unit_calibration() {
        let reg = SimulatedRegister::new(valid(100));
        let sensor = CalibratedSensor::new(&reg, 1, 0);
        assert_eq!(sensor.read_temperature(), Ok(100));
    }

    #[test]
    fn test_full_scale_code() {
        let reg = SimulatedRegister::new(valid(0x3FF));
        let sensor = CalibratedSensor::new(&reg, 500, -200_000);
        assert_eq!(sensor.read_temperature(), Ok(311_500));
    }

    #[test]
    fn test_negative_result_clamped_to_zero() {
        let reg = SimulatedRegister::new(valid(100));
        let sensor = CalibratedSensor::new(&reg, -1000, 50_000);
        assert_eq!(sensor.read_temperature(), Ok(0));
    }

    #[test]
    fn test_exact_zero_is_not_clamped_away() {
        let reg = SimulatedRegister::new(valid(50));
        let sensor = CalibratedSensor::new(&reg, -1000, 50_000);
        assert_eq!(sensor.read_temperature(), Ok(0));

        reg.set(valid(49));
        assert_eq!(sensor.read_temperature(), Ok(1000));
    }

    #[test]
    fn test_bcm2711_calibration() {
        let reg = SimulatedRegister::new(valid(760));
        let sensor = CalibratedSensor::new(&reg, -487, 410_040);
        // -487 * 760 + 410040
        assert_eq!(sensor.read_temperature(), Ok(39_920));
    }

    #[test]
    fn test_invalid_reading() {
        let reg = SimulatedRegister::new(0x0000_0064);
        let sensor = CalibratedSensor::new(&reg, 1, 0);
        assert_eq!(
            sensor.read_temperature(),
            Err(SensorError::InvalidReading { raw: 0x64 })
        );
    }

    #[test]
    fn test_invalid_regardless_of_code() {
        let sensor_reg = SimulatedRegister::default();
        let sensor = CalibratedSensor::new(&sensor_reg, 1, 0);
        for raw in [0x0000_0000, 0x0000_03FF, 0x0001_03FF, 0x0000_07FF, 0xFFFE_FFFF] {
            sensor_reg.set(raw);
            assert!(
                sensor.read_temperature().is_err(),
                "0x{raw:08X} must be rejected"
            );
        }
    }

    #[test]
    fn test_single_load_per_read() {
        let reg = SimulatedRegister::new(0);
        let sensor = CalibratedSensor::new(&reg, 1, 0);
        let _ = sensor.read_temperature();
        assert_eq!(reg.reads(), 1);
    }

    #[test]
    fn test_reads_are_idempotent() {
        let reg = SimulatedRegister::new(valid(612));
        let sensor = CalibratedSensor::new(&reg, -487, 410_040);
        let first = sensor.read_temperature();
        for _ in 0..10 {
            assert_eq!(sensor.read_temperature(), first);
        }
    }

    #[test]
    fn test_extreme_calibration_saturates() {
        let reg = SimulatedRegister::new(valid(0x3FF));
        let sensor = CalibratedSensor::new(&reg, i32::MAX, i32::MAX);
        assert_eq!(sensor.read_temperature(), Ok(u32::MAX));

        let sensor = CalibratedSensor::new(&reg, i32::MIN, i32::MIN);
        assert_eq!(sensor.read_temperature(), Ok(0));
    }

    #[test]
    fn test_convert_without_register() {
        let reg = SimulatedRegister::default();
        let sensor = CalibratedSensor::new(&reg, 2, 10);
        assert_eq!(sensor.convert(5), 20);
        assert_eq!(reg.reads(), 0);
    }

    #[test]
    fn test_as_temperature_source() {
        let reg = SimulatedRegister::new(valid(10));
        let sensor = CalibratedSensor::new(&reg, 100, 0);
        let source: &dyn TemperatureSource = &sensor;
        assert_eq!(source.read_temperature(), Ok(1000));
    }
}

//! Firmware-backed CPU clock.
//!
//! Rate queries and changes are not register accesses: each one is a single
//! property round-trip through the firmware, which is authoritative for the
//! rate actually applied.

use crate::property::{ClockPropertyMessage, PropertyTag};
use crate::transport::FirmwareTransport;
use crate::ClockControl;
use soc_common::config::ARM_CLOCK_ID;
use soc_common::error::TransportError;
use std::sync::Arc;

/// Handle to a clock whose rate is owned by the firmware.
///
/// The handle shares the transport with other users of the firmware; it
/// never owns the firmware connection and never swaps it.
pub struct ClockHandle {
    /// Clock name as given by the parent configuration.
    name: String,
    /// Firmware clock identifier.
    clock_id: u32,
    /// Firmware transport bound at construction.
    transport: Arc<dyn FirmwareTransport>,
}

impl std::fmt::Debug for ClockHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockHandle")
            .field("name", &self.name)
            .field("clock_id", &self.clock_id)
            .finish_non_exhaustive()
    }
}

impl ClockHandle {
    /// Create a handle for the ARM core clock.
    pub fn new(name: impl Into<String>, transport: Arc<dyn FirmwareTransport>) -> Self {
        Self::with_clock_id(name, ARM_CLOCK_ID, transport)
    }

    /// Create a handle for an arbitrary firmware clock id.
    pub fn with_clock_id(
        name: impl Into<String>,
        clock_id: u32,
        transport: Arc<dyn FirmwareTransport>,
    ) -> Self {
        Self {
            name: name.into(),
            clock_id,
            transport,
        }
    }

    /// Clock name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Firmware clock identifier carried in every request.
    #[must_use]
    pub fn clock_id(&self) -> u32 {
        self.clock_id
    }

    /// Query the current rate in Hz.
    ///
    /// # Errors
    ///
    /// Propagates the transport failure. No fallback rate is inferred.
    pub fn get_rate(&self) -> Result<u32, TransportError> {
        self.property(PropertyTag::GetClockRate, 0)
    }

    /// Request `requested_hz` and return the rate the firmware applied.
    ///
    /// The applied rate may differ from the request. No retry is performed.
    ///
    /// # Errors
    ///
    /// Propagates the transport failure.
    pub fn set_rate(&self, requested_hz: u32) -> Result<u32, TransportError> {
        self.property(PropertyTag::SetClockRate, requested_hz)
    }

    /// Report the rate that would be used for `requested_hz`.
    ///
    /// There is no rate table: the firmware's own rounding is only visible
    /// after [`Self::set_rate`], so every request is reported as achievable.
    #[must_use]
    pub fn round_rate(&self, requested_hz: u32) -> u32 {
        requested_hz
    }

    /// Query the current rate, reporting 0 if the firmware cannot be reached.
    ///
    /// Compatibility path for consumers that treat an unknown rate as 0.
    /// Prefer [`Self::get_rate`].
    #[must_use]
    pub fn rate_or_zero(&self) -> u32 {
        self.get_rate().unwrap_or(0)
    }

    /// Perform one round-trip and return the response value.
    fn property(&self, tag: PropertyTag, value: u32) -> Result<u32, TransportError> {
        let request = ClockPropertyMessage::new(self.clock_id, value);
        let mut payload = request.to_bytes();

        self.transport.send_property(tag.as_u32(), &mut payload)?;

        let response = ClockPropertyMessage::from_array(payload);
        if response.id != request.id {
            return Err(TransportError::ClockIdMismatch {
                expected: request.id,
                actual: response.id,
            });
        }
        Ok(response.value)
    }
}

impl ClockControl for ClockHandle {
    fn name(&self) -> &str {
        ClockHandle::name(self)
    }

    fn get_rate(&self) -> Result<u32, TransportError> {
        ClockHandle::get_rate(self)
    }

    fn set_rate(&self, requested_hz: u32) -> Result<u32, TransportError> {
        ClockHandle::set_rate(self, requested_hz)
    }

    fn round_rate(&self, requested_hz: u32) -> u32 {
        ClockHandle::round_rate(self, requested_hz)
    }
}

//! Firmware mailbox seams.
//!
//! The mailbox itself lives outside this crate. A [`FirmwareTransport`]
//! performs one property round-trip; a [`FirmwareProvider`] hands out the
//! transport at probe time, replacing any platform-wide firmware lookup.

use soc_common::error::{ProbeError, TransportError};
use std::sync::Arc;

/// Request/response channel to the firmware property interface.
///
/// The caller fills `payload` with request values; on success the transport
/// has overwritten the same buffer with response values of identical size.
///
/// Requests are paired with responses by position, not by a correlation id,
/// so implementations must keep at most one request in flight.
pub trait FirmwareTransport: Send + Sync {
    /// Perform one property round-trip for `tag`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the round-trip fails. The buffer
    /// contents are unspecified in that case.
    fn send_property(&self, tag: u32, payload: &mut [u8]) -> Result<(), TransportError>;
}

impl<T: FirmwareTransport + ?Sized> FirmwareTransport for Arc<T> {
    fn send_property(&self, tag: u32, payload: &mut [u8]) -> Result<(), TransportError> {
        (**self).send_property(tag, payload)
    }
}

/// Source of the firmware transport for devices being probed.
pub trait FirmwareProvider {
    /// Return the firmware transport.
    ///
    /// # Errors
    ///
    /// - [`ProbeError::DependencyUnavailable`] if the platform has no firmware
    /// - [`ProbeError::NotReady`] if the firmware exists but is not initialized yet
    fn firmware(&self) -> Result<Arc<dyn FirmwareTransport>, ProbeError>;
}

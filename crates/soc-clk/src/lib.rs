//! Firmware-mediated CPU clock control.
//!
//! This crate provides:
//! - [`ClockControl`] trait the clock framework holds and invokes
//! - [`clock`] module with the firmware-backed [`ClockHandle`]
//! - [`property`] module with the mailbox property tags and message layout
//! - [`transport`] module with the injected firmware seams
//! - [`simulated`] module with an in-process firmware model
//! - [`probe`] module binding the clock device to its firmware

pub mod clock;
pub mod probe;
pub mod property;
pub mod simulated;
pub mod transport;

pub use clock::*;
pub use probe::*;
pub use property::*;
pub use simulated::*;
pub use transport::*;

use soc_common::error::TransportError;

/// Clock capability exposed to the clock framework.
///
/// Every rate query or change is forwarded to the firmware; implementations
/// keep no rate cache.
pub trait ClockControl: Send + Sync {
    /// Clock name.
    fn name(&self) -> &str;

    /// Query the current rate in Hz.
    ///
    /// # Errors
    ///
    /// Returns the transport failure; callers treat it as "rate unknown".
    fn get_rate(&self) -> Result<u32, TransportError>;

    /// Request a new rate and return the rate actually applied.
    ///
    /// # Errors
    ///
    /// Returns the transport failure. No retry is attempted.
    fn set_rate(&self, requested_hz: u32) -> Result<u32, TransportError>;

    /// Report the rate that would be used for `requested_hz`.
    fn round_rate(&self, requested_hz: u32) -> u32;
}

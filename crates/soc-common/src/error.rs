use std::time::Duration;
use thiserror::Error;

/// Failures of a firmware mailbox property round-trip.
///
/// The core never retries or masks these; they are surfaced to the caller as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The firmware did not answer within the transport's deadline.
    #[error("firmware property request timed out after {after:?}")]
    Timeout {
        /// How long the transport waited.
        after: Duration,
    },

    /// The firmware answered but refused the request.
    #[error("firmware rejected tag 0x{tag:08X} (status 0x{status:08X})")]
    Rejected {
        /// Property tag that was rejected.
        tag: u32,
        /// Raw status word returned by the firmware.
        status: u32,
    },

    /// The response buffer did not have the size of the request buffer.
    #[error("malformed property response: expected {expected} bytes, got {actual}")]
    MalformedResponse {
        /// Expected payload length in bytes.
        expected: usize,
        /// Observed payload length in bytes.
        actual: usize,
    },

    /// The response referred to a different clock than the request.
    #[error("clock id mismatch: expected {expected}, got {actual}")]
    ClockIdMismatch {
        /// Clock id sent in the request.
        expected: u32,
        /// Clock id echoed by the firmware.
        actual: u32,
    },

    /// The mailbox channel itself is gone.
    #[error("firmware transport unavailable: {0}")]
    Unavailable(String),
}

/// Failures of a thermal sensor read.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The status word lacks the required validity bits.
    #[error("sensor reading not valid (status 0x{raw:08X})")]
    InvalidReading {
        /// Raw status word as read from the register.
        raw: u32,
    },
}

/// Failures while binding a device to its dependencies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// A dependency exists but is not initialized yet; probe may be retried later.
    #[error("dependency not ready: {0}")]
    NotReady(String),

    /// A required dependency does not exist on this platform.
    #[error("dependency unavailable: {0}")]
    DependencyUnavailable(String),

    /// Configuration does not describe this device.
    #[error("configuration error: {0}")]
    Config(String),

    /// The device's functional clock could not be controlled.
    #[error("clock error: {0}")]
    Clock(String),
}

impl ProbeError {
    /// Returns true if the external lifecycle manager should retry the probe later.
    #[must_use]
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::NotReady(_))
    }
}

/// Error raised by the device binding state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Probe failed.
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// Invalid state transition attempted.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Source state.
        from: String,
        /// Attempted target state.
        to: String,
    },
}

/// Convenience type alias for device lifecycle operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

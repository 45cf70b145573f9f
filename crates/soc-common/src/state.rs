//! Device binding state machine.
//!
//! Lifecycle of a platform device as seen by the external lifecycle manager:
//! UNBOUND → PROBING → BOUND, with PROBING → DEFERRED when a dependency
//! is not ready yet and PROBING → FAILED on a permanent error.
//!
//! This module only records outcomes; retry timing for deferred probes is
//! decided by the caller.

use crate::error::{PlatformError, PlatformResult, ProbeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Binding states of a platform device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceState {
    /// No driver attached.
    #[default]
    Unbound,
    /// Probe in progress.
    Probing,
    /// Probe postponed until a dependency becomes ready.
    Deferred,
    /// Driver attached and operations available.
    Bound,
    /// Probe failed permanently.
    Failed,
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbound => write!(f, "UNBOUND"),
            Self::Probing => write!(f, "PROBING"),
            Self::Deferred => write!(f, "DEFERRED"),
            Self::Bound => write!(f, "BOUND"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

impl DeviceState {
    /// Check if a transition to `target` is valid from the current state.
    #[must_use]
    pub fn can_transition_to(&self, target: DeviceState) -> bool {
        use DeviceState::{Bound, Deferred, Failed, Probing, Unbound};

        matches!(
            (self, target),
            (Unbound, Probing)
                | (Probing, Bound)
                | (Probing, Deferred)
                | (Probing, Failed)
                | (Deferred, Probing)
                // Detach
                | (Bound, Unbound)
                // Manual reset after a permanent failure
                | (Failed, Unbound)
        )
    }

    /// Returns true if device operations may be invoked.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound)
    }
}

/// Tracks one device's binding state across probe attempts.
#[derive(Debug, Clone)]
pub struct DeviceBinding {
    name: String,
    state: DeviceState,
    probe_attempts: u32,
    last_error: Option<ProbeError>,
}

impl DeviceBinding {
    /// Create a binding record for the named device, starting UNBOUND.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: DeviceState::Unbound,
            probe_attempts: 0,
            last_error: None,
        }
    }

    /// Device name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Number of probe attempts made so far.
    #[must_use]
    pub fn probe_attempts(&self) -> u32 {
        self.probe_attempts
    }

    /// Error returned by the most recent failed or deferred probe.
    #[must_use]
    pub fn last_error(&self) -> Option<&ProbeError> {
        self.last_error.as_ref()
    }

    /// Attempt a state transition.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidStateTransition`] if `target` is not
    /// reachable from the current state.
    pub fn transition(&mut self, target: DeviceState) -> PlatformResult<()> {
        if self.state.can_transition_to(target) {
            debug!(device = %self.name, from = %self.state, to = %target, "Device state transition");
            self.state = target;
            Ok(())
        } else {
            Err(PlatformError::InvalidStateTransition {
                from: self.state.to_string(),
                to: target.to_string(),
            })
        }
    }

    /// Run one probe attempt and record its outcome.
    ///
    /// A [`ProbeError::NotReady`] outcome leaves the device DEFERRED so the
    /// caller can try again later; any other error marks it FAILED.
    ///
    /// # Errors
    ///
    /// Returns the probe error, or an invalid transition if the device is
    /// already bound or failed.
    pub fn probe_with<T, F>(&mut self, probe: F) -> PlatformResult<T>
    where
        F: FnOnce() -> Result<T, ProbeError>,
    {
        self.transition(DeviceState::Probing)?;
        self.probe_attempts += 1;

        match probe() {
            Ok(device) => {
                self.last_error = None;
                self.transition(DeviceState::Bound)?;
                Ok(device)
            }
            Err(e) if e.is_deferred() => {
                debug!(device = %self.name, attempt = self.probe_attempts, error = %e, "Probe deferred");
                self.last_error = Some(e.clone());
                self.transition(DeviceState::Deferred)?;
                Err(e.into())
            }
            Err(e) => {
                warn!(device = %self.name, error = %e, "Probe failed");
                self.last_error = Some(e.clone());
                self.transition(DeviceState::Failed)?;
                Err(e.into())
            }
        }
    }

    /// Mark a bound device as detached.
    ///
    /// # Errors
    ///
    /// Returns an invalid transition if the device is not bound.
    pub fn unbind(&mut self) -> PlatformResult<()> {
        self.transition(DeviceState::Unbound)
    }
}

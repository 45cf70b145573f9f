//! Functional clock of the sensor block.

use soc_common::error::ProbeError;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Gate for the clock feeding the sensor block.
///
/// The sensor only converts while its clock runs.
pub trait ClockGate {
    /// Prepare and enable the clock.
    ///
    /// # Errors
    ///
    /// [`ProbeError::NotReady`] if the clock provider has not probed yet,
    /// any other [`ProbeError`] if the clock cannot be enabled.
    fn enable(&mut self) -> Result<(), ProbeError>;

    /// Disable and unprepare the clock.
    fn disable(&mut self);
}

#[derive(Debug, Default)]
struct GateState {
    enabled: AtomicBool,
    enable_count: AtomicU32,
    fail_next: Mutex<Option<ProbeError>>,
}

/// Clock gate that only records its state.
///
/// Clones share state, so a test can keep one clone while the device owns another.
#[derive(Debug, Clone, Default)]
pub struct SimulatedClockGate {
    inner: Arc<GateState>,
}

impl SimulatedClockGate {
    /// Create a disabled gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `enable` fail with `error`.
    pub fn fail_next_enable(&self, error: ProbeError) {
        if let Ok(mut next) = self.inner.fail_next.lock() {
            *next = Some(error);
        }
    }

    /// True while the clock is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::Acquire)
    }

    /// Number of successful enables.
    #[must_use]
    pub fn enable_count(&self) -> u32 {
        self.inner.enable_count.load(Ordering::Relaxed)
    }
}

impl ClockGate for SimulatedClockGate {
    fn enable(&mut self) -> Result<(), ProbeError> {
        let injected = self
            .inner
            .fail_next
            .lock()
            .map_err(|_| ProbeError::Clock("gate state poisoned".into()))?
            .take();
        if let Some(err) = injected {
            return Err(err);
        }
        self.inner.enabled.store(true, Ordering::Release);
        self.inner.enable_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn disable(&mut self) {
        self.inner.enabled.store(false, Ordering::Release);
    }
}

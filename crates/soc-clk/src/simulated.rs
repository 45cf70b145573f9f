//! In-process firmware model for testing without hardware.
//!
//! [`SimulatedFirmware`] answers clock property requests the way the board
//! firmware does: GET reports the current rate, SET clamps and rounds the
//! request before applying it and reports what it applied. Fault injection
//! is selected with [`FirmwareBehavior`].

use crate::property::{ClockPropertyMessage, PropertyTag};
use crate::transport::{FirmwareProvider, FirmwareTransport};
use soc_common::config::{FirmwareConfig, ARM_CLOCK_ID};
use soc_common::error::{ProbeError, TransportError};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, trace};

/// Status word the firmware returns for requests it does not understand.
pub const STATUS_ERROR: u32 = 0x8000_0001;

/// Fault injection modes of the simulated firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirmwareBehavior {
    /// Answer every request correctly.
    #[default]
    Normal,
    /// Refuse every request with [`STATUS_ERROR`].
    Reject,
    /// Never answer; the transport gives up after the configured timeout.
    Timeout,
    /// Report that the response came back shorter than the request.
    ///
    /// The request buffer is left untouched; only the transport error is returned.
    Truncate,
    /// Answer on behalf of a different clock.
    WrongClockId,
}

#[derive(Debug)]
struct FirmwareState {
    arm_rate_hz: u32,
    behavior: FirmwareBehavior,
    requests: u64,
}

/// Simulated board firmware implementing [`FirmwareTransport`].
#[derive(Debug)]
pub struct SimulatedFirmware {
    config: FirmwareConfig,
    state: Mutex<FirmwareState>,
}

impl Default for SimulatedFirmware {
    fn default() -> Self {
        Self::new(FirmwareConfig::default())
    }
}

impl SimulatedFirmware {
    /// Create a firmware model from configuration.
    #[must_use]
    pub fn new(config: FirmwareConfig) -> Self {
        let state = FirmwareState {
            arm_rate_hz: config.initial_rate_hz,
            behavior: FirmwareBehavior::Normal,
            requests: 0,
        };
        Self {
            config,
            state: Mutex::new(state),
        }
    }

    /// Change the fault injection mode.
    pub fn set_behavior(&self, behavior: FirmwareBehavior) {
        if let Ok(mut state) = self.state.lock() {
            debug!(?behavior, "Simulated firmware behavior changed");
            state.behavior = behavior;
        }
    }

    /// Current ARM clock rate held by the firmware.
    #[must_use]
    pub fn arm_rate_hz(&self) -> u32 {
        self.state.lock().map_or(0, |s| s.arm_rate_hz)
    }

    /// Number of property requests received, including failed ones.
    #[must_use]
    pub fn request_count(&self) -> u64 {
        self.state.lock().map_or(0, |s| s.requests)
    }

    /// Rate the firmware applies for a SET request of `requested_hz`.
    ///
    /// Returns `None` when the configured limits are inverted
    /// (`min_rate_hz > max_rate_hz`); the firmware then refuses every SET.
    #[must_use]
    pub fn applied_rate(&self, requested_hz: u32) -> Option<u32> {
        let FirmwareConfig {
            min_rate_hz,
            max_rate_hz,
            rate_step_hz,
            ..
        } = self.config;
        if min_rate_hz > max_rate_hz {
            return None;
        }
        let rounded = match rate_step_hz {
            0 => requested_hz,
            step => requested_hz - requested_hz % step,
        };
        Some(rounded.clamp(min_rate_hz, max_rate_hz))
    }

    fn timeout(&self) -> Duration {
        self.config.response_timeout
    }
}

impl FirmwareTransport for SimulatedFirmware {
    fn send_property(&self, tag: u32, payload: &mut [u8]) -> Result<(), TransportError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| TransportError::Unavailable("firmware state poisoned".into()))?;
        state.requests += 1;

        trace!(
            tag = format_args!("0x{tag:08X}"),
            len = payload.len(),
            request = state.requests,
            "Simulated firmware property request"
        );

        match state.behavior {
            FirmwareBehavior::Normal | FirmwareBehavior::WrongClockId => {}
            FirmwareBehavior::Reject => {
                return Err(TransportError::Rejected {
                    tag,
                    status: STATUS_ERROR,
                })
            }
            FirmwareBehavior::Timeout => {
                return Err(TransportError::Timeout {
                    after: self.timeout(),
                })
            }
            FirmwareBehavior::Truncate => {
                return Err(TransportError::MalformedResponse {
                    expected: payload.len(),
                    actual: payload.len() / 2,
                })
            }
        }

        let Some(tag) = PropertyTag::from_u32(tag) else {
            return Err(TransportError::Rejected {
                tag,
                status: STATUS_ERROR,
            });
        };

        let mut msg = ClockPropertyMessage::from_bytes(payload)?;
        if msg.id != ARM_CLOCK_ID {
            return Err(TransportError::Rejected {
                tag: tag.as_u32(),
                status: STATUS_ERROR,
            });
        }

        match tag {
            PropertyTag::GetClockRate => {
                msg.value = state.arm_rate_hz;
            }
            PropertyTag::SetClockRate => {
                let Some(applied) = self.applied_rate(msg.value) else {
                    debug!(
                        min_rate_hz = self.config.min_rate_hz,
                        max_rate_hz = self.config.max_rate_hz,
                        "Simulated firmware rate limits inverted, refusing SET"
                    );
                    return Err(TransportError::Rejected {
                        tag: tag.as_u32(),
                        status: STATUS_ERROR,
                    });
                };
                debug!(
                    requested_hz = msg.value,
                    applied_hz = applied,
                    "Simulated firmware applied ARM clock rate"
                );
                state.arm_rate_hz = applied;
                msg.value = applied;
            }
        }

        if state.behavior == FirmwareBehavior::WrongClockId {
            msg.id = msg.id.wrapping_add(1);
        }

        payload.copy_from_slice(&msg.to_bytes());
        Ok(())
    }
}

#[derive(Debug)]
enum NodeState {
    Missing,
    Present {
        firmware: Arc<SimulatedFirmware>,
        pending_polls: AtomicU32,
    },
}

/// Firmware provider backed by [`SimulatedFirmware`].
///
/// Models the three outcomes a probing device can see: no firmware at all,
/// firmware present but still initializing, and firmware ready.
#[derive(Debug)]
pub struct SimulatedFirmwareNode {
    state: NodeState,
}

impl SimulatedFirmwareNode {
    /// A platform without firmware.
    #[must_use]
    pub fn missing() -> Self {
        Self {
            state: NodeState::Missing,
        }
    }

    /// Firmware that is ready immediately.
    #[must_use]
    pub fn ready(firmware: Arc<SimulatedFirmware>) -> Self {
        Self::ready_after(firmware, 0)
    }

    /// Firmware that reports not-ready for the first `polls` lookups.
    #[must_use]
    pub fn ready_after(firmware: Arc<SimulatedFirmware>, polls: u32) -> Self {
        Self {
            state: NodeState::Present {
                firmware,
                pending_polls: AtomicU32::new(polls),
            },
        }
    }
}

impl FirmwareProvider for SimulatedFirmwareNode {
    fn firmware(&self) -> Result<Arc<dyn FirmwareTransport>, ProbeError> {
        match &self.state {
            NodeState::Missing => Err(ProbeError::DependencyUnavailable(
                "missing firmware node".into(),
            )),
            NodeState::Present {
                firmware,
                pending_polls,
            } => {
                let still_pending = pending_polls
                    .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
                    .is_ok();
                if still_pending {
                    Err(ProbeError::NotReady("firmware not initialized".into()))
                } else {
                    Ok(Arc::clone(firmware) as Arc<dyn FirmwareTransport>)
                }
            }
        }
    }
}

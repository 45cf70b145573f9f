//! Firmware property tags and the clock property message layout.
//!
//! A clock property request carries exactly two 32-bit little-endian words:
//!
//! ```text
//! offset  0        4        8
//!         ┌────────┬────────┐
//!         │   id   │ value  │
//!         └────────┴────────┘
//! ```
//!
//! The firmware overwrites the same buffer with its response.

use soc_common::error::TransportError;
use static_assertions::assert_eq_size;
use std::fmt;

/// Mailbox property tags used by the CPU clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PropertyTag {
    /// Get Clock Rate (0x00030002).
    GetClockRate = 0x0003_0002,
    /// Set Clock Rate (0x00038002).
    SetClockRate = 0x0003_8002,
}

impl PropertyTag {
    /// Parse a tag from its wire value.
    #[must_use]
    pub fn from_u32(tag: u32) -> Option<Self> {
        match tag {
            0x0003_0002 => Some(Self::GetClockRate),
            0x0003_8002 => Some(Self::SetClockRate),
            _ => None,
        }
    }

    /// Wire value of the tag.
    #[must_use]
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for PropertyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GetClockRate => write!(f, "GET_CLOCK_RATE"),
            Self::SetClockRate => write!(f, "SET_CLOCK_RATE"),
        }
    }
}

/// Tag payload of a clock rate request or response.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockPropertyMessage {
    /// Firmware clock identifier.
    pub id: u32,
    /// Rate in Hz: requested on SET, reported on GET and SET responses.
    pub value: u32,
}

assert_eq_size!(ClockPropertyMessage, [u8; ClockPropertyMessage::SIZE]);

impl ClockPropertyMessage {
    /// Encoded size in bytes.
    pub const SIZE: usize = 8;

    /// Create a message for `id` carrying `value`.
    #[must_use]
    pub const fn new(id: u32, value: u32) -> Self {
        Self { id, value }
    }

    /// Serialize the message to its wire form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.id.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.value.to_le_bytes());
        bytes
    }

    /// Parse a message from a response buffer.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::MalformedResponse`] unless `bytes` is exactly
    /// [`Self::SIZE`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransportError> {
        let bytes: &[u8; Self::SIZE] =
            bytes
                .try_into()
                .map_err(|_| TransportError::MalformedResponse {
                    expected: Self::SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self::from_array(*bytes))
    }

    /// Decode a buffer that is already known to be [`Self::SIZE`] bytes long.
    #[must_use]
    pub fn from_array(bytes: [u8; Self::SIZE]) -> Self {
        Self {
            id: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            value: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }
}

//! AVS temperature status word decoding.
//!
//! ```text
//!  31          17  16  15      11  10   9                0
//! ┌──────────────┬───┬──────────┬───┬──────────────────┐
//! │   reserved   │ V │ reserved │ V │       code       │
//! └──────────────┴───┴──────────┴───┴──────────────────┘
//! ```
//!
//! Both `V` bits must be set for `code` to be meaningful.

use std::fmt;

/// Validity bits: bit 16 and bit 10.
pub const STATUS_VALID_MASK: u32 = (1 << 16) | (1 << 10);

/// Temperature code: bits 9..0.
pub const STATUS_DATA_MASK: u32 = 0x3FF;

/// Snapshot of the temperature status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThermalStatusWord(u32);

impl ThermalStatusWord {
    /// Wrap a raw register value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Build a valid status word carrying `code` (masked to 10 bits).
    #[must_use]
    pub const fn valid_with_code(code: u16) -> Self {
        Self(STATUS_VALID_MASK | (code as u32 & STATUS_DATA_MASK))
    }

    /// Raw register value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// True if both validity bits are set.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 & STATUS_VALID_MASK == STATUS_VALID_MASK
    }

    /// ADC code, only meaningful when [`Self::is_valid`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // masked to 10 bits
    pub const fn code(self) -> u16 {
        (self.0 & STATUS_DATA_MASK) as u16
    }

    /// ADC code if the reading is valid.
    #[must_use]
    pub const fn valid_code(self) -> Option<u16> {
        if self.is_valid() {
            Some(self.code())
        } else {
            None
        }
    }
}

impl From<u32> for ThermalStatusWord {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ThermalStatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:08X} ({}, code {})",
            self.0,
            if self.is_valid() { "valid" } else { "invalid" },
            self.code()
        )
    }
}

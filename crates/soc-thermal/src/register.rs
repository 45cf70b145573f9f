//! Read-only access to the sensor status register.
//!
//! The register window is owned by the parent device; readers only borrow it.

use std::ptr::NonNull;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Offset of the AVS ring-oscillator temperature status register.
pub const AVS_RO_TEMP_STATUS: usize = 0x00;

/// A single 32-bit readable location. Reads have no side effects.
pub trait RegisterIo {
    /// Perform one 32-bit load.
    fn read_u32(&self) -> u32;
}

impl<T: RegisterIo + ?Sized> RegisterIo for &T {
    fn read_u32(&self) -> u32 {
        (**self).read_u32()
    }
}

/// Memory-mapped 32-bit register.
#[derive(Debug)]
pub struct MmioRegister {
    addr: NonNull<u32>,
}

// SAFETY: the register is only ever read with volatile loads, which have no
// side effects on this hardware, so sharing the address across threads is sound.
unsafe impl Send for MmioRegister {}
// SAFETY: see `Send` above.
unsafe impl Sync for MmioRegister {}

impl MmioRegister {
    /// Wrap a mapped register address.
    ///
    /// Returns `None` if `addr` is null or not 4-byte aligned.
    ///
    /// # Safety
    ///
    /// `addr` must point to a mapped device register (or ordinary memory)
    /// that stays valid for 32-bit volatile reads for as long as the
    /// returned value exists.
    #[must_use]
    pub unsafe fn new(addr: *const u32) -> Option<Self> {
        if addr.align_offset(std::mem::align_of::<u32>()) != 0 {
            return None;
        }
        NonNull::new(addr.cast_mut()).map(|addr| Self { addr })
    }

    /// Wrap the register at `offset` bytes into a mapped window.
    ///
    /// # Safety
    ///
    /// `base + offset` must satisfy the requirements of [`Self::new`], and
    /// `offset` must lie within the mapped window.
    #[must_use]
    pub unsafe fn from_base(base: *const u8, offset: usize) -> Option<Self> {
        // SAFETY: the caller guarantees `offset` is within the window.
        let addr = unsafe { base.add(offset) };
        // SAFETY: forwarded from the caller.
        unsafe { Self::new(addr.cast::<u32>()) }
    }
}

impl RegisterIo for MmioRegister {
    fn read_u32(&self) -> u32 {
        // SAFETY: `new` requires the address to stay valid and aligned for
        // 32-bit volatile reads for the lifetime of `self`.
        unsafe { std::ptr::read_volatile(self.addr.as_ptr()) }
    }
}

/// Register backed by an atomic cell, for tests and simulation.
#[derive(Debug, Default)]
pub struct SimulatedRegister {
    value: AtomicU32,
    reads: AtomicU64,
}

impl SimulatedRegister {
    /// Create a register holding `raw`.
    #[must_use]
    pub fn new(raw: u32) -> Self {
        Self {
            value: AtomicU32::new(raw),
            reads: AtomicU64::new(0),
        }
    }

    /// Replace the register contents, as the hardware would after a conversion.
    pub fn set(&self, raw: u32) {
        self.value.store(raw, Ordering::Release);
    }

    /// Number of loads performed so far.
    #[must_use]
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }
}

impl RegisterIo for SimulatedRegister {
    fn read_u32(&self) -> u32 {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.value.load(Ordering::Acquire)
    }
}

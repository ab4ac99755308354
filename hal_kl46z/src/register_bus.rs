//! Memory-mapped register access for the KL46Z
//!
//! This module provides a trait-based abstraction over peripheral register
//! reads and writes, allowing for both real hardware access and fake
//! implementations for testing.
//!
//! ## Safety
//!
//! Register access is inherently unsafe as it directly interacts with hardware.
//! The `MmioBus` implementation isolates all unsafe code to small, auditable
//! functions, and constructing one is itself `unsafe`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Register bus trait
///
/// Abstracts 32-bit and 8-bit peripheral register access to allow test
/// doubles. All methods take `&self`; registers are shared between
/// main-line code and interrupt handlers.
///
/// ## Implementation Notes
///
/// Implementations must guarantee:
/// - Every access reaches the register exactly once (no caching, no merging)
/// - Accesses complete in program order
pub trait RegisterBus: Send + Sync + 'static {
    /// Reads a 32-bit register
    fn read32(&self, addr: usize) -> u32;

    /// Writes a 32-bit register
    fn write32(&self, addr: usize, value: u32);

    /// Reads an 8-bit register
    fn read8(&self, addr: usize) -> u8;

    /// Writes an 8-bit register
    fn write8(&self, addr: usize, value: u8);

    /// Read-modify-write of a 32-bit register
    fn modify32(&self, addr: usize, f: impl FnOnce(u32) -> u32)
    where
        Self: Sized,
    {
        let value = self.read32(addr);
        self.write32(addr, f(value));
    }

    /// Read-modify-write of an 8-bit register
    fn modify8(&self, addr: usize, f: impl FnOnce(u8) -> u8)
    where
        Self: Sized,
    {
        let value = self.read8(addr);
        self.write8(addr, f(value));
    }
}

/// Real hardware register access through volatile loads and stores
///
/// ## Safety
///
/// This implementation is only safe when running on a KL46Z with the
/// addressed peripherals present. Construction is `unsafe` for that reason;
/// individual accesses then rely on the addresses in [`crate::registers`].
///
/// ## Example
///
/// ```rust,ignore
/// let bus = unsafe { MmioBus::new() };
/// let pit = PitTimer::new(bus);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MmioBus {
    _private: (),
}

impl MmioBus {
    /// Creates a bus that accesses real peripheral registers
    ///
    /// # Safety
    ///
    /// The caller must be running on a KL46Z (or compatible) device, since
    /// every access dereferences a fixed peripheral address.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for MmioBus {
    #[inline]
    fn read32(&self, addr: usize) -> u32 {
        // SAFETY: `MmioBus::new` requires a device where `addr` is a mapped,
        // aligned peripheral register. Volatile keeps the access from being
        // elided or reordered against other register accesses.
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }

    #[inline]
    fn write32(&self, addr: usize, value: u32) {
        // SAFETY: see `read32`
        unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
    }

    #[inline]
    fn read8(&self, addr: usize) -> u8 {
        // SAFETY: see `read32`
        unsafe { core::ptr::read_volatile(addr as *const u8) }
    }

    #[inline]
    fn write8(&self, addr: usize, value: u8) {
        // SAFETY: see `read32`
        unsafe { core::ptr::write_volatile(addr as *mut u8, value) }
    }
}

#[derive(Debug, Default)]
struct FakeState {
    /// Last value written to each register
    memory: HashMap<usize, u32>,
    /// Registers whose reads are driven by "hardware", not by writes
    pinned: HashMap<usize, u32>,
    /// Captured writes: (address, value)
    writes: Vec<(usize, u32)>,
}

/// Fake register bus for testing
///
/// Behaves like plain memory: a read returns the last value written, or 0.
/// Registers the hardware updates on its own (counters) can be pinned to a
/// value that reads return regardless of writes. Every write is captured
/// for verification. Clones share the same registers.
///
/// ## Example
///
/// ```rust
/// use hal_kl46z::register_bus::{FakeRegisterBus, RegisterBus};
///
/// let bus = FakeRegisterBus::new();
/// bus.write32(0x4003_8008, 0x1234);
/// assert_eq!(bus.read32(0x4003_8008), 0x1234);
///
/// // Counter register driven by the hardware
/// bus.pin(0x4003_8004, 77);
/// bus.write32(0x4003_8004, 0);
/// assert_eq!(bus.read32(0x4003_8004), 77);
///
/// assert_eq!(bus.writes(), vec![(0x4003_8008, 0x1234), (0x4003_8004, 0)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FakeRegisterBus {
    state: Arc<Mutex<FakeState>>,
}

impl FakeRegisterBus {
    /// Creates a bus with every register reading 0
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pins `addr` so reads return `value` until unpinned
    pub fn pin(&self, addr: usize, value: u32) {
        self.state().pinned.insert(addr, value);
    }

    /// Returns `addr` to plain memory behaviour
    pub fn unpin(&self, addr: usize) {
        self.state().pinned.remove(&addr);
    }

    /// Current value of a register without recording an access
    pub fn peek(&self, addr: usize) -> u32 {
        let state = self.state();
        state
            .pinned
            .get(&addr)
            .or_else(|| state.memory.get(&addr))
            .copied()
            .unwrap_or(0)
    }

    /// Returns all captured writes in order
    pub fn writes(&self) -> Vec<(usize, u32)> {
        self.state().writes.clone()
    }

    /// Returns captured writes to one register in order
    pub fn writes_to(&self, addr: usize) -> Vec<u32> {
        self.state()
            .writes
            .iter()
            .filter(|(target, _)| *target == addr)
            .map(|(_, value)| *value)
            .collect()
    }

    /// Clears all captured writes
    pub fn clear_writes(&self) {
        self.state().writes.clear();
    }
}

impl RegisterBus for FakeRegisterBus {
    fn read32(&self, addr: usize) -> u32 {
        self.peek(addr)
    }

    fn write32(&self, addr: usize, value: u32) {
        let mut state = self.state();
        state.memory.insert(addr, value);
        state.writes.push((addr, value));
    }

    fn read8(&self, addr: usize) -> u8 {
        self.peek(addr) as u8
    }

    fn write8(&self, addr: usize, value: u8) {
        self.write32(addr, u32::from(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_bus_creation() {
        let bus = FakeRegisterBus::new();
        assert_eq!(bus.read32(0x4000_0000), 0);
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn test_fake_bus_acts_as_memory() {
        let bus = FakeRegisterBus::new();
        bus.write32(0x10, 0xDEAD_BEEF);
        bus.write32(0x14, 7);

        assert_eq!(bus.read32(0x10), 0xDEAD_BEEF);
        assert_eq!(bus.read32(0x14), 7);
        assert_eq!(bus.writes(), vec![(0x10, 0xDEAD_BEEF), (0x14, 7)]);
    }

    #[test]
    fn test_pinned_register_ignores_writes() {
        let bus = FakeRegisterBus::new();
        bus.pin(0x20, 500);
        bus.write32(0x20, 0);
        assert_eq!(bus.read32(0x20), 500);

        bus.unpin(0x20);
        assert_eq!(bus.read32(0x20), 0);
    }

    #[test]
    fn test_modify_preserves_other_bits() {
        let bus = FakeRegisterBus::new();
        bus.write32(0x30, 0b1010);
        bus.modify32(0x30, |v| v | 0b0001);
        bus.modify32(0x30, |v| v & !0b1000);
        assert_eq!(bus.read32(0x30), 0b0011);
    }

    #[test]
    fn test_byte_access() {
        let bus = FakeRegisterBus::new();
        bus.write8(0x40, 0x0F);
        bus.modify8(0x40, |v| v & !0x01);
        assert_eq!(bus.read8(0x40), 0x0E);
        assert_eq!(bus.writes_to(0x40), vec![0x0F, 0x0E]);
    }

    #[test]
    fn test_clones_share_registers() {
        let bus = FakeRegisterBus::new();
        let observer = bus.clone();
        bus.write32(0x50, 3);
        assert_eq!(observer.read32(0x50), 3);

        observer.clear_writes();
        assert!(bus.writes().is_empty());
    }
}

//! # Timer Registry
//!
//! Exclusive ownership of timer peripherals and interrupt dispatch.
//!
//! ## Philosophy
//!
//! **One live owner per peripheral, found by id.**
//!
//! A timer claims its peripheral's slot when it is built and releases it
//! when dropped. The interrupt entry point for a peripheral looks up the
//! current owner in the same slot and delivers the rollover to it. There
//! is no back-pointer from hardware to a particular timer object.
//!
//! Claims and releases are expected from initialization code; they are
//! atomic with respect to interrupts but take no stronger lock.

use crate::error::RegistryError;
use crate::rollover::RolloverHandler;
use core::cell::RefCell;
use critical_section::Mutex;
use log::debug;
use std::fmt;
use std::sync::Arc;
use timer_hal::{PeripheralId, MAX_PERIPHERALS};

static GLOBAL_REGISTRY: TimerRegistry = TimerRegistry::new();

struct Slot {
    owner: Mutex<RefCell<Option<Arc<dyn RolloverHandler>>>>,
}

impl Slot {
    const fn new() -> Self {
        Self {
            owner: Mutex::new(RefCell::new(None)),
        }
    }
}

/// Ownership table indexed by [`PeripheralId`]
///
/// Firmware uses [`TimerRegistry::global`]. Tests may build their own
/// registry in a `static` to stay isolated from each other.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use hardware_timer::{RolloverHandler, TimerRegistry};
/// use timer_hal::PeripheralId;
///
/// struct Quiet;
/// impl RolloverHandler for Quiet {
///     fn handle_rollover(&self) {}
/// }
///
/// static REGISTRY: TimerRegistry = TimerRegistry::new();
/// let id = PeripheralId::new(4);
///
/// let lease = REGISTRY.claim(id, Arc::new(Quiet)).unwrap();
/// assert!(REGISTRY.is_owned(id));
/// assert!(REGISTRY.claim(id, Arc::new(Quiet)).is_err());
///
/// drop(lease);
/// assert!(!REGISTRY.is_owned(id));
/// ```
pub struct TimerRegistry {
    slots: [Slot; MAX_PERIPHERALS],
}

impl TimerRegistry {
    /// Creates an empty registry
    pub const fn new() -> Self {
        Self {
            slots: [const { Slot::new() }; MAX_PERIPHERALS],
        }
    }

    /// Process-wide registry used by interrupt entry points
    pub fn global() -> &'static TimerRegistry {
        &GLOBAL_REGISTRY
    }

    fn slot(&self, peripheral: PeripheralId) -> Result<&Slot, RegistryError> {
        self.slots
            .get(peripheral.index())
            .ok_or(RegistryError::OutOfRange(peripheral))
    }

    /// Claims `peripheral` for `handler`
    ///
    /// Fails if the peripheral already has an owner. The returned lease
    /// releases the claim when dropped.
    pub fn claim(
        &'static self,
        peripheral: PeripheralId,
        handler: Arc<dyn RolloverHandler>,
    ) -> Result<OwnershipLease, RegistryError> {
        let slot = self.slot(peripheral)?;
        critical_section::with(|cs| {
            let mut owner = slot.owner.borrow(cs).borrow_mut();
            if owner.is_some() {
                return Err(RegistryError::AlreadyOwned(peripheral));
            }
            *owner = Some(handler);
            Ok(())
        })?;

        debug!("{} claimed", peripheral);
        Ok(OwnershipLease {
            registry: self,
            peripheral,
        })
    }

    /// Returns true if `peripheral` currently has an owner
    pub fn is_owned(&self, peripheral: PeripheralId) -> bool {
        match self.slot(peripheral) {
            Ok(slot) => critical_section::with(|cs| slot.owner.borrow(cs).borrow().is_some()),
            Err(_) => false,
        }
    }

    /// Delivers one rollover event to the owner of `peripheral`
    ///
    /// Called from the peripheral's interrupt entry point. The owner is
    /// looked up inside a critical section and invoked outside of it.
    /// The lookup clones the owner's `Arc` and drops the clone on return.
    pub fn dispatch(&self, peripheral: PeripheralId) -> Result<(), RegistryError> {
        let slot = self.slot(peripheral)?;
        let handler = critical_section::with(|cs| slot.owner.borrow(cs).borrow().clone())
            .ok_or(RegistryError::NotOwned(peripheral))?;
        handler.handle_rollover();
        Ok(())
    }

    fn release(&self, peripheral: PeripheralId) {
        if let Ok(slot) = self.slot(peripheral) {
            critical_section::with(|cs| slot.owner.borrow(cs).replace(None));
            debug!("{} released", peripheral);
        }
    }
}

impl Default for TimerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TimerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owned: Vec<usize> = (0..MAX_PERIPHERALS)
            .filter(|&index| self.is_owned(PeripheralId::new(index as u8)))
            .collect();
        f.debug_struct("TimerRegistry")
            .field("owned", &owned)
            .finish()
    }
}

/// Proof of exclusive ownership of one peripheral
///
/// Dropping the lease frees the peripheral for the next claimant.
pub struct OwnershipLease {
    registry: &'static TimerRegistry,
    peripheral: PeripheralId,
}

impl OwnershipLease {
    pub fn peripheral(&self) -> PeripheralId {
        self.peripheral
    }
}

impl fmt::Debug for OwnershipLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnershipLease")
            .field("peripheral", &self.peripheral)
            .finish()
    }
}

impl Drop for OwnershipLease {
    fn drop(&mut self) {
        self.registry.release(self.peripheral);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        events: AtomicUsize,
    }

    impl CountingHandler {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                events: AtomicUsize::new(0),
            })
        }
    }

    impl RolloverHandler for CountingHandler {
        fn handle_rollover(&self) {
            self.events.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn fresh_registry() -> &'static TimerRegistry {
        Box::leak(Box::new(TimerRegistry::new()))
    }

    #[test]
    fn test_claim_is_exclusive() {
        let registry = fresh_registry();
        let id = PeripheralId::new(1);

        let lease = registry.claim(id, CountingHandler::new()).unwrap();
        assert_eq!(lease.peripheral(), id);
        assert_eq!(
            registry.claim(id, CountingHandler::new()).unwrap_err(),
            RegistryError::AlreadyOwned(id)
        );

        // Other peripherals are unaffected
        assert!(registry
            .claim(PeripheralId::new(2), CountingHandler::new())
            .is_ok());
    }

    #[test]
    fn test_release_on_lease_drop() {
        let registry = fresh_registry();
        let id = PeripheralId::new(0);

        let lease = registry.claim(id, CountingHandler::new()).unwrap();
        drop(lease);
        assert!(!registry.is_owned(id));
        assert!(registry.claim(id, CountingHandler::new()).is_ok());
    }

    #[test]
    fn test_dispatch_reaches_current_owner() {
        let registry = fresh_registry();
        let id = PeripheralId::new(5);
        let handler = CountingHandler::new();

        let _lease = registry.claim(id, handler.clone()).unwrap();
        registry.dispatch(id).unwrap();
        registry.dispatch(id).unwrap();
        assert_eq!(handler.events.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dispatch_without_owner() {
        let registry = fresh_registry();
        let id = PeripheralId::new(6);
        assert_eq!(registry.dispatch(id), Err(RegistryError::NotOwned(id)));
    }

    #[test]
    fn test_out_of_range_id() {
        let registry = fresh_registry();
        let id = PeripheralId::new(MAX_PERIPHERALS as u8);

        assert_eq!(
            registry.claim(id, CountingHandler::new()).unwrap_err(),
            RegistryError::OutOfRange(id)
        );
        assert!(!registry.is_owned(id));
        assert_eq!(registry.dispatch(id), Err(RegistryError::OutOfRange(id)));
    }

    #[test]
    fn test_released_handler_is_dropped() {
        let registry = fresh_registry();
        let id = PeripheralId::new(3);
        let handler = CountingHandler::new();

        let lease = registry.claim(id, handler.clone()).unwrap();
        assert_eq!(Arc::strong_count(&handler), 2);
        drop(lease);
        assert_eq!(Arc::strong_count(&handler), 1);
    }

    #[test]
    fn test_dispatch_releases_its_handle() {
        let registry = fresh_registry();
        let id = PeripheralId::new(4);
        let handler = CountingHandler::new();

        let lease = registry.claim(id, handler.clone()).unwrap();
        for _ in 0..3 {
            registry.dispatch(id).unwrap();
        }
        assert_eq!(handler.events.load(Ordering::SeqCst), 3);
        assert_eq!(Arc::strong_count(&handler), 2);
        drop(lease);
        assert_eq!(Arc::strong_count(&handler), 1);
    }

    #[test]
    fn test_debug_lists_owned_slots() {
        let registry = fresh_registry();
        let _lease = registry
            .claim(PeripheralId::new(2), CountingHandler::new())
            .unwrap();
        assert_eq!(format!("{:?}", registry), "TimerRegistry { owned: [2] }");
    }
}

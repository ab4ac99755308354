//! # Rollover State
//!
//! The part of a timer shared between main-line code and the rollover
//! interrupt.
//!
//! ## Concurrency
//!
//! Each counter has exactly one writer. The rollover count and the
//! remaining-callback count are written only by the interrupt path; the
//! threshold, periodic flag and armed flag are written only by main-line
//! code. Every access to these counters is a plain atomic load or store.
//! The registry still clones an `Arc` on each dispatch, which is an atomic
//! read-modify-write, so the crate needs a target with those atomics.
//!
//! Readers on the main line tolerate a torn view of (raw tick, rollover
//! count) bounded by one rollover period. Masking interrupts around that
//! pair disturbs the counter latch on some peripherals, so no critical
//! section is taken for it.
//!
//! The callback slot is the only state behind a critical section. The
//! callback is cloned out of the slot and run after the section ends.

use crate::callback::TimerCallback;
use core::cell::RefCell;
use critical_section::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use timer_hal::TimerHardware;

/// Receives rollover events for one peripheral
///
/// Implemented by the timer core and stored in the registry so the
/// interrupt path can find the current owner by peripheral id.
pub trait RolloverHandler: Send + Sync {
    /// Handles one hardware rollover
    fn handle_rollover(&self);
}

/// Driver plus interrupt-shared counters of one timer
pub(crate) struct TimerCore<D: TimerHardware> {
    driver: D,
    /// Rollovers observed since construction
    rollovers: AtomicU32,
    /// Ticks per rollover
    threshold: AtomicU32,
    periodic: AtomicBool,
    /// Callbacks left in counted mode
    remaining: AtomicU32,
    /// Rollovers are counted only while armed
    armed: AtomicBool,
    callback: Mutex<RefCell<Option<TimerCallback>>>,
}

impl<D: TimerHardware> TimerCore<D> {
    pub(crate) fn new(driver: D) -> Self {
        Self {
            driver,
            rollovers: AtomicU32::new(0),
            threshold: AtomicU32::new(0),
            periodic: AtomicBool::new(false),
            remaining: AtomicU32::new(0),
            armed: AtomicBool::new(false),
            callback: Mutex::new(RefCell::new(None)),
        }
    }

    pub(crate) fn driver(&self) -> &D {
        &self.driver
    }

    pub(crate) fn rollovers(&self) -> u32 {
        self.rollovers.load(Ordering::Acquire)
    }

    pub(crate) fn threshold(&self) -> u32 {
        self.threshold.load(Ordering::Relaxed)
    }

    pub(crate) fn periodic(&self) -> bool {
        self.periodic.load(Ordering::Relaxed)
    }

    pub(crate) fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::Relaxed)
    }

    /// Replaces the attached callback, returning the previous one
    pub(crate) fn swap_callback(&self, callback: Option<TimerCallback>) -> Option<TimerCallback> {
        critical_section::with(|cs| self.callback.borrow(cs).replace(callback))
    }

    pub(crate) fn has_callback(&self) -> bool {
        critical_section::with(|cs| self.callback.borrow(cs).borrow().is_some())
    }

    fn current_callback(&self) -> Option<TimerCallback> {
        critical_section::with(|cs| self.callback.borrow(cs).borrow().clone())
    }

    /// Stores a new run configuration; call while disarmed or before re-arming
    pub(crate) fn configure(&self, threshold: u32, periodic: bool, num_callbacks: u32) {
        self.threshold.store(threshold, Ordering::Relaxed);
        self.periodic.store(periodic, Ordering::Relaxed);
        self.remaining
            .store(if periodic { 0 } else { num_callbacks }, Ordering::Relaxed);
    }

    pub(crate) fn arm(&self) {
        self.armed.store(true, Ordering::Release);
    }

    pub(crate) fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
    }

    /// Ticks since construction: `rollovers * threshold + raw tick`
    ///
    /// The raw tick is sampled first, then the rollover count. A rollover
    /// landing between the two reads skews the result by one period.
    pub(crate) fn ticks(&self) -> u32 {
        let raw = self.driver.raw_tick();
        let rollovers = self.rollovers();
        rollovers.wrapping_mul(self.threshold()).wrapping_add(raw)
    }

    fn on_rollover(&self) {
        let threshold = self.threshold();
        self.driver.acknowledge_rollover(threshold);
        if !self.armed.load(Ordering::Acquire) {
            return;
        }

        let count = self.rollovers.load(Ordering::Relaxed);
        self.rollovers.store(count.wrapping_add(1), Ordering::Release);

        let periodic = self.periodic();
        let remaining = self.remaining();
        if periodic || remaining > 0 {
            if let Some(callback) = self.current_callback() {
                callback.invoke();
            }
        }
        if !periodic && remaining > 0 {
            self.remaining.store(remaining - 1, Ordering::Relaxed);
        }
    }
}

impl<D: TimerHardware> RolloverHandler for TimerCore<D> {
    fn handle_rollover(&self) {
        self.on_rollover();
    }
}

//! # Hardware Timer
//!
//! Generic timer contract layered over a [`TimerHardware`] driver.
//!
//! ## Philosophy
//!
//! **Time is counted once, in one place.**
//!
//! Drivers program registers. This crate owns everything above that:
//! exclusive ownership of a peripheral, rollover counting, periodic and
//! counted callbacks, and conversion of ticks into wall-clock time.
//!
//! ## Design Principles
//!
//! 1. **One owner per peripheral**: ownership lives in a [`TimerRegistry`]
//!    keyed by [`PeripheralId`]; a second claimant becomes Invalid
//! 2. **Silent no-ops**: misuse never panics; `try_*` forms report why
//! 3. **Interrupt-safe**: rollover state uses atomic loads and stores only
//! 4. **Testable**: any driver works, including the simulated one
//!
//! [`TimerHardware`]: timer_hal::TimerHardware

pub mod callback;
pub mod error;
pub mod registry;
mod rollover;
pub mod timer;

pub use callback::TimerCallback;
pub use error::{RegistryError, TimerError};
pub use registry::{OwnershipLease, TimerRegistry};
pub use rollover::RolloverHandler;
pub use timer::{HardwareTimer, TimerState};
pub use timer_hal::{PeripheralId, PreciseTime, TimeUnit, TimerConfig};

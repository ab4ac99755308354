//! # Timer Hardware Abstraction Layer
//!
//! This crate defines the boundary between the generic timer contract and
//! the peripheral drivers that program real counters.
//!
//! ## Philosophy
//!
//! **Peripherals must be fully abstracted and swappable.**
//!
//! No register layout, clock tree or interrupt number leaks into the timer
//! contract. Each peripheral implements [`TimerHardware`] once and
//! declares its fixed constants through [`TimerConfig`].
//!
//! ## Design Principles
//!
//! 1. **Trait-based**: every hardware side effect goes through the trait
//! 2. **Snapshot reads**: `raw_tick` is a single read, never a loop
//! 3. **Fixed constants**: counter width and tick scale never change after construction
//! 4. **Testable**: drivers can be simulated or run over a fake register bus

pub mod config;
pub mod driver;
pub mod peripheral;

pub use config::{ConfigError, TimerConfig};
pub use driver::TimerHardware;
pub use peripheral::{PeripheralId, MAX_PERIPHERALS};
pub use time_types::{PreciseTime, TimeUnit};

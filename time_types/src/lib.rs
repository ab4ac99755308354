//! # Time Types
//!
//! Wall-clock shaped time values produced by the hardware timer layer.
//!
//! ## Philosophy
//!
//! **Integer-exact, no floating-point division.**
//!
//! Microcontrollers without an FPU cannot afford float division, so every
//! conversion here is a cascade of integer division and modulo. Floating
//! point appears only outside this crate, when a driver scales raw ticks
//! into a unit before handing the count to [`PreciseTime`].
//!
//! ## Key Types
//!
//! - [`PreciseTime`]: hours/minutes/seconds/ms/us/ns value type
//! - [`TimeUnit`]: the unit a hardware tick is expressed in

pub mod precise_time;
pub mod unit;

pub use precise_time::{
    PreciseTime, TimeError, MIN_PER_HOUR, MS_PER_SEC, NS_PER_US, SEC_PER_MIN, US_PER_MS,
};
pub use unit::TimeUnit;

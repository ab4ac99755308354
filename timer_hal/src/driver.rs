//! # Timer Hardware
//!
//! The narrow interface the timer contract requires from a peripheral.
//!
//! ## Philosophy
//!
//! **Drivers program registers; they do not keep time.**
//!
//! A driver knows how to read its counter and how to arm, disarm and
//! acknowledge it. Rollover counting, callback bookkeeping and wall-clock
//! conversion belong to the timer contract built on top of it. A driver
//! does NOT:
//! - Count rollovers
//! - Call user callbacks
//! - Decide whether a threshold is acceptable
//!
//! ## Concurrency
//!
//! Every method takes `&self`. The same driver is reached from main-line
//! code (`raw_tick`, `start_hardware`, ...) and from the rollover
//! interrupt (`acknowledge_rollover`), so implementations keep their
//! register access free of Rust-level aliasing, as memory-mapped I/O is.

use crate::config::TimerConfig;
use crate::peripheral::PeripheralId;

/// Hardware timer peripheral
///
/// # Implementation Notes
///
/// - `raw_tick` is a snapshot: a single register read, optionally preceded
///   by a latch write the peripheral needs
/// - `raw_tick` returns ticks elapsed in the current period; down-counting
///   peripherals convert before returning
/// - `init_hardware` is called once per enable
/// - `config` must return the same value for the driver's whole life
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use timer_hal::{PeripheralId, TimeUnit, TimerConfig, TimerHardware};
///
/// struct CounterOnly {
///     counter: AtomicU32,
/// }
///
/// impl TimerHardware for CounterOnly {
///     fn peripheral(&self) -> PeripheralId {
///         PeripheralId::new(9)
///     }
///     fn config(&self) -> TimerConfig {
///         TimerConfig::new(0xFF, 1.0, TimeUnit::Microseconds)
///     }
///     fn raw_tick(&self) -> u32 {
///         self.counter.load(Ordering::Relaxed)
///     }
///     fn init_hardware(&self) {}
///     fn start_hardware(&self, _threshold: u32) {}
///     fn stop_hardware(&self) {}
/// }
///
/// let timer = CounterOnly { counter: AtomicU32::new(42) };
/// assert_eq!(timer.raw_tick(), 42);
/// ```
pub trait TimerHardware: Send + Sync + 'static {
    /// Physical peripheral this driver controls
    fn peripheral(&self) -> PeripheralId;

    /// Fixed constants of the peripheral
    fn config(&self) -> TimerConfig;

    /// Current tick within the running period
    fn raw_tick(&self) -> u32;

    /// Programs clocking, prescaler and interrupt enable
    fn init_hardware(&self);

    /// Programs the compare/modulo register and arms counter and interrupt
    ///
    /// # Arguments
    ///
    /// * `rollover_threshold` - ticks per rollover, already validated
    ///   against `config().max_rollover_tick`
    fn start_hardware(&self, rollover_threshold: u32);

    /// Disarms the counter and its interrupt
    fn stop_hardware(&self);

    /// Interrupt-context chores run before a rollover is counted
    ///
    /// Clears the pending flag and reloads anything the peripheral drops
    /// on rollover. The default does nothing.
    fn acknowledge_rollover(&self, _rollover_threshold: u32) {}
}

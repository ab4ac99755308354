//! # Simulated Timer Driver
//!
//! Deterministic timer peripheral for testing.
//!
//! ## Philosophy
//!
//! **Determinism enables thorough testing.**
//!
//! The simulated counter never moves on its own. Tests set or advance it
//! explicitly and deliver rollovers by dispatching through the registry,
//! the same path a hardware interrupt takes.
//!
//! ## Use Cases
//!
//! - Unit tests of the timer contract without hardware
//! - Integration tests that replay an exact sequence of rollovers
//! - Loading peripheral constants from JSON fixtures

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use timer_hal::{ConfigError, PeripheralId, TimerConfig, TimerHardware};

/// Errors from building a driver out of a JSON fixture
#[derive(Debug, Error)]
pub enum SimTimerError {
    #[error("invalid timer config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Default)]
struct SimState {
    raw_tick: AtomicU32,
    threshold: AtomicU32,
    counting: AtomicBool,
    inits: AtomicUsize,
    starts: AtomicUsize,
    stops: AtomicUsize,
    acknowledgements: AtomicUsize,
}

/// Simulated peripheral with a settable counter
///
/// # Examples
///
/// ```
/// use sim_timer::SimTimerDriver;
/// use timer_hal::{PeripheralId, TimeUnit, TimerConfig, TimerHardware};
///
/// let driver = SimTimerDriver::new(
///     PeripheralId::new(3),
///     TimerConfig::new(0xFF, 1.0, TimeUnit::Microseconds),
/// );
/// let monitor = driver.monitor();
///
/// driver.start_hardware(100);
/// assert_eq!(monitor.advance_ticks(250), 2);
/// assert_eq!(driver.raw_tick(), 50);
/// ```
#[derive(Debug)]
pub struct SimTimerDriver {
    peripheral: PeripheralId,
    config: TimerConfig,
    state: Arc<SimState>,
}

impl SimTimerDriver {
    /// Creates a stopped driver with the counter at 0
    pub fn new(peripheral: PeripheralId, config: TimerConfig) -> Self {
        Self {
            peripheral,
            config,
            state: Arc::new(SimState::default()),
        }
    }

    /// Builds a driver from a JSON [`TimerConfig`]
    ///
    /// ```
    /// use sim_timer::SimTimerDriver;
    /// use timer_hal::{PeripheralId, TimeUnit, TimerHardware};
    ///
    /// let json = r#"{"max_rollover_tick": 65535, "tick_value": 1.0, "tick_units": "ms"}"#;
    /// let driver = SimTimerDriver::from_json(PeripheralId::new(2), json).unwrap();
    /// assert_eq!(driver.config().tick_units, TimeUnit::Milliseconds);
    /// ```
    pub fn from_json(peripheral: PeripheralId, json: &str) -> Result<Self, SimTimerError> {
        let config: TimerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(Self::new(peripheral, config))
    }

    /// Returns a handle that observes and drives this driver
    ///
    /// The monitor stays usable after the driver moves into a timer.
    pub fn monitor(&self) -> SimTimerMonitor {
        SimTimerMonitor {
            state: self.state.clone(),
        }
    }
}

impl TimerHardware for SimTimerDriver {
    fn peripheral(&self) -> PeripheralId {
        self.peripheral
    }

    fn config(&self) -> TimerConfig {
        self.config
    }

    fn raw_tick(&self) -> u32 {
        self.state.raw_tick.load(Ordering::Relaxed)
    }

    fn init_hardware(&self) {
        self.state.inits.fetch_add(1, Ordering::Relaxed);
        self.state.raw_tick.store(0, Ordering::Relaxed);
    }

    fn start_hardware(&self, rollover_threshold: u32) {
        self.state.starts.fetch_add(1, Ordering::Relaxed);
        self.state.threshold.store(rollover_threshold, Ordering::Relaxed);
        self.state.raw_tick.store(0, Ordering::Relaxed);
        self.state.counting.store(true, Ordering::Relaxed);
    }

    fn stop_hardware(&self) {
        self.state.stops.fetch_add(1, Ordering::Relaxed);
        self.state.counting.store(false, Ordering::Relaxed);
    }

    fn acknowledge_rollover(&self, _rollover_threshold: u32) {
        self.state.acknowledgements.fetch_add(1, Ordering::Relaxed);
    }
}

/// Shared view of a [`SimTimerDriver`]
#[derive(Debug, Clone)]
pub struct SimTimerMonitor {
    state: Arc<SimState>,
}

impl SimTimerMonitor {
    /// Sets the counter within the current period
    pub fn set_raw_tick(&self, ticks: u32) {
        self.state.raw_tick.store(ticks, Ordering::Relaxed);
    }

    /// Advances the counter by `delta` ticks
    ///
    /// Returns the number of rollovers the hardware would have raised.
    /// The caller delivers them; the counter is left at the remainder.
    /// A stopped counter, or one started with threshold 0, does not move.
    /// The count saturates at `u32::MAX`, which a raw tick pinned past a
    /// small threshold can reach.
    pub fn advance_ticks(&self, delta: u32) -> u32 {
        let threshold = self.state.threshold.load(Ordering::Relaxed);
        if !self.is_counting() || threshold == 0 {
            return 0;
        }

        let total = u64::from(self.state.raw_tick.load(Ordering::Relaxed)) + u64::from(delta);
        let threshold = u64::from(threshold);
        self.state.raw_tick.store((total % threshold) as u32, Ordering::Relaxed);
        u32::try_from(total / threshold).unwrap_or(u32::MAX)
    }

    pub fn raw_tick(&self) -> u32 {
        self.state.raw_tick.load(Ordering::Relaxed)
    }

    /// Returns true between `start_hardware` and `stop_hardware`
    pub fn is_counting(&self) -> bool {
        self.state.counting.load(Ordering::Relaxed)
    }

    /// Threshold passed to the last `start_hardware`
    pub fn last_threshold(&self) -> u32 {
        self.state.threshold.load(Ordering::Relaxed)
    }

    pub fn init_count(&self) -> usize {
        self.state.inits.load(Ordering::Relaxed)
    }

    pub fn start_count(&self) -> usize {
        self.state.starts.load(Ordering::Relaxed)
    }

    pub fn stop_count(&self) -> usize {
        self.state.stops.load(Ordering::Relaxed)
    }

    /// Rollovers acknowledged by the interrupt path
    pub fn acknowledge_count(&self) -> usize {
        self.state.acknowledgements.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timer_hal::TimeUnit;

    fn driver() -> SimTimerDriver {
        SimTimerDriver::new(
            PeripheralId::new(0),
            TimerConfig::new(0xFFFF, 1.0, TimeUnit::Milliseconds),
        )
    }

    #[test]
    fn test_new_driver_is_idle() {
        let driver = driver();
        let monitor = driver.monitor();
        assert_eq!(driver.raw_tick(), 0);
        assert!(!monitor.is_counting());
        assert_eq!(monitor.init_count(), 0);
    }

    #[test]
    fn test_monitor_records_hardware_calls() {
        let driver = driver();
        let monitor = driver.monitor();

        driver.init_hardware();
        driver.start_hardware(500);
        assert!(monitor.is_counting());
        assert_eq!(monitor.last_threshold(), 500);

        driver.stop_hardware();
        assert!(!monitor.is_counting());
        assert_eq!(monitor.init_count(), 1);
        assert_eq!(monitor.start_count(), 1);
        assert_eq!(monitor.stop_count(), 1);
    }

    #[test]
    fn test_set_raw_tick_is_visible_to_driver() {
        let driver = driver();
        driver.monitor().set_raw_tick(42);
        assert_eq!(driver.raw_tick(), 42);
    }

    #[test]
    fn test_advance_counts_rollovers() {
        let driver = driver();
        let monitor = driver.monitor();
        driver.start_hardware(100);

        assert_eq!(monitor.advance_ticks(30), 0);
        assert_eq!(monitor.advance_ticks(80), 1);
        assert_eq!(monitor.raw_tick(), 10);
        assert_eq!(monitor.advance_ticks(390), 4);
        assert_eq!(monitor.raw_tick(), 0);
    }

    #[test]
    fn test_advance_without_overflowing() {
        let driver = driver();
        let monitor = driver.monitor();
        driver.start_hardware(u32::MAX);
        monitor.set_raw_tick(u32::MAX - 1);

        assert_eq!(monitor.advance_ticks(3), 1);
        assert_eq!(monitor.raw_tick(), 2);
    }

    #[test]
    fn test_rollover_count_saturates() {
        let driver = driver();
        let monitor = driver.monitor();
        driver.start_hardware(1);
        monitor.set_raw_tick(u32::MAX);

        assert_eq!(monitor.advance_ticks(u32::MAX), u32::MAX);
        assert_eq!(monitor.raw_tick(), 0);
    }

    #[test]
    fn test_stopped_counter_does_not_move() {
        let driver = driver();
        let monitor = driver.monitor();
        assert_eq!(monitor.advance_ticks(1000), 0);

        driver.start_hardware(0);
        assert_eq!(monitor.advance_ticks(1000), 0);
        assert_eq!(monitor.raw_tick(), 0);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"max_rollover_tick": 4294967295, "tick_value": 41.666666, "tick_units": "ns"}"#;
        let driver = SimTimerDriver::from_json(PeripheralId::new(1), json).unwrap();

        assert_eq!(driver.peripheral(), PeripheralId::new(1));
        assert_eq!(driver.config().max_rollover_tick, u32::MAX);
        assert_eq!(driver.config().tick_units, TimeUnit::Nanoseconds);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        let malformed = SimTimerDriver::from_json(PeripheralId::new(1), "{");
        assert!(matches!(malformed, Err(SimTimerError::Json(_))));

        let json = r#"{"max_rollover_tick": 10, "tick_value": -1.0, "tick_units": "s"}"#;
        let negative = SimTimerDriver::from_json(PeripheralId::new(1), json);
        assert!(matches!(
            negative,
            Err(SimTimerError::Config(ConfigError::NonPositiveTickValue(_)))
        ));
    }
}

//! # Hardware Timer
//!
//! The generic timer contract: one state machine over any
//! [`TimerHardware`] driver.
//!
//! ## States
//!
//! ```text
//! Invalid (terminal)
//! Disabled --enable--> Enabled --start--> Running
//!    ^                    |                  |
//!    +------disable-------+------disable-----+
//! ```
//!
//! A timer that failed to claim its peripheral is Invalid for life: every
//! operation is a no-op and every query returns zero. `start` with an
//! oversized threshold, or before `enable`, is also a no-op. The `try_*`
//! forms report why an operation did nothing.
//!
//! ## Callback delivery
//!
//! In periodic mode the callback runs on every rollover. In counted mode
//! it runs on the first `num_callbacks` rollovers only; the timer keeps
//! running and counting after that.

use crate::callback::TimerCallback;
use crate::error::TimerError;
use crate::registry::{OwnershipLease, TimerRegistry};
use crate::rollover::{RolloverHandler, TimerCore};
use log::{debug, warn};
use std::fmt;
use std::sync::Arc;
use time_types::PreciseTime;
use timer_hal::{PeripheralId, TimerConfig, TimerHardware};

/// Lifecycle state of a [`HardwareTimer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Peripheral was owned elsewhere; unusable
    Invalid,
    /// Owns the peripheral, hardware idle
    Disabled,
    /// Hardware initialized, callback attached
    Enabled,
    /// Counting and delivering rollovers
    Running,
}

/// Timer contract over one peripheral driver
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use hardware_timer::{HardwareTimer, TimerCallback, TimerRegistry};
/// use sim_timer::SimTimerDriver;
/// use timer_hal::{PeripheralId, TimeUnit, TimerConfig};
///
/// static REGISTRY: TimerRegistry = TimerRegistry::new();
///
/// let id = PeripheralId::new(0);
/// let driver = SimTimerDriver::new(id, TimerConfig::new(0xFFFF, 1.0, TimeUnit::Milliseconds));
/// let monitor = driver.monitor();
/// let mut timer = HardwareTimer::with_registry(driver, &REGISTRY);
///
/// let fired = Arc::new(AtomicU32::new(0));
/// let counter = fired.clone();
/// timer.enable(Some(TimerCallback::new(move || {
///     counter.fetch_add(1, Ordering::Relaxed);
/// })));
/// timer.start(1000, true, 0);
///
/// // Two rollover interrupts, then 250 ticks into the third period
/// REGISTRY.dispatch(id).unwrap();
/// REGISTRY.dispatch(id).unwrap();
/// monitor.set_raw_tick(250);
///
/// assert_eq!(fired.load(Ordering::Relaxed), 2);
/// assert_eq!(timer.get_tick(), 2250);
/// assert_eq!(timer.get_time().to_string(), "00:00:02:250:000:000");
/// ```
pub struct HardwareTimer<D: TimerHardware> {
    core: Arc<TimerCore<D>>,
    config: TimerConfig,
    peripheral: PeripheralId,
    lease: Option<OwnershipLease>,
    enabled: bool,
    running: bool,
}

impl<D: TimerHardware> HardwareTimer<D> {
    /// Builds a timer that owns `driver`'s peripheral in the global registry
    ///
    /// The timer is Invalid if the peripheral already has an owner.
    pub fn new(driver: D) -> Self {
        Self::with_registry(driver, TimerRegistry::global())
    }

    /// Builds a timer that claims its peripheral in `registry`
    pub fn with_registry(driver: D, registry: &'static TimerRegistry) -> Self {
        let config = driver.config();
        let peripheral = driver.peripheral();
        let core = Arc::new(TimerCore::new(driver));

        let lease = match Self::claim(&core, config, peripheral, registry) {
            Ok(lease) => Some(lease),
            Err(err) => {
                warn!("{} unavailable, timer is invalid: {}", peripheral, err);
                None
            }
        };

        Self {
            core,
            config,
            peripheral,
            lease,
            enabled: false,
            running: false,
        }
    }

    fn claim(
        core: &Arc<TimerCore<D>>,
        config: TimerConfig,
        peripheral: PeripheralId,
        registry: &'static TimerRegistry,
    ) -> Result<OwnershipLease, TimerError> {
        config.validate()?;
        let handler: Arc<dyn RolloverHandler> = core.clone();
        Ok(registry.claim(peripheral, handler)?)
    }

    fn ensure_valid(&self) -> Result<(), TimerError> {
        if self.valid() {
            Ok(())
        } else {
            Err(TimerError::Invalid)
        }
    }

    /// Returns true if this timer owns its peripheral
    pub fn valid(&self) -> bool {
        self.lease.is_some()
    }

    /// Returns true if the hardware is initialized and ready to start
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns true if the timer is counting
    pub fn running(&self) -> bool {
        self.running
    }

    pub fn state(&self) -> TimerState {
        if !self.valid() {
            TimerState::Invalid
        } else if self.running {
            TimerState::Running
        } else if self.enabled {
            TimerState::Enabled
        } else {
            TimerState::Disabled
        }
    }

    pub fn peripheral(&self) -> PeripheralId {
        self.peripheral
    }

    pub fn config(&self) -> TimerConfig {
        self.config
    }

    /// Length of one tick in [`TimerConfig::tick_units`]
    pub fn tick_value(&self) -> f32 {
        self.config.tick_value
    }

    /// Length of one tick unit in seconds
    pub fn tick_unit_in_seconds(&self) -> f32 {
        self.config.tick_units.seconds_per_unit()
    }

    /// Largest threshold `start` accepts
    pub fn max_callback_tick_count(&self) -> u32 {
        self.config.max_rollover_tick
    }

    /// Rollovers counted since construction
    pub fn rollover_count(&self) -> u32 {
        if self.valid() {
            self.core.rollovers()
        } else {
            0
        }
    }

    /// Threshold set by the last successful `start`
    pub fn rollover_threshold(&self) -> u32 {
        if self.valid() {
            self.core.threshold()
        } else {
            0
        }
    }

    /// Callbacks left in counted mode; zero in periodic mode
    pub fn remaining_callbacks(&self) -> u32 {
        if self.valid() {
            self.core.remaining()
        } else {
            0
        }
    }

    pub fn periodic(&self) -> bool {
        self.valid() && self.core.periodic()
    }

    /// Returns true if a callback is attached
    pub fn has_callback(&self) -> bool {
        self.valid() && self.core.has_callback()
    }

    /// The driver this timer controls
    ///
    /// `None` when the timer is Invalid; a timer that lost the ownership
    /// claim never hands out the peripheral it does not own.
    pub fn driver(&self) -> Option<&D> {
        self.valid().then(|| self.core.driver())
    }

    /// Attaches `callback` and initializes the hardware
    ///
    /// An enabled or running timer is disabled first. No-op on an
    /// invalid timer.
    pub fn enable(&mut self, callback: Option<TimerCallback>) {
        if let Err(err) = self.try_enable(callback) {
            debug!("{}: enable ignored: {}", self.peripheral, err);
        }
    }

    /// Enables with a closure callback
    pub fn enable_fn<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.enable(Some(TimerCallback::new(callback)));
    }

    /// Enables with `method` called on `target`
    pub fn enable_bound<T>(&mut self, target: Arc<T>, method: fn(&T))
    where
        T: Send + Sync + 'static,
    {
        self.enable(Some(TimerCallback::bound(target, method)));
    }

    pub fn try_enable(&mut self, callback: Option<TimerCallback>) -> Result<(), TimerError> {
        self.ensure_valid()?;
        if self.enabled {
            self.shut_down();
        }

        self.core.swap_callback(callback);
        self.core.driver().init_hardware();
        self.enabled = true;
        debug!("{} enabled", self.peripheral);
        Ok(())
    }

    /// Programs the rollover threshold and starts counting
    ///
    /// # Arguments
    ///
    /// * `callback_tick_count` - ticks per rollover, at most
    ///   [`max_callback_tick_count`](Self::max_callback_tick_count)
    /// * `periodic` - call back on every rollover
    /// * `num_callbacks` - callbacks to deliver when not periodic
    ///
    /// No-op if the timer is not enabled or the threshold is too large.
    /// Restarting a running timer reconfigures it; the rollover count is
    /// kept.
    pub fn start(&mut self, callback_tick_count: u32, periodic: bool, num_callbacks: u32) {
        match self.try_start(callback_tick_count, periodic, num_callbacks) {
            Ok(()) => {}
            Err(err @ TimerError::ThresholdTooLarge { .. }) => {
                warn!("{}: start rejected: {}", self.peripheral, err);
            }
            Err(err) => debug!("{}: start ignored: {}", self.peripheral, err),
        }
    }

    pub fn try_start(
        &mut self,
        callback_tick_count: u32,
        periodic: bool,
        num_callbacks: u32,
    ) -> Result<(), TimerError> {
        self.ensure_valid()?;
        if !self.enabled {
            return Err(TimerError::NotEnabled);
        }
        if !self.config.accepts_threshold(callback_tick_count) {
            return Err(TimerError::ThresholdTooLarge {
                requested: callback_tick_count,
                max: self.config.max_rollover_tick,
            });
        }

        self.core.configure(callback_tick_count, periodic, num_callbacks);
        self.core.arm();
        self.core.driver().start_hardware(callback_tick_count);
        self.running = true;
        debug!(
            "{} running: threshold={} periodic={} callbacks={}",
            self.peripheral, callback_tick_count, periodic, num_callbacks
        );
        Ok(())
    }

    /// Stops the hardware and detaches the callback
    ///
    /// No-op on an invalid timer.
    pub fn disable(&mut self) {
        if let Err(err) = self.try_disable() {
            debug!("{}: disable ignored: {}", self.peripheral, err);
        }
    }

    pub fn try_disable(&mut self) -> Result<(), TimerError> {
        self.ensure_valid()?;
        self.shut_down();
        debug!("{} disabled", self.peripheral);
        Ok(())
    }

    fn shut_down(&mut self) {
        self.core.disarm();
        self.core.driver().stop_hardware();
        self.running = false;
        self.core.swap_callback(None);
        self.enabled = false;
    }

    /// Ticks since construction
    ///
    /// Computed as `rollovers * threshold + raw tick` in wrapping 32-bit
    /// arithmetic. The two inputs are not read atomically as a pair, so a
    /// rollover between the reads can skew the result by one period.
    /// Returns 0 on an invalid timer.
    pub fn get_tick(&self) -> u32 {
        if !self.valid() {
            return 0;
        }
        self.core.ticks()
    }

    /// Current tick count as wall-clock time
    ///
    /// Scales `get_tick()` by the tick value in `f32` and truncates to
    /// `u32`, which saturates for large counts on fast peripherals. Use
    /// [`get_tick`](Self::get_tick) and [`tick_value`](Self::tick_value)
    /// directly when range matters.
    pub fn get_time(&self) -> PreciseTime {
        if !self.valid() {
            return PreciseTime::default();
        }
        let converted = (self.get_tick() as f32 * self.config.tick_value) as u32;
        PreciseTime::from_units(converted, self.config.tick_units)
    }
}

impl<D: TimerHardware> Drop for HardwareTimer<D> {
    fn drop(&mut self) {
        if self.valid() {
            self.shut_down();
        }
    }
}

impl<D: TimerHardware> fmt::Debug for HardwareTimer<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HardwareTimer")
            .field("peripheral", &self.peripheral)
            .field("state", &self.state())
            .field("config", &self.config)
            .field("rollovers", &self.rollover_count())
            .finish()
    }
}

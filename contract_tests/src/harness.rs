//! Driver-independent timer contract checks
//!
//! Every check builds its timers in a private registry, so checks can run
//! in parallel against drivers that report the same peripheral id.

use hardware_timer::{HardwareTimer, TimerCallback, TimerRegistry, TimerState};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use timer_hal::TimerHardware;

/// Moves a driver's counter from outside the driver
///
/// Stands in for the hardware: each driver family exposes its counter
/// differently (down-counting register, latched register, simulated
/// value).
pub trait CounterControl {
    /// Makes the driver report `ticks` elapsed in a period of `threshold`
    fn set_elapsed(&self, ticks: u32, threshold: u32);
}

/// Builds a fresh driver and its counter control
pub trait DriverFactory {
    type Driver: TimerHardware;
    type Control: CounterControl;

    fn build(&self) -> (Self::Driver, Self::Control);
}

impl<D, C, F> DriverFactory for F
where
    D: TimerHardware,
    C: CounterControl,
    F: Fn() -> (D, C),
{
    type Driver = D;
    type Control = C;

    fn build(&self) -> (D, C) {
        self()
    }
}

fn private_registry() -> &'static TimerRegistry {
    Box::leak(Box::new(TimerRegistry::new()))
}

fn counting_callback() -> (TimerCallback, Arc<AtomicU32>) {
    let hits = Arc::new(AtomicU32::new(0));
    let shared = hits.clone();
    let callback = TimerCallback::new(move || {
        shared.fetch_add(1, Ordering::SeqCst);
    });
    (callback, hits)
}

fn rollover<D: TimerHardware>(registry: &TimerRegistry, timer: &HardwareTimer<D>) {
    registry
        .dispatch(timer.peripheral())
        .expect("timer should own its peripheral");
}

/// Checks every contract property against one driver family
pub fn verify_all<F: DriverFactory>(factory: &F) {
    verify_single_owner(factory);
    verify_counted_callbacks(factory);
    verify_periodic_callbacks(factory);
    verify_oversized_threshold(factory);
    verify_disable(factory);
    verify_time_conversion(factory);
}

/// A second timer on a live peripheral is invalid until the first drops
pub fn verify_single_owner<F: DriverFactory>(factory: &F) {
    let registry = private_registry();
    let (first_driver, _) = factory.build();
    let (second_driver, _) = factory.build();

    let first = HardwareTimer::with_registry(first_driver, registry);
    let second = HardwareTimer::with_registry(second_driver, registry);
    assert!(first.valid(), "first timer must own the peripheral");
    assert!(!second.valid(), "second timer must be invalid");
    assert_eq!(second.state(), TimerState::Invalid);

    drop(second);
    drop(first);
    let (third_driver, _) = factory.build();
    let third = HardwareTimer::with_registry(third_driver, registry);
    assert!(third.valid(), "peripheral must be free after the owner drops");
}

/// Counted mode delivers exactly `num_callbacks` and keeps counting ticks
pub fn verify_counted_callbacks<F: DriverFactory>(factory: &F) {
    let registry = private_registry();
    let (driver, control) = factory.build();
    let mut timer = HardwareTimer::with_registry(driver, registry);
    let (callback, hits) = counting_callback();

    timer.enable(Some(callback));
    timer.start(100, false, 3);
    for _ in 0..5 {
        rollover(registry, &timer);
    }
    control.set_elapsed(37, 100);

    assert_eq!(hits.load(Ordering::SeqCst), 3, "callback count");
    assert_eq!(timer.rollover_count(), 5);
    assert_eq!(timer.get_tick(), 5 * 100 + 37);
}

/// Periodic mode calls back on every rollover
pub fn verify_periodic_callbacks<F: DriverFactory>(factory: &F) {
    let registry = private_registry();
    let (driver, _) = factory.build();
    let mut timer = HardwareTimer::with_registry(driver, registry);
    let (callback, hits) = counting_callback();

    timer.enable(Some(callback));
    timer.start(1000, true, 1);
    for expected in 1..=25 {
        rollover(registry, &timer);
        assert_eq!(hits.load(Ordering::SeqCst), expected);
    }
}

/// A threshold above the counter's range is rejected without side effects
pub fn verify_oversized_threshold<F: DriverFactory>(factory: &F) {
    let registry = private_registry();
    let (driver, _) = factory.build();
    let mut timer = HardwareTimer::with_registry(driver, registry);
    let Some(too_large) = timer.max_callback_tick_count().checked_add(1) else {
        // Full 32-bit counters accept every threshold
        return;
    };

    timer.enable(None);
    timer.start(too_large, true, 0);
    assert!(!timer.running());

    timer.start(10, false, 2);
    timer.start(too_large, true, 0);
    assert!(timer.running());
    assert_eq!(timer.rollover_threshold(), 10);
    assert_eq!(timer.remaining_callbacks(), 2);
    assert!(!timer.periodic());
}

/// Disabling stops callbacks and leaves the timer disabled
pub fn verify_disable<F: DriverFactory>(factory: &F) {
    let registry = private_registry();
    let (driver, _) = factory.build();
    let mut timer = HardwareTimer::with_registry(driver, registry);
    let (callback, hits) = counting_callback();

    timer.enable(Some(callback));
    timer.start(50, true, 0);
    rollover(registry, &timer);
    timer.disable();
    rollover(registry, &timer);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(!timer.running());
    assert!(!timer.enabled());
    assert_eq!(timer.state(), TimerState::Disabled);
}

/// Wall-clock time is the tick count scaled into the driver's unit
pub fn verify_time_conversion<F: DriverFactory>(factory: &F) {
    let registry = private_registry();
    let (driver, control) = factory.build();
    let mut timer = HardwareTimer::with_registry(driver, registry);
    let config = timer.config();

    timer.enable(None);
    timer.start(1000, true, 0);
    for _ in 0..3 {
        rollover(registry, &timer);
    }
    control.set_elapsed(500, 1000);

    let tick = timer.get_tick();
    assert_eq!(tick, 3500);
    let expected = (tick as f32 * config.tick_value) as u32;
    assert_eq!(timer.get_time().to_units(config.tick_units), expected);
}

//! # Periodic Interrupt Timer (PIT)
//!
//! Channel 0 of the KL46Z PIT as a [`TimerHardware`] driver.
//!
//! ## Hardware Details
//!
//! - Clocked from the 24 MHz bus clock: one tick is 41.666666 ns
//! - 32-bit down-counter, reloaded from LDVAL when it reaches zero
//! - Raw ticks are reported as elapsed ticks, `LDVAL - CVAL`

use crate::interrupts::{enable_irq, Irq};
use crate::register_bus::RegisterBus;
use crate::registers::{pit, sim};
use crate::PIT;
use timer_hal::{PeripheralId, TimeUnit, TimerConfig, TimerHardware};

/// PIT channel 0 driver
#[derive(Debug)]
pub struct PitTimer<B: RegisterBus> {
    bus: B,
}

impl<B: RegisterBus> PitTimer<B> {
    /// 32-bit counter at 24 MHz
    pub const CONFIG: TimerConfig = TimerConfig::new(u32::MAX, 41.666_666, TimeUnit::Nanoseconds);

    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<B: RegisterBus> TimerHardware for PitTimer<B> {
    fn peripheral(&self) -> PeripheralId {
        PIT
    }

    fn config(&self) -> TimerConfig {
        Self::CONFIG
    }

    fn raw_tick(&self) -> u32 {
        let current = self.bus.read32(pit::CVAL0);
        let reload = self.bus.read32(pit::LDVAL0);
        reload.wrapping_sub(current)
    }

    fn init_hardware(&self) {
        self.bus.modify32(sim::SCGC6, |v| v | sim::SCGC6_PIT);
        // Channel setup happens with the module disabled
        self.bus.modify32(pit::MCR, |v| v | pit::MCR_MDIS);
        enable_irq(&self.bus, Irq::Pit);
        self.bus.modify32(pit::TCTRL0, |v| v | pit::TCTRL_TIE);
        self.bus.modify32(pit::MCR, |v| v & !pit::MCR_MDIS);
    }

    fn start_hardware(&self, rollover_threshold: u32) {
        self.bus.write32(pit::LDVAL0, rollover_threshold);
        self.bus.modify32(pit::TCTRL0, |v| v | pit::TCTRL_TEN);
    }

    fn stop_hardware(&self) {
        self.bus.modify32(pit::TCTRL0, |v| v & !pit::TCTRL_TEN);
    }

    fn acknowledge_rollover(&self, _rollover_threshold: u32) {
        self.bus.write32(pit::TFLG0, pit::TFLG_TIF);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register_bus::FakeRegisterBus;
    use crate::registers::nvic;

    fn pit() -> (PitTimer<FakeRegisterBus>, FakeRegisterBus) {
        let bus = FakeRegisterBus::new();
        (PitTimer::new(bus.clone()), bus)
    }

    #[test]
    fn test_config_constants() {
        let (timer, _) = pit();
        let config = timer.config();
        assert_eq!(config.max_rollover_tick, 0xFFFF_FFFF);
        assert_eq!(config.tick_units, TimeUnit::Nanoseconds);
        assert!((config.tick_value - 41.666_666).abs() < 1e-4);
        assert_eq!(timer.peripheral(), PIT);
    }

    #[test]
    fn test_init_sequence() {
        let (timer, bus) = pit();
        timer.init_hardware();

        assert_eq!(
            bus.writes(),
            vec![
                (sim::SCGC6, sim::SCGC6_PIT),
                (pit::MCR, pit::MCR_MDIS),
                (nvic::ISER, 1 << 22),
                (pit::TCTRL0, pit::TCTRL_TIE),
                (pit::MCR, 0),
            ]
        );
    }

    #[test]
    fn test_init_keeps_other_clock_gates() {
        let (timer, bus) = pit();
        bus.write32(sim::SCGC6, sim::SCGC6_TPM0);
        timer.init_hardware();
        assert_eq!(bus.peek(sim::SCGC6), sim::SCGC6_TPM0 | sim::SCGC6_PIT);
    }

    #[test]
    fn test_start_and_stop() {
        let (timer, bus) = pit();
        timer.init_hardware();
        bus.clear_writes();

        timer.start_hardware(24_000);
        assert_eq!(
            bus.writes(),
            vec![
                (pit::LDVAL0, 24_000),
                (pit::TCTRL0, pit::TCTRL_TIE | pit::TCTRL_TEN),
            ]
        );

        timer.stop_hardware();
        assert_eq!(bus.peek(pit::TCTRL0), pit::TCTRL_TIE);
    }

    #[test]
    fn test_raw_tick_counts_down() {
        let (timer, bus) = pit();
        timer.start_hardware(1000);

        bus.pin(pit::CVAL0, 1000);
        assert_eq!(timer.raw_tick(), 0);
        bus.pin(pit::CVAL0, 250);
        assert_eq!(timer.raw_tick(), 750);
    }

    #[test]
    fn test_acknowledge_clears_flag() {
        let (timer, bus) = pit();
        timer.acknowledge_rollover(1000);
        assert_eq!(bus.writes(), vec![(pit::TFLG0, pit::TFLG_TIF)]);
    }
}

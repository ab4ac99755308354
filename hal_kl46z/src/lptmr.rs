//! # Low-Power Timer (LPTMR0)
//!
//! LPTMR0 as a millisecond [`TimerHardware`] driver.
//!
//! ## Hardware Details
//!
//! - Clocked from the slow internal reference (32 kHz MCGIRCLK) divided
//!   by 32: one tick is 1 ms
//! - 16-bit up-counter compared against CMR
//! - CNR must be written before a read returns the current count

use crate::interrupts::{enable_irq, Irq};
use crate::register_bus::RegisterBus;
use crate::registers::{lptmr0, mcg, sim};
use crate::LPTMR0;
use timer_hal::{PeripheralId, TimeUnit, TimerConfig, TimerHardware};

const COUNTER_MASK: u32 = 0xFFFF;

/// LPTMR0 driver
#[derive(Debug)]
pub struct LptmrTimer<B: RegisterBus> {
    bus: B,
}

impl<B: RegisterBus> LptmrTimer<B> {
    /// 16-bit counter at 1 kHz
    pub const CONFIG: TimerConfig = TimerConfig::new(0xFFFF, 1.0, TimeUnit::Milliseconds);

    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<B: RegisterBus> TimerHardware for LptmrTimer<B> {
    fn peripheral(&self) -> PeripheralId {
        LPTMR0
    }

    fn config(&self) -> TimerConfig {
        Self::CONFIG
    }

    fn raw_tick(&self) -> u32 {
        self.bus.write32(lptmr0::CNR, 0);
        self.bus.read32(lptmr0::CNR) & COUNTER_MASK
    }

    fn init_hardware(&self) {
        self.bus.modify8(mcg::C2, |v| v & !mcg::C2_IRCS);
        self.bus.modify8(mcg::C1, |v| v | mcg::C1_IRCLKEN);
        self.bus.modify32(sim::SCGC5, |v| v | sim::SCGC5_LPTMR);

        self.bus.write32(lptmr0::PSR, lptmr0::PSR_PCS_MCGIRCLK);
        self.bus.modify32(lptmr0::PSR, |v| v | lptmr0::PSR_PRESCALE_DIV32);
        self.bus.write32(lptmr0::CSR, 0);
        enable_irq(&self.bus, Irq::Lptmr0);
    }

    fn start_hardware(&self, rollover_threshold: u32) {
        self.bus.write32(lptmr0::CMR, rollover_threshold & COUNTER_MASK);
        self.bus.modify32(lptmr0::CSR, |v| v | lptmr0::CSR_TIE);
        self.bus.modify32(lptmr0::CSR, |v| v | lptmr0::CSR_TEN);
    }

    fn stop_hardware(&self) {
        self.bus.write32(lptmr0::CSR, 0);
    }

    fn acknowledge_rollover(&self, _rollover_threshold: u32) {
        self.bus.modify32(lptmr0::CSR, |v| v | lptmr0::CSR_TCF);
    }
}

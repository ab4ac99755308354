//! # Timer/PWM Module 0 (TPM0)
//!
//! TPM0 as a free-running [`TimerHardware`] driver.
//!
//! ## Hardware Details
//!
//! - Clocked from MCGFLLCLK (48 MHz), prescaler 1: one tick is 20.833333 ns
//! - 16-bit up-counter that overflows at MOD
//! - CNT must be written before a read returns the current count
//! - MOD is reprogrammed on every overflow

use crate::interrupts::{enable_irq, Irq};
use crate::register_bus::RegisterBus;
use crate::registers::{sim, tpm0};
use crate::TPM0;
use timer_hal::{PeripheralId, TimeUnit, TimerConfig, TimerHardware};

const COUNTER_MASK: u32 = 0xFFFF;

/// TPM0 driver
#[derive(Debug)]
pub struct TpmTimer<B: RegisterBus> {
    bus: B,
}

impl<B: RegisterBus> TpmTimer<B> {
    /// 16-bit counter at 48 MHz
    pub const CONFIG: TimerConfig = TimerConfig::new(0xFFFF, 20.833_334, TimeUnit::Nanoseconds);

    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<B: RegisterBus> TimerHardware for TpmTimer<B> {
    fn peripheral(&self) -> PeripheralId {
        TPM0
    }

    fn config(&self) -> TimerConfig {
        Self::CONFIG
    }

    fn raw_tick(&self) -> u32 {
        // Latch, then read the latched count
        self.bus.write32(tpm0::CNT, 0);
        self.bus.read32(tpm0::CNT) & COUNTER_MASK
    }

    fn init_hardware(&self) {
        self.bus.modify32(sim::SOPT2, |v| {
            (v & !sim::SOPT2_TPMSRC_MASK) | sim::SOPT2_TPMSRC_MCGFLLCLK
        });
        self.bus.modify32(sim::SCGC6, |v| v | sim::SCGC6_TPM0);

        self.bus.write32(tpm0::SC, 0);
        self.bus.write32(tpm0::SC, tpm0::SC_PS_DIV1);
        self.bus.write32(tpm0::CNT, 0);
        enable_irq(&self.bus, Irq::Tpm0);
    }

    fn start_hardware(&self, rollover_threshold: u32) {
        self.bus.write32(tpm0::MOD, rollover_threshold & COUNTER_MASK);
        self.bus.modify32(tpm0::SC, |v| v | tpm0::SC_TOIE);
        self.bus.modify32(tpm0::SC, |v| v | tpm0::SC_CMOD_COUNTER);
    }

    fn stop_hardware(&self) {
        self.bus.write32(tpm0::SC, 0);
    }

    fn acknowledge_rollover(&self, rollover_threshold: u32) {
        self.bus.modify32(tpm0::SC, |v| v | tpm0::SC_TOF);
        self.bus.write32(tpm0::MOD, rollover_threshold & COUNTER_MASK);
    }
}

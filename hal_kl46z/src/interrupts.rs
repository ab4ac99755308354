//! Timer interrupt lines and entry points
//!
//! The board's vector table calls the entry point of each timer interrupt.
//! An entry point does no work of its own: it forwards the rollover to
//! whichever timer currently owns the peripheral in the global registry.

use crate::register_bus::RegisterBus;
use crate::registers::nvic;
use crate::{LPTMR0, PIT, TPM0};
use hardware_timer::TimerRegistry;
use timer_hal::PeripheralId;

/// NVIC interrupt lines of the timer peripherals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Irq {
    Tpm0 = 17,
    Pit = 22,
    Lptmr0 = 28,
}

impl Irq {
    /// NVIC interrupt number
    pub const fn number(self) -> u32 {
        self as u32
    }

    /// Peripheral that raises this interrupt
    pub const fn peripheral(self) -> PeripheralId {
        match self {
            Irq::Tpm0 => TPM0,
            Irq::Pit => PIT,
            Irq::Lptmr0 => LPTMR0,
        }
    }
}

/// Unmasks `irq` in the NVIC
pub fn enable_irq<B: RegisterBus>(bus: &B, irq: Irq) {
    // ISER is write-1-to-set; zero bits leave other lines untouched
    bus.write32(nvic::ISER, 1 << irq.number());
}

/// Delivers one rollover of `irq`'s peripheral to its owner
pub fn handle_irq(irq: Irq) {
    // A rollover nobody owns has nobody to count it
    let _ = TimerRegistry::global().dispatch(irq.peripheral());
}

/// PIT interrupt entry point
pub fn pit_interrupt() {
    handle_irq(Irq::Pit);
}

/// TPM0 interrupt entry point
pub fn tpm0_interrupt() {
    handle_irq(Irq::Tpm0);
}

/// LPTMR0 interrupt entry point
pub fn lptmr0_interrupt() {
    handle_irq(Irq::Lptmr0);
}

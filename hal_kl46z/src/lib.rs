//! # KL46Z Timer Drivers
//!
//! This crate implements [`TimerHardware`] for the three timer peripherals
//! of the NXP KL46Z (FRDM-KL46Z board).
//!
//! ## Drivers
//!
//! | Driver | Counter | Tick |
//! |---|---|---|
//! | [`PitTimer`] | 32-bit down, 24 MHz bus clock | 41.666666 ns |
//! | [`TpmTimer`] | 16-bit up, 48 MHz MCGFLLCLK | 20.833333 ns |
//! | [`LptmrTimer`] | 16-bit up, 32 kHz IRC / 32 | 1 ms |
//!
//! ## Design Notes
//!
//! - All register access goes through [`RegisterBus`]; tests run the
//!   drivers over [`FakeRegisterBus`]
//! - Unsafe code is confined to [`MmioBus`]
//! - The interrupt entry points in [`interrupts`] dispatch through the
//!   global timer registry
//!
//! [`TimerHardware`]: timer_hal::TimerHardware

use timer_hal::PeripheralId;

pub mod interrupts;
pub mod lptmr;
pub mod pit;
pub mod register_bus;
pub mod registers;
pub mod tpm;

pub use interrupts::{lptmr0_interrupt, pit_interrupt, tpm0_interrupt, Irq};
pub use lptmr::LptmrTimer;
pub use pit::PitTimer;
pub use register_bus::{FakeRegisterBus, MmioBus, RegisterBus};
pub use tpm::TpmTimer;

/// Periodic Interrupt Timer, channel 0
pub const PIT: PeripheralId = PeripheralId::new(0);
/// Timer/PWM Module 0
pub const TPM0: PeripheralId = PeripheralId::new(1);
/// Low-Power Timer 0
pub const LPTMR0: PeripheralId = PeripheralId::new(2);

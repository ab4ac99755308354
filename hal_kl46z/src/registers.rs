//! KL46Z register addresses and bit fields used by the timer drivers
//!
//! Only the registers the drivers touch are listed. Addresses are from the
//! KL46 Sub-Family Reference Manual.

/// System Integration Module
pub mod sim {
    const BASE: usize = 0x4004_7000;

    pub const SOPT2: usize = BASE + 0x1004;
    pub const SCGC5: usize = BASE + 0x1038;
    pub const SCGC6: usize = BASE + 0x103C;

    pub const SOPT2_TPMSRC_MASK: u32 = 0b11 << 24;
    /// TPM clock source: MCGFLLCLK (48 MHz)
    pub const SOPT2_TPMSRC_MCGFLLCLK: u32 = 0b01 << 24;

    pub const SCGC5_LPTMR: u32 = 1 << 0;
    pub const SCGC6_PIT: u32 = 1 << 23;
    pub const SCGC6_TPM0: u32 = 1 << 24;
}

/// Multipurpose Clock Generator (8-bit registers)
pub mod mcg {
    const BASE: usize = 0x4006_4000;

    pub const C1: usize = BASE;
    pub const C2: usize = BASE + 0x1;

    /// MCGIRCLK enable
    pub const C1_IRCLKEN: u8 = 1 << 1;
    /// Fast internal reference when set, slow (32 kHz) when clear
    pub const C2_IRCS: u8 = 1 << 0;
}

/// Periodic Interrupt Timer, channel 0
pub mod pit {
    const BASE: usize = 0x4003_7000;

    pub const MCR: usize = BASE;
    pub const LDVAL0: usize = BASE + 0x100;
    pub const CVAL0: usize = BASE + 0x104;
    pub const TCTRL0: usize = BASE + 0x108;
    pub const TFLG0: usize = BASE + 0x10C;

    /// Module disable
    pub const MCR_MDIS: u32 = 1 << 1;
    pub const TCTRL_TEN: u32 = 1 << 0;
    pub const TCTRL_TIE: u32 = 1 << 1;
    /// Write 1 to clear
    pub const TFLG_TIF: u32 = 1 << 0;
}

/// Timer/PWM Module 0
pub mod tpm0 {
    const BASE: usize = 0x4003_8000;

    pub const SC: usize = BASE;
    pub const CNT: usize = BASE + 0x4;
    pub const MOD: usize = BASE + 0x8;

    /// Prescaler divide-by-1
    pub const SC_PS_DIV1: u32 = 0b000;
    /// Counter increments on every TPM clock
    pub const SC_CMOD_COUNTER: u32 = 0b01 << 3;
    pub const SC_TOIE: u32 = 1 << 6;
    /// Write 1 to clear
    pub const SC_TOF: u32 = 1 << 7;
}

/// Low-Power Timer 0
pub mod lptmr0 {
    const BASE: usize = 0x4004_0000;

    pub const CSR: usize = BASE;
    pub const PSR: usize = BASE + 0x4;
    pub const CMR: usize = BASE + 0x8;
    pub const CNR: usize = BASE + 0xC;

    pub const CSR_TEN: u32 = 1 << 0;
    pub const CSR_TIE: u32 = 1 << 6;
    /// Write 1 to clear
    pub const CSR_TCF: u32 = 1 << 7;

    /// Prescaler clock: MCGIRCLK
    pub const PSR_PCS_MCGIRCLK: u32 = 0b00;
    /// Divide by 2^(4 + 1) = 32
    pub const PSR_PRESCALE_DIV32: u32 = 4 << 3;
}

/// Nested Vectored Interrupt Controller
pub mod nvic {
    /// Interrupt set-enable register
    pub const ISER: usize = 0xE000_E100;
}

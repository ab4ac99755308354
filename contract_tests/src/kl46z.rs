//! Timer contract against the KL46Z drivers over a fake register bus

use crate::harness::CounterControl;
use hal_kl46z::registers::{lptmr0, pit, tpm0};
use hal_kl46z::FakeRegisterBus;

/// PIT counts down from LDVAL
pub struct PitCounter(pub FakeRegisterBus);

impl CounterControl for PitCounter {
    fn set_elapsed(&self, ticks: u32, threshold: u32) {
        self.0.pin(pit::CVAL0, threshold.wrapping_sub(ticks));
    }
}

/// TPM0 counts up in CNT
pub struct TpmCounter(pub FakeRegisterBus);

impl CounterControl for TpmCounter {
    fn set_elapsed(&self, ticks: u32, _threshold: u32) {
        self.0.pin(tpm0::CNT, ticks);
    }
}

/// LPTMR0 counts up in CNR
pub struct LptmrCounter(pub FakeRegisterBus);

impl CounterControl for LptmrCounter {
    fn set_elapsed(&self, ticks: u32, _threshold: u32) {
        self.0.pin(lptmr0::CNR, ticks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::verify_all;
    use hal_kl46z::{LptmrTimer, PitTimer, TpmTimer};

    #[test]
    fn test_pit_contract() {
        verify_all(&|| {
            let bus = FakeRegisterBus::new();
            (PitTimer::new(bus.clone()), PitCounter(bus))
        });
    }

    #[test]
    fn test_tpm_contract() {
        verify_all(&|| {
            let bus = FakeRegisterBus::new();
            (TpmTimer::new(bus.clone()), TpmCounter(bus))
        });
    }

    #[test]
    fn test_lptmr_contract() {
        verify_all(&|| {
            let bus = FakeRegisterBus::new();
            (LptmrTimer::new(bus.clone()), LptmrCounter(bus))
        });
    }
}

//! Timer contract against the simulated driver

use crate::harness::CounterControl;
use sim_timer::SimTimerMonitor;

impl CounterControl for SimTimerMonitor {
    fn set_elapsed(&self, ticks: u32, _threshold: u32) {
        self.set_raw_tick(ticks);
    }
}

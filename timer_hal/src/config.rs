//! Construction-time timer configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time_types::TimeUnit;

/// Errors from validating a [`TimerConfig`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Tick value is NaN or infinite
    #[error("tick value is not finite: {0}")]
    NonFiniteTickValue(f32),

    /// Tick value is zero or negative
    #[error("tick value must be positive: {0}")]
    NonPositiveTickValue(f32),
}

/// Fixed per-peripheral constants
///
/// Parameterizes one timer contract at construction and never changes
/// afterwards.
///
/// # Examples
///
/// ```
/// use timer_hal::{TimerConfig, TimeUnit};
///
/// // 16-bit counter clocked at 1 kHz
/// let config = TimerConfig::new(0xFFFF, 1.0, TimeUnit::Milliseconds);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.tick_seconds(), 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Largest rollover threshold the counter can hold
    pub max_rollover_tick: u32,
    /// Length of one tick, in `tick_units`
    pub tick_value: f32,
    /// Unit of `tick_value`
    pub tick_units: TimeUnit,
}

impl TimerConfig {
    pub const fn new(max_rollover_tick: u32, tick_value: f32, tick_units: TimeUnit) -> Self {
        Self {
            max_rollover_tick,
            tick_value,
            tick_units,
        }
    }

    /// Checks that the tick scale is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tick_value.is_finite() {
            return Err(ConfigError::NonFiniteTickValue(self.tick_value));
        }
        if self.tick_value <= 0.0 {
            return Err(ConfigError::NonPositiveTickValue(self.tick_value));
        }
        Ok(())
    }

    /// Returns true if `threshold` fits the counter
    pub const fn accepts_threshold(&self, threshold: u32) -> bool {
        threshold <= self.max_rollover_tick
    }

    /// Length of one tick in seconds
    pub fn tick_seconds(&self) -> f32 {
        self.tick_value * self.tick_units.seconds_per_unit()
    }
}

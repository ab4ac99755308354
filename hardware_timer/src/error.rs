//! Error types for timer and registry operations

use thiserror::Error;
use timer_hal::{ConfigError, PeripheralId};

/// Errors from the ownership registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Another timer already owns the peripheral
    #[error("{0} is already owned")]
    AlreadyOwned(PeripheralId),

    /// Nothing owns the peripheral
    #[error("{0} has no owner")]
    NotOwned(PeripheralId),

    /// The id has no registry slot
    #[error("{0} is outside the registry range")]
    OutOfRange(PeripheralId),
}

/// Errors from timer lifecycle operations
///
/// The no-op forms (`enable`, `start`, `disable`) swallow these; the
/// `try_*` forms return them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimerError {
    /// The timer does not own its peripheral
    #[error("timer is invalid")]
    Invalid,

    /// `start` before `enable`
    #[error("timer is not enabled")]
    NotEnabled,

    /// Threshold does not fit the peripheral counter
    #[error("rollover threshold {requested} exceeds maximum {max}")]
    ThresholdTooLarge { requested: u32, max: u32 },

    /// Ownership could not be acquired
    #[error("ownership: {0}")]
    Registry(#[from] RegistryError),

    /// Driver declared unusable constants
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
}

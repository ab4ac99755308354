//! Peripheral identity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of distinct peripheral identities the ownership registry tracks
pub const MAX_PERIPHERALS: usize = 16;

/// Identifies one physical timer peripheral
///
/// Two drivers reporting the same id contend for the same hardware and
/// can never both be owned. Board crates define named constants for the
/// peripherals they support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeripheralId(u8);

impl PeripheralId {
    /// Creates a peripheral id from its raw index
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Returns the raw index
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns true if the registry has a slot for this id
    pub const fn is_tracked(self) -> bool {
        self.index() < MAX_PERIPHERALS
    }
}

impl fmt::Display for PeripheralId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Peripheral({})", self.0)
    }
}

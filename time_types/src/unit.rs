//! Tick units

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit in which a peripheral's tick value is expressed
///
/// Ordered from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    #[serde(rename = "ns")]
    Nanoseconds,
    #[serde(rename = "us")]
    Microseconds,
    #[serde(rename = "ms")]
    Milliseconds,
    #[serde(rename = "s")]
    Seconds,
    #[serde(rename = "m")]
    Minutes,
    #[serde(rename = "h")]
    Hours,
}

impl TimeUnit {
    /// All units, finest first.
    pub const ALL: [TimeUnit; 6] = [
        TimeUnit::Nanoseconds,
        TimeUnit::Microseconds,
        TimeUnit::Milliseconds,
        TimeUnit::Seconds,
        TimeUnit::Minutes,
        TimeUnit::Hours,
    ];

    /// Returns the length of one unit in seconds
    pub const fn seconds_per_unit(self) -> f32 {
        match self {
            TimeUnit::Nanoseconds => 1e-9,
            TimeUnit::Microseconds => 1e-6,
            TimeUnit::Milliseconds => 1e-3,
            TimeUnit::Seconds => 1.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Hours => 3600.0,
        }
    }

    /// Returns the short symbol used in configuration (`ns`, `us`, ...)
    pub const fn symbol(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "m",
            TimeUnit::Hours => "h",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_per_unit_lookup() {
        assert_eq!(TimeUnit::Nanoseconds.seconds_per_unit(), 1e-9);
        assert_eq!(TimeUnit::Microseconds.seconds_per_unit(), 1e-6);
        assert_eq!(TimeUnit::Milliseconds.seconds_per_unit(), 1e-3);
        assert_eq!(TimeUnit::Seconds.seconds_per_unit(), 1.0);
        assert_eq!(TimeUnit::Minutes.seconds_per_unit(), 60.0);
        assert_eq!(TimeUnit::Hours.seconds_per_unit(), 3600.0);
    }

    #[test]
    fn test_units_ordered_finest_first() {
        for pair in TimeUnit::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].seconds_per_unit() < pair[1].seconds_per_unit());
        }
    }

    #[test]
    fn test_serde_uses_symbols() {
        let json = serde_json::to_string(&TimeUnit::Microseconds).unwrap();
        assert_eq!(json, "\"us\"");

        let unit: TimeUnit = serde_json::from_str("\"h\"").unwrap();
        assert_eq!(unit, TimeUnit::Hours);
        assert_eq!(unit.to_string(), "h");
    }
}

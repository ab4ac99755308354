//! # Precise Time
//!
//! A wall-clock shaped quantity: `hour:minute:second:ms:us:ns`.
//!
//! ## Conversions
//!
//! `from_*` builds a value from a flat count by cascading integer
//! division and modulo up to hours. `to_*` folds the fields back down,
//! multiplying by the radix at each step (60, 60, 1000, 1000, 1000).
//! For any count that fits in a `u32`, `to_x(from_x(n)) == n`.
//!
//! Folding to a finer unit than the value was built from can exceed
//! `u32`; the flattened form wraps in that case. Hours never wrap.

use crate::unit::TimeUnit;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const NS_PER_US: u32 = 1000;
pub const US_PER_MS: u32 = 1000;
pub const MS_PER_SEC: u32 = 1000;
pub const SEC_PER_MIN: u32 = 60;
pub const MIN_PER_HOUR: u32 = 60;

/// Errors from building a [`PreciseTime`] out of raw fields
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// A field is not below its modulus
    #[error("{field} out of range: {value} (must be < {limit})")]
    FieldOutOfRange {
        field: &'static str,
        value: u32,
        limit: u32,
    },
}

/// Wall-clock time value
///
/// Immutable once built. Every field except `hour` is kept below its
/// natural modulus.
///
/// # Examples
///
/// ```
/// use time_types::PreciseTime;
///
/// let t = PreciseTime::from_ms(3_723_004);
/// assert_eq!((t.hour(), t.minute(), t.second(), t.millisecond()), (1, 2, 3, 4));
/// assert_eq!(PreciseTime::to_ms(t), 3_723_004);
/// assert_eq!(t.to_string(), "01:02:03:004:000:000");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "PreciseTimeFields")]
pub struct PreciseTime {
    hour: u32,
    minute: u32,
    second: u32,
    millisecond: u32,
    microsecond: u32,
    nanosecond: u32,
}

/// Unchecked wire shape used for deserialization
#[derive(Deserialize)]
struct PreciseTimeFields {
    hour: u32,
    minute: u32,
    second: u32,
    millisecond: u32,
    microsecond: u32,
    nanosecond: u32,
}

impl TryFrom<PreciseTimeFields> for PreciseTime {
    type Error = TimeError;

    fn try_from(raw: PreciseTimeFields) -> Result<Self, Self::Error> {
        PreciseTime::new(
            raw.hour,
            raw.minute,
            raw.second,
            raw.millisecond,
            raw.microsecond,
            raw.nanosecond,
        )
    }
}

fn check(field: &'static str, value: u32, limit: u32) -> Result<u32, TimeError> {
    if value < limit {
        Ok(value)
    } else {
        Err(TimeError::FieldOutOfRange {
            field,
            value,
            limit,
        })
    }
}

impl PreciseTime {
    /// The zero time value
    pub const ZERO: PreciseTime = PreciseTime {
        hour: 0,
        minute: 0,
        second: 0,
        millisecond: 0,
        microsecond: 0,
        nanosecond: 0,
    };

    /// Builds a value from individual fields, rejecting out-of-range ones
    pub fn new(
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
        microsecond: u32,
        nanosecond: u32,
    ) -> Result<Self, TimeError> {
        Ok(Self {
            hour,
            minute: check("minute", minute, MIN_PER_HOUR)?,
            second: check("second", second, SEC_PER_MIN)?,
            millisecond: check("millisecond", millisecond, MS_PER_SEC)?,
            microsecond: check("microsecond", microsecond, US_PER_MS)?,
            nanosecond: check("nanosecond", nanosecond, NS_PER_US)?,
        })
    }

    pub const fn hour(&self) -> u32 {
        self.hour
    }

    pub const fn minute(&self) -> u32 {
        self.minute
    }

    pub const fn second(&self) -> u32 {
        self.second
    }

    pub const fn millisecond(&self) -> u32 {
        self.millisecond
    }

    pub const fn microsecond(&self) -> u32 {
        self.microsecond
    }

    pub const fn nanosecond(&self) -> u32 {
        self.nanosecond
    }

    /// Converts a whole number of hours
    pub const fn from_h(h: u32) -> Self {
        Self { hour: h, ..Self::ZERO }
    }

    /// Converts a whole number of minutes
    pub const fn from_m(m: u32) -> Self {
        Self {
            minute: m % MIN_PER_HOUR,
            ..Self::from_h(m / MIN_PER_HOUR)
        }
    }

    /// Converts a whole number of seconds
    pub const fn from_s(s: u32) -> Self {
        Self {
            second: s % SEC_PER_MIN,
            ..Self::from_m(s / SEC_PER_MIN)
        }
    }

    /// Converts a whole number of milliseconds
    pub const fn from_ms(ms: u32) -> Self {
        Self {
            millisecond: ms % MS_PER_SEC,
            ..Self::from_s(ms / MS_PER_SEC)
        }
    }

    /// Converts a whole number of microseconds
    pub const fn from_us(us: u32) -> Self {
        Self {
            microsecond: us % US_PER_MS,
            ..Self::from_ms(us / US_PER_MS)
        }
    }

    /// Converts a whole number of nanoseconds
    pub const fn from_ns(ns: u32) -> Self {
        Self {
            nanosecond: ns % NS_PER_US,
            ..Self::from_us(ns / NS_PER_US)
        }
    }

    /// Converts a count expressed in `unit`
    pub const fn from_units(value: u32, unit: TimeUnit) -> Self {
        match unit {
            TimeUnit::Nanoseconds => Self::from_ns(value),
            TimeUnit::Microseconds => Self::from_us(value),
            TimeUnit::Milliseconds => Self::from_ms(value),
            TimeUnit::Seconds => Self::from_s(value),
            TimeUnit::Minutes => Self::from_m(value),
            TimeUnit::Hours => Self::from_h(value),
        }
    }

    /// Whole hours in `t`
    pub const fn to_h(t: PreciseTime) -> u32 {
        t.hour
    }

    /// Whole minutes in `t`
    pub const fn to_m(t: PreciseTime) -> u32 {
        Self::to_h(t).wrapping_mul(MIN_PER_HOUR).wrapping_add(t.minute)
    }

    /// Whole seconds in `t`
    pub const fn to_s(t: PreciseTime) -> u32 {
        Self::to_m(t).wrapping_mul(SEC_PER_MIN).wrapping_add(t.second)
    }

    /// Whole milliseconds in `t`
    pub const fn to_ms(t: PreciseTime) -> u32 {
        Self::to_s(t).wrapping_mul(MS_PER_SEC).wrapping_add(t.millisecond)
    }

    /// Whole microseconds in `t`
    pub const fn to_us(t: PreciseTime) -> u32 {
        Self::to_ms(t).wrapping_mul(US_PER_MS).wrapping_add(t.microsecond)
    }

    /// Whole nanoseconds in `t`
    pub const fn to_ns(t: PreciseTime) -> u32 {
        Self::to_us(t).wrapping_mul(NS_PER_US).wrapping_add(t.nanosecond)
    }

    /// Flattens `self` into `unit`, dropping finer fields
    pub const fn to_units(self, unit: TimeUnit) -> u32 {
        match unit {
            TimeUnit::Nanoseconds => Self::to_ns(self),
            TimeUnit::Microseconds => Self::to_us(self),
            TimeUnit::Milliseconds => Self::to_ms(self),
            TimeUnit::Seconds => Self::to_s(self),
            TimeUnit::Minutes => Self::to_m(self),
            TimeUnit::Hours => Self::to_h(self),
        }
    }
}

impl fmt::Display for PreciseTime {
    /// Renders `HH:MM:SS:mmm:uuu:nnn`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:03}:{:03}:{:03}",
            self.hour, self.minute, self.second, self.millisecond, self.microsecond, self.nanosecond
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic sample of the u32 range, edges included
    fn samples() -> Vec<u32> {
        let mut values = vec![
            0,
            1,
            59,
            60,
            61,
            999,
            1000,
            1001,
            3599,
            3600,
            u32::MAX - 1,
            u32::MAX,
        ];
        let mut x: u32 = 0x1234_5678;
        for _ in 0..2000 {
            x = x.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            values.push(x);
        }
        values
    }

    #[test]
    fn test_round_trip_every_unit() {
        for unit in TimeUnit::ALL {
            for value in samples() {
                let t = PreciseTime::from_units(value, unit);
                assert_eq!(t.to_units(unit), value, "unit {} value {}", unit, value);
            }
        }
    }

    #[test]
    fn test_fields_stay_below_modulus() {
        for value in samples() {
            let t = PreciseTime::from_ns(value);
            assert!(t.minute() < MIN_PER_HOUR);
            assert!(t.second() < SEC_PER_MIN);
            assert!(t.millisecond() < MS_PER_SEC);
            assert!(t.microsecond() < US_PER_MS);
            assert!(t.nanosecond() < NS_PER_US);
        }
    }

    #[test]
    fn test_unit_ladder_composes() {
        for value in samples() {
            let t = PreciseTime::from_ns(value);
            assert_eq!(PreciseTime::to_ns(t), value);
            assert_eq!(
                PreciseTime::to_ns(t),
                PreciseTime::to_us(t) * 1000 + t.nanosecond()
            );
            assert_eq!(
                PreciseTime::to_us(t),
                PreciseTime::to_ms(t) * 1000 + t.microsecond()
            );
            assert_eq!(
                PreciseTime::to_ms(t),
                PreciseTime::to_s(t) * 1000 + t.millisecond()
            );
            assert_eq!(PreciseTime::to_s(t), PreciseTime::to_m(t) * 60 + t.second());
            assert_eq!(PreciseTime::to_m(t), PreciseTime::to_h(t) * 60 + t.minute());

            // Coarser inputs fold into nanoseconds with wrapping
            let t = PreciseTime::from_us(value);
            assert_eq!(t.nanosecond(), 0);
            assert_eq!(
                PreciseTime::to_ns(t),
                PreciseTime::to_us(t).wrapping_mul(1000)
            );
            assert_eq!(PreciseTime::to_m(t), PreciseTime::to_h(t) * 60 + t.minute());
            assert_eq!(PreciseTime::to_s(t), PreciseTime::to_m(t) * 60 + t.second());
            assert_eq!(
                PreciseTime::to_ms(t),
                PreciseTime::to_s(t) * 1000 + t.millisecond()
            );
            assert_eq!(
                PreciseTime::to_us(t),
                PreciseTime::to_ms(t) * 1000 + t.microsecond()
            );
        }
    }

    #[test]
    fn test_decomposition_of_known_values() {
        let t = PreciseTime::from_ns(u32::MAX);
        // 4_294_967_295 ns = 4 s 294 ms 967 us 295 ns
        assert_eq!(t, PreciseTime::new(0, 0, 4, 294, 967, 295).unwrap());

        let t = PreciseTime::from_s(90_061);
        assert_eq!(t, PreciseTime::new(25, 1, 1, 0, 0, 0).unwrap());

        let t = PreciseTime::from_m(125);
        assert_eq!((t.hour(), t.minute()), (2, 5));
    }

    #[test]
    fn test_hours_never_wrap() {
        let t = PreciseTime::from_h(u32::MAX);
        assert_eq!(t.hour(), u32::MAX);
        assert_eq!(PreciseTime::to_h(t), u32::MAX);

        let t = PreciseTime::from_m(u32::MAX);
        assert_eq!(t.hour(), u32::MAX / 60);
        assert_eq!(t.minute(), u32::MAX % 60);
    }

    #[test]
    fn test_finer_fold_wraps() {
        let t = PreciseTime::from_h(2_000_000);
        let expected = (2_000_000u128 * 3_600_000_000_000u128) % (1u128 << 32);
        assert_eq!(PreciseTime::to_ns(t), expected as u32);
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(PreciseTime::default().to_string(), "00:00:00:000:000:000");
        let t = PreciseTime::new(123, 4, 5, 6, 7, 8).unwrap();
        assert_eq!(t.to_string(), "123:04:05:006:007:008");
    }

    #[test]
    fn test_new_rejects_out_of_range_fields() {
        assert_eq!(
            PreciseTime::new(0, 60, 0, 0, 0, 0),
            Err(TimeError::FieldOutOfRange {
                field: "minute",
                value: 60,
                limit: 60
            })
        );
        assert!(PreciseTime::new(0, 0, 0, 0, 0, 1000).is_err());
        assert!(PreciseTime::new(u32::MAX, 59, 59, 999, 999, 999).is_ok());
    }

    #[test]
    fn test_serde_validates_fields() {
        let t = PreciseTime::from_ms(61_500);
        let json = serde_json::to_string(&t).unwrap();
        let back: PreciseTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);

        let bad = r#"{"hour":0,"minute":0,"second":75,"millisecond":0,"microsecond":0,"nanosecond":0}"#;
        assert!(serde_json::from_str::<PreciseTime>(bad).is_err());
    }
}

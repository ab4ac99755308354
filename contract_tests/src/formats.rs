//! Serialized and display formats of the shared timer types
//!
//! These tests define the stable shapes of `TimeUnit`, `TimerConfig` and
//! `PreciseTime` as they appear in configuration fixtures and logs.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time_types::{PreciseTime, TimeUnit};
    use timer_hal::TimerConfig;

    #[test]
    fn test_time_unit_names() {
        let names: Vec<serde_json::Value> = TimeUnit::ALL
            .iter()
            .map(|unit| serde_json::to_value(unit).expect("unit serializes"))
            .collect();
        assert_eq!(
            names,
            vec![json!("ns"), json!("us"), json!("ms"), json!("s"), json!("m"), json!("h")]
        );
    }

    #[test]
    fn test_timer_config_shape() {
        let config = TimerConfig::new(0xFFFF, 1.0, TimeUnit::Milliseconds);
        assert_eq!(
            serde_json::to_value(config).expect("config serializes"),
            json!({
                "max_rollover_tick": 65535,
                "tick_value": 1.0,
                "tick_units": "ms",
            })
        );
    }

    #[test]
    fn test_precise_time_shape() {
        let time = PreciseTime::from_ms(3_723_004);
        assert_eq!(
            serde_json::to_value(time).expect("time serializes"),
            json!({
                "hour": 1,
                "minute": 2,
                "second": 3,
                "millisecond": 4,
                "microsecond": 0,
                "nanosecond": 0,
            })
        );
    }

    #[test]
    fn test_precise_time_shape_from_nanoseconds() {
        let time = PreciseTime::from_ns(3_723_004_005);
        assert_eq!(
            serde_json::to_value(time).expect("time serializes"),
            json!({
                "hour": 0,
                "minute": 0,
                "second": 3,
                "millisecond": 723,
                "microsecond": 4,
                "nanosecond": 5,
            })
        );
    }

    #[test]
    fn test_precise_time_rejects_out_of_range_fields() {
        let raw = json!({
            "hour": 0,
            "minute": 60,
            "second": 0,
            "millisecond": 0,
            "microsecond": 0,
            "nanosecond": 0,
        });
        assert!(serde_json::from_value::<PreciseTime>(raw).is_err());
    }

    #[test]
    fn test_display_format() {
        let time = PreciseTime::new(12, 34, 56, 789, 12, 0).expect("fields in range");
        assert_eq!(time.to_string(), "12:34:56:789:012:000");
        assert_eq!(PreciseTime::ZERO.to_string(), "00:00:00:000:000:000");
    }
}

//! Flat string encoding of recurrence rules.
//!
//! `none` for a non-repeating appointment, otherwise `;`-separated
//! `KEY=VALUE` parts, e.g. `FREQ=WEEKLY;INTERVAL=2;BYDAY=1,3,5;COUNT=10`.

use chrono::NaiveDate;
use tracing::debug;

use super::config::{Frequency, RecurrenceConfig, RecurrenceEnd};

/// Encoded form of the non-repeating configuration.
pub const NONE_SENTINEL: &str = "none";

const DATE_FORMAT: &str = "%Y-%m-%d";

// == Serialize ==
/// Encodes a configuration for persistence.
pub fn serialize(config: &RecurrenceConfig) -> String {
    if !config.is_recurring() {
        return NONE_SENTINEL.to_string();
    }

    let mut parts = vec![
        format!("FREQ={}", config.frequency().as_token()),
        format!("INTERVAL={}", config.interval()),
    ];

    let days = config.days_of_week();
    if config.frequency() == Frequency::Weekly && !days.is_empty() {
        let joined: Vec<String> = days.iter().map(u8::to_string).collect();
        parts.push(format!("BYDAY={}", joined.join(",")));
    }

    match config.end() {
        RecurrenceEnd::Never => {}
        RecurrenceEnd::Until(date) => parts.push(format!("UNTIL={}", date.format(DATE_FORMAT))),
        RecurrenceEnd::Count(n) => parts.push(format!("COUNT={}", n)),
    }

    parts.join(";")
}

// == Deserialize ==
/// Decodes a stored rule. Anything malformed yields the `none` configuration.
pub fn deserialize(encoded: &str) -> RecurrenceConfig {
    match parse(encoded.trim()) {
        Some(config) => config,
        None => {
            debug!("Unrecognized recurrence rule {:?}, treating as none", encoded);
            RecurrenceConfig::none()
        }
    }
}

fn parse(encoded: &str) -> Option<RecurrenceConfig> {
    if encoded.is_empty() || encoded.eq_ignore_ascii_case(NONE_SENTINEL) {
        return Some(RecurrenceConfig::none());
    }

    let mut frequency = None;
    let mut interval = 1u32;
    let mut days: Option<Vec<u8>> = None;
    let mut until = None;
    let mut count = None;

    for part in encoded.split(';').filter(|p| !p.is_empty()) {
        let (key, value) = part.split_once('=')?;
        match key {
            "FREQ" => frequency = Some(Frequency::from_token(value)?),
            "INTERVAL" => interval = value.parse::<u32>().ok()?,
            "BYDAY" => days = Some(parse_days(value)?),
            "UNTIL" => until = Some(NaiveDate::parse_from_str(value, DATE_FORMAT).ok()?),
            "COUNT" => count = Some(value.parse::<u32>().ok().filter(|n| *n > 0)?),
            _ => return None,
        }
    }

    let mut config = RecurrenceConfig::new(frequency?).with_interval(interval);

    if let Some(days) = days {
        if config.frequency() != Frequency::Weekly {
            return None;
        }
        config.set_days(days);
    }

    match (until, count) {
        (Some(_), Some(_)) => return None,
        (Some(date), None) => config.set_end_date(date),
        (None, Some(n)) => config.set_count(n),
        (None, None) => {}
    }

    Some(config)
}

fn parse_days(value: &str) -> Option<Vec<u8>> {
    value
        .split(',')
        .map(|d| d.trim().parse::<u8>().ok().filter(|d| *d <= 6))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_none_serializes_to_sentinel() {
        assert_eq!(serialize(&RecurrenceConfig::none()), "none");
    }

    #[test]
    fn test_weekly_with_days() {
        let config = RecurrenceConfig::weekly().with_interval(2).with_days([5, 1, 3]);
        assert_eq!(serialize(&config), "FREQ=WEEKLY;INTERVAL=2;BYDAY=1,3,5");
    }

    #[test]
    fn test_termination_parts() {
        let until = RecurrenceConfig::daily().with_end_date(date(2025, 3, 1));
        assert_eq!(serialize(&until), "FREQ=DAILY;INTERVAL=1;UNTIL=2025-03-01");

        let count = RecurrenceConfig::monthly().with_interval(3).with_count(6);
        assert_eq!(serialize(&count), "FREQ=MONTHLY;INTERVAL=3;COUNT=6");
    }

    #[test]
    fn test_days_on_non_weekly_rule_roundtrip() {
        let config = RecurrenceConfig::daily().with_days([1, 2]);
        assert_eq!(serialize(&config), "FREQ=DAILY;INTERVAL=1");
        assert_eq!(deserialize(&serialize(&config)), config);
    }

    #[test]
    fn test_deserialize_sentinel_and_empty() {
        assert_eq!(deserialize("none"), RecurrenceConfig::none());
        assert_eq!(deserialize(""), RecurrenceConfig::none());
    }

    #[test]
    fn test_deserialize_full_rule() {
        let config = deserialize("FREQ=WEEKLY;INTERVAL=2;BYDAY=1,3,5;UNTIL=2024-12-31");
        assert_eq!(config.frequency(), Frequency::Weekly);
        assert_eq!(config.interval(), 2);
        assert_eq!(config.days_of_week(), vec![1, 3, 5]);
        assert_eq!(config.end_date(), Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_deserialize_zero_interval_clamped() {
        assert_eq!(deserialize("FREQ=DAILY;INTERVAL=0").interval(), 1);
    }

    #[test]
    fn test_malformed_input_falls_back_to_none() {
        for input in [
            "garbage",
            "FREQ=YEARLY;INTERVAL=1",
            "FREQ=DAILY;INTERVAL=abc",
            "FREQ=WEEKLY;INTERVAL=1;BYDAY=1,9",
            "FREQ=DAILY;UNTIL=2024-13-45",
            "FREQ=DAILY;COUNT=0",
            "FREQ=DAILY;COUNT=3;UNTIL=2024-01-01",
            "FREQ=DAILY;BYDAY=1",
            "INTERVAL=2",
            "FREQ=DAILY;COLOR=red",
        ] {
            assert_eq!(deserialize(input), RecurrenceConfig::none(), "input {input:?}");
        }
    }

    fn config_strategy() -> impl Strategy<Value = RecurrenceConfig> {
        let freq = prop_oneof![
            Just(Frequency::None),
            Just(Frequency::Daily),
            Just(Frequency::Weekly),
            Just(Frequency::Monthly),
        ];
        let end = prop_oneof![
            Just(RecurrenceEnd::Never),
            (1u32..500).prop_map(RecurrenceEnd::Count),
            (0i64..3650).prop_map(|offset| RecurrenceEnd::Until(
                date(2024, 1, 1) + chrono::Duration::days(offset)
            )),
        ];
        (
            freq,
            1u32..52,
            prop::collection::btree_set(0u8..=6, 0..7),
            end,
        )
            .prop_map(|(freq, interval, days, end)| {
                let mut config = RecurrenceConfig::new(freq).with_interval(interval);
                if freq == Frequency::Weekly {
                    config.set_days(days);
                }
                match end {
                    RecurrenceEnd::Never => {}
                    RecurrenceEnd::Until(d) => config.set_end_date(d),
                    RecurrenceEnd::Count(n) => config.set_count(n),
                }
                if freq == Frequency::None {
                    config = RecurrenceConfig::none();
                }
                config
            })
    }

    proptest! {
        #[test]
        fn prop_encoding_roundtrip(config in config_strategy()) {
            prop_assert_eq!(deserialize(&serialize(&config)), config);
        }

        #[test]
        fn prop_deserialize_never_panics(input in ".{0,64}") {
            let _ = deserialize(&input);
        }
    }
}

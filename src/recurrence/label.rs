//! Italian labels for recurrence rules, as shown in the appointment list.

use super::config::{Frequency, RecurrenceConfig, RecurrenceEnd};

const DAY_ABBREVIATIONS: [&str; 7] = ["Dom", "Lun", "Mar", "Mer", "Gio", "Ven", "Sab"];

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Short Italian name for a day index (0 = Sunday).
pub fn day_label(day: u8) -> Option<&'static str> {
    DAY_ABBREVIATIONS.get(day as usize).copied()
}

/// Full label, e.g. `"Ogni 2 settimane: Lun, Mer, Ven"`.
///
/// A termination clause is appended only when one is set.
pub fn describe(config: &RecurrenceConfig) -> String {
    let n = config.interval();
    let mut label = match config.frequency() {
        Frequency::None => return "Nessuna ripetizione".to_string(),
        Frequency::Daily => plural(n, "Ogni giorno", "giorni"),
        Frequency::Weekly => plural(n, "Ogni settimana", "settimane"),
        Frequency::Monthly => plural(n, "Ogni mese", "mesi"),
    };

    if config.frequency() == Frequency::Weekly {
        let days: Vec<&str> = config
            .days_of_week()
            .into_iter()
            .filter_map(day_label)
            .collect();
        if !days.is_empty() {
            label.push_str(": ");
            label.push_str(&days.join(", "));
        }
    }

    match config.end() {
        RecurrenceEnd::Never => {}
        RecurrenceEnd::Until(date) => {
            label.push_str(&format!(", fino al {}", date.format(DATE_FORMAT)));
        }
        RecurrenceEnd::Count(count) => {
            label.push_str(&format!(", {}", occurrences(count)));
        }
    }

    label
}

/// Termination clause on its own: `"Senza fine"`, `"N occorrenze"` or
/// `"Fino al DD/MM/YYYY"`.
pub fn describe_end(config: &RecurrenceConfig) -> String {
    match config.end() {
        RecurrenceEnd::Never => "Senza fine".to_string(),
        RecurrenceEnd::Until(date) => format!("Fino al {}", date.format(DATE_FORMAT)),
        RecurrenceEnd::Count(count) => occurrences(count),
    }
}

fn plural(n: u32, singular: &str, unit: &str) -> String {
    if n <= 1 {
        singular.to_string()
    } else {
        format!("Ogni {} {}", n, unit)
    }
}

fn occurrences(count: u32) -> String {
    if count == 1 {
        "1 occorrenza".to_string()
    } else {
        format!("{} occorrenze", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::{deserialize, serialize};
    use chrono::NaiveDate;

    #[test]
    fn test_weekly_example_through_codec() {
        let config = RecurrenceConfig::weekly().with_interval(2).with_days([1, 3, 5]);
        let decoded = deserialize(&serialize(&config));
        assert_eq!(describe(&decoded), "Ogni 2 settimane: Lun, Mer, Ven");
    }

    #[test]
    fn test_singular_forms() {
        assert_eq!(describe(&RecurrenceConfig::daily()), "Ogni giorno");
        assert_eq!(describe(&RecurrenceConfig::weekly()), "Ogni settimana");
        assert_eq!(describe(&RecurrenceConfig::monthly()), "Ogni mese");
    }

    #[test]
    fn test_plural_forms() {
        assert_eq!(describe(&RecurrenceConfig::daily().with_interval(3)), "Ogni 3 giorni");
        assert_eq!(describe(&RecurrenceConfig::monthly().with_interval(2)), "Ogni 2 mesi");
    }

    #[test]
    fn test_none_label() {
        assert_eq!(describe(&RecurrenceConfig::none()), "Nessuna ripetizione");
    }

    #[test]
    fn test_sunday_sorts_first() {
        let config = RecurrenceConfig::weekly().with_days([6, 0]);
        assert_eq!(describe(&config), "Ogni settimana: Dom, Sab");
    }

    #[test]
    fn test_termination_clauses() {
        let counted = RecurrenceConfig::daily().with_count(10);
        assert_eq!(describe(&counted), "Ogni giorno, 10 occorrenze");
        assert_eq!(describe_end(&counted), "10 occorrenze");

        let once = RecurrenceConfig::daily().with_count(1);
        assert_eq!(describe_end(&once), "1 occorrenza");

        let until = RecurrenceConfig::weekly()
            .with_end_date(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(describe(&until), "Ogni settimana, fino al 31/12/2024");
        assert_eq!(describe_end(&until), "Fino al 31/12/2024");

        assert_eq!(describe_end(&RecurrenceConfig::daily()), "Senza fine");
    }

    #[test]
    fn test_day_label_bounds() {
        assert_eq!(day_label(0), Some("Dom"));
        assert_eq!(day_label(6), Some("Sab"));
        assert_eq!(day_label(7), None);
    }
}

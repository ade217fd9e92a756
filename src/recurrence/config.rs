//! Recurrence Configuration
//!
//! Structured description of a repeating appointment. Advisory metadata only:
//! nothing here expands a rule into concrete occurrences.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// == Frequency ==
/// How often an appointment repeats. Serialized in lower case in JSON payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Token used in the `FREQ=` part of the encoded form.
    pub fn as_token(&self) -> &'static str {
        match self {
            Frequency::None => "NONE",
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
        }
    }

    /// Parses a `FREQ=` token. `NONE` is not accepted here; the bare
    /// sentinel covers that case.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "DAILY" => Some(Frequency::Daily),
            "WEEKLY" => Some(Frequency::Weekly),
            "MONTHLY" => Some(Frequency::Monthly),
            _ => None,
        }
    }
}

// == Termination ==
/// When a recurrence stops. End date and count are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecurrenceEnd {
    #[default]
    Never,
    Until(NaiveDate),
    Count(u32),
}

// == Recurrence Config ==
/// A recurrence rule as edited in the appointment form.
///
/// Days of week use 0 = Sunday through 6 = Saturday and are kept sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceConfig {
    frequency: Frequency,
    interval: u32,
    days_of_week: BTreeSet<u8>,
    end: RecurrenceEnd,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self::none()
    }
}

impl RecurrenceConfig {
    /// The non-repeating configuration.
    pub fn none() -> Self {
        Self {
            frequency: Frequency::None,
            interval: 1,
            days_of_week: BTreeSet::new(),
            end: RecurrenceEnd::Never,
        }
    }

    /// Starts a rule with the given frequency and interval 1.
    pub fn new(frequency: Frequency) -> Self {
        let mut config = Self::none();
        config.set_frequency(frequency);
        config
    }

    pub fn daily() -> Self {
        Self::new(Frequency::Daily)
    }

    pub fn weekly() -> Self {
        Self::new(Frequency::Weekly)
    }

    pub fn monthly() -> Self {
        Self::new(Frequency::Monthly)
    }

    // == Builders ==
    /// Sets the interval, clamped to a minimum of 1.
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.set_interval(interval);
        self
    }

    /// Replaces the day set. Values outside 0..=6 are dropped, and the set
    /// stays empty unless the rule is weekly.
    pub fn with_days<I: IntoIterator<Item = u8>>(mut self, days: I) -> Self {
        self.set_days(days);
        self
    }

    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.set_end_date(date);
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.set_count(count);
        self
    }

    // == Mutators ==
    /// Changes the frequency. Switching to `None` resets every other field;
    /// leaving `Weekly` drops the day set.
    pub fn set_frequency(&mut self, frequency: Frequency) {
        if frequency == Frequency::None {
            *self = Self::none();
            return;
        }
        self.frequency = frequency;
        if frequency != Frequency::Weekly {
            self.days_of_week.clear();
        }
    }

    pub fn set_interval(&mut self, interval: u32) {
        self.interval = interval.max(1);
    }

    pub fn set_days<I: IntoIterator<Item = u8>>(&mut self, days: I) {
        if self.frequency != Frequency::Weekly {
            self.days_of_week.clear();
            return;
        }
        self.days_of_week = days.into_iter().filter(|d| *d <= 6).collect();
    }

    /// Sets an end date, clearing any occurrence count.
    pub fn set_end_date(&mut self, date: NaiveDate) {
        self.end = RecurrenceEnd::Until(date);
    }

    /// Sets an occurrence count, clearing any end date. Clamped to at least 1.
    pub fn set_count(&mut self, count: u32) {
        self.end = RecurrenceEnd::Count(count.max(1));
    }

    pub fn clear_end(&mut self) {
        self.end = RecurrenceEnd::Never;
    }

    // == Accessors ==
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Days in ascending order.
    pub fn days_of_week(&self) -> Vec<u8> {
        self.days_of_week.iter().copied().collect()
    }

    pub fn end(&self) -> RecurrenceEnd {
        self.end
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        match self.end {
            RecurrenceEnd::Until(date) => Some(date),
            _ => None,
        }
    }

    pub fn count(&self) -> Option<u32> {
        match self.end {
            RecurrenceEnd::Count(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.frequency != Frequency::None
    }
}

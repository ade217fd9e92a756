//! Request DTOs for the studio cache API
//!
//! Defines the structure of incoming HTTP request bodies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::recurrence::{Frequency, RecurrenceConfig, RecurrenceEnd};

/// Request body for `PUT /cache/:strategy/:key`
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// Arbitrary JSON payload to cache
    pub value: serde_json::Value,
    /// TTL override in milliseconds; the strategy default applies otherwise
    #[serde(default)]
    pub ttl_ms: Option<u64>,
}

impl SetRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.ttl_ms == Some(0) {
            return Some("ttl_ms must be greater than zero".to_string());
        }
        None
    }
}

/// Request body for `POST /invalidate`
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    pub strategy: String,
    pub pattern: String,
}

impl InvalidateRequest {
    pub fn validate(&self) -> Option<String> {
        if self.pattern.is_empty() {
            return Some("Pattern cannot be empty".to_string());
        }
        None
    }
}

/// Request body for `POST /recurrence/describe`
#[derive(Debug, Clone, Deserialize)]
pub struct DescribeRequest {
    pub encoded: String,
}

/// JSON shape of a recurrence rule as the appointment form sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrencePayload {
    #[serde(rename = "type")]
    pub kind: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl RecurrencePayload {
    /// Builds the domain config, rejecting payloads the form could not produce.
    pub fn to_config(&self) -> Result<RecurrenceConfig, String> {
        let frequency = self.kind;
        if frequency == Frequency::None {
            return Ok(RecurrenceConfig::none());
        }

        if self.end_date.is_some() && self.count.is_some() {
            return Err("endDate and count are mutually exclusive".to_string());
        }
        if self.count == Some(0) {
            return Err("count must be greater than zero".to_string());
        }

        let mut config = RecurrenceConfig::new(frequency).with_interval(self.interval.unwrap_or(1));

        if let Some(days) = &self.days_of_week {
            if let Some(bad) = days.iter().find(|d| **d > 6) {
                return Err(format!("Day of week {} is out of range 0-6", bad));
            }
            config.set_days(days.iter().copied());
        }
        if let Some(date) = self.end_date {
            config.set_end_date(date);
        }
        if let Some(count) = self.count {
            config.set_count(count);
        }

        Ok(config)
    }
}

impl From<&RecurrenceConfig> for RecurrencePayload {
    fn from(config: &RecurrenceConfig) -> Self {
        if !config.is_recurring() {
            return Self {
                kind: Frequency::None,
                interval: None,
                days_of_week: None,
                end_date: None,
                count: None,
            };
        }

        let days = config.days_of_week();
        let (end_date, count) = match config.end() {
            RecurrenceEnd::Never => (None, None),
            RecurrenceEnd::Until(date) => (Some(date), None),
            RecurrenceEnd::Count(n) => (None, Some(n)),
        };

        Self {
            kind: config.frequency(),
            interval: Some(config.interval()),
            days_of_week: (config.frequency() == Frequency::Weekly && !days.is_empty())
                .then_some(days),
            end_date,
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"value": {"name": "Giulia"}}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.value["name"], "Giulia");
        assert!(req.ttl_ms.is_none());
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_set_request_zero_ttl_invalid() {
        let json = r#"{"value": 1, "ttl_ms": 0}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_invalidate_request_empty_pattern() {
        let req = InvalidateRequest {
            strategy: "stats".to_string(),
            pattern: String::new(),
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_payload_to_config() {
        let json = r#"{"type":"weekly","interval":2,"daysOfWeek":[5,1,3],"count":8}"#;
        let payload: RecurrencePayload = serde_json::from_str(json).unwrap();
        let config = payload.to_config().unwrap();

        assert_eq!(config.frequency(), Frequency::Weekly);
        assert_eq!(config.interval(), 2);
        assert_eq!(config.days_of_week(), vec![1, 3, 5]);
        assert_eq!(config.count(), Some(8));
    }

    #[test]
    fn test_payload_rejects_both_terminations() {
        let json = r#"{"type":"daily","endDate":"2024-12-31","count":3}"#;
        let payload: RecurrencePayload = serde_json::from_str(json).unwrap();
        assert!(payload.to_config().is_err());
    }

    #[test]
    fn test_payload_rejects_unknown_type_and_bad_day() {
        assert!(serde_json::from_str::<RecurrencePayload>(r#"{"type":"yearly"}"#).is_err());

        let bad_day: RecurrencePayload =
            serde_json::from_str(r#"{"type":"weekly","daysOfWeek":[7]}"#).unwrap();
        assert!(bad_day.to_config().is_err());
    }

    #[test]
    fn test_none_payload_ignores_other_fields() {
        let json = r#"{"type":"none","interval":4,"count":2}"#;
        let payload: RecurrencePayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.to_config().unwrap(), RecurrenceConfig::none());
    }

    #[test]
    fn test_payload_from_config() {
        let config = RecurrenceConfig::weekly()
            .with_interval(2)
            .with_days([1, 3, 5])
            .with_end_date(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

        let json = serde_json::to_value(RecurrencePayload::from(&config)).unwrap();
        assert_eq!(json["type"], "weekly");
        assert_eq!(json["interval"], 2);
        assert_eq!(json["daysOfWeek"], serde_json::json!([1, 3, 5]));
        assert_eq!(json["endDate"], "2024-12-31");
        assert!(json.get("count").is_none());
    }
}

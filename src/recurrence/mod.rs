//! Recurrence Module
//!
//! Appointment recurrence rules: the structured configuration, its flat
//! string encoding and the Italian display label.

mod codec;
mod config;
mod label;

pub use codec::{deserialize, serialize, NONE_SENTINEL};
pub use config::{Frequency, RecurrenceConfig, RecurrenceEnd};
pub use label::{day_label, describe, describe_end};

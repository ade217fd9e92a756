//! Cache key builders.
//!
//! Keys that concern one athlete all start with `athlete:<id>`, so
//! `StrategyCache::invalidate_pattern("athlete:<id>", ..)` drops every
//! section cached for that athlete.

pub fn athlete_profile(athlete_id: &str) -> String {
    format!("athlete:{}:profile", athlete_id)
}

pub fn athlete_appointments(athlete_id: &str) -> String {
    format!("athlete:{}:appointments", athlete_id)
}

pub fn athlete_payments(athlete_id: &str) -> String {
    format!("athlete:{}:payments", athlete_id)
}

pub fn athlete_workouts(athlete_id: &str) -> String {
    format!("athlete:{}:workouts", athlete_id)
}

pub fn athlete_stats(athlete_id: &str) -> String {
    format!("athlete:{}:stats", athlete_id)
}

/// Prefix shared by every key of one athlete.
pub fn athlete_pattern(athlete_id: &str) -> String {
    format!("athlete:{}:", athlete_id)
}

pub fn athletes_list(trainer_id: &str) -> String {
    format!("trainer:{}:athletes", trainer_id)
}

pub fn dashboard_stats(trainer_id: &str) -> String {
    format!("trainer:{}:dashboard", trainer_id)
}

/// Appointments of a trainer between two ISO dates.
pub fn appointments_range(trainer_id: &str, from: &str, to: &str) -> String {
    format!("trainer:{}:appointments:{}:{}", trainer_id, from, to)
}

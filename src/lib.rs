//! Studio Cache - client-side utilities of a training studio app
//!
//! A two-tier TTL cache with versioned entries and named strategies, plus the
//! appointment recurrence codec, exposed as a library and a small HTTP service.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;

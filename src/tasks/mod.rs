//! Background Tasks Module
//!
//! # Tasks
//! - Cache cleanup: evicts expired and stale entries at a configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;

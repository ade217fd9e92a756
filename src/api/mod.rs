//! API Module
//!
//! HTTP handlers and routing exposing the cache and recurrence utilities.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

//! Request and Response models for the studio cache API

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{DescribeRequest, InvalidateRequest, RecurrencePayload, SetRequest};
pub use responses::{
    DeleteResponse, GetResponse, HealthResponse, RecurrenceResponse, RemovedResponse,
    SetResponse, StatsResponse, StrategyInfo,
};

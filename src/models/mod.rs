//! Request and Response models for the cache API
//!
//! DTOs used for serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    DeleteMultipleRequest, GetMultipleRequest, GetRequest, SetMultipleRequest, SetRequest,
};
pub use responses::{
    GetMultipleResponse, GetResponse, HasResponse, HealthResponse, KeyResultResponse,
    StatsResponse, SuccessResponse,
};

//! API Module
//!
//! HTTP handlers and routing exposing the cache adapter as a JSON API.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

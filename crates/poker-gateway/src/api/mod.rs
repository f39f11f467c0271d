//! REST bootstrap endpoints
//!
//! Clients use these to create or join a room and read its state before
//! opening the room connection.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;

pub use response::{ApiError, ApiResult};

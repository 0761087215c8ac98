//! Shared service plumbing: health endpoints, request-id middleware,
//! serde helpers, tracing setup.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;

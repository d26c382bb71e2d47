//! HTTP layer translating requests into resolver calls.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for JSON responses
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request tracing middleware

pub mod dto;
pub mod handlers;
pub mod middleware;

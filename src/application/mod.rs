//! Application layer services implementing the redirect flow.
//!
//! This layer orchestrates domain operations by coordinating the edge cache,
//! the origin store and the write-back queue. Services consume the domain traits
//! and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::redirect_service::RedirectResolver`] - Two-tier slug resolution
//! - [`services::single_flight::SingleFlight`] - Coalescing of concurrent origin lookups

pub mod services;

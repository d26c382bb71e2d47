//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete clients for the edge cache and the origin store.
//!
//! # Modules
//!
//! - [`cache`] - Edge cache implementations (Moka and Redis)
//! - [`origin`] - Origin store implementations (Redis)

pub mod cache;
pub mod origin;

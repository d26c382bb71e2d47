//! Repository trait definitions for the domain layer.
//!
//! The origin store is only consumed through a get-by-key contract, so this
//! module defines a single read-only trait. Implementations live in
//! `crate::infrastructure::origin`; mocks are generated with `mockall` for tests.

pub mod origin_repository;

pub use origin_repository::{OriginError, OriginResolver};

#[cfg(test)]
pub use origin_repository::MockOriginResolver;

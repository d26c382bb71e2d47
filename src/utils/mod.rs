//! Utility functions for request handling and origin data validation.
//!
//! - [`effective_url`] - Public request URL reconstruction from headers
//! - [`target_url`] - Validation of redirect targets read from the origin store

pub mod effective_url;
pub mod target_url;

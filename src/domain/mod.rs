//! Domain layer containing the redirect model and its contracts.
//!
//! Everything here is independent of the HTTP framework wiring and of concrete
//! storage backends.
//!
//! # Architecture
//!
//! - [`cache_key`] - Canonical cache keys and the synthetic cache requests built from them
//! - [`slug`] - Validated slug value
//! - [`cached_response`] - Immutable response snapshot stored in the edge cache
//! - [`redirect_response`] - Builder for the canonical 301 response
//! - [`repositories`] - Origin store trait definitions
//! - [`write_back_job`] - Deferred edge-cache write
//! - [`write_back_worker`] - Background worker applying write-backs
//!
//! # Write-back Flow
//!
//! 1. Redirect resolver misses the edge cache and resolves the slug at the origin
//! 2. The response is returned and a [`write_back_job::WriteBackJob`] is queued (non-blocking)
//! 3. [`write_back_worker::run_write_back_worker`] stores it in the edge cache
//! 4. Failures end in the log, never in the request path

pub mod cache_key;
pub mod cached_response;
pub mod redirect_response;
pub mod repositories;
pub mod slug;
pub mod write_back_job;
pub mod write_back_worker;

//! Business logic services for the application layer.

pub mod redirect_service;
pub mod single_flight;

pub use redirect_service::{
    RedirectOutcome, RedirectResolver, ResolveError, ResolverSettings, ResponseSource,
};
pub use single_flight::SingleFlight;

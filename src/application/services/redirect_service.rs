//! Redirect resolution: edge cache first, origin store on a miss.

use axum::http::Method;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};
use url::Url;

use crate::application::services::single_flight::SingleFlight;
use crate::domain::cache_key::{CacheKey, CacheRequest};
use crate::domain::cached_response::CachedResponse;
use crate::domain::redirect_response::RedirectResponseBuilder;
use crate::domain::repositories::{OriginError, OriginResolver};
use crate::domain::slug::Slug;
use crate::domain::write_back_job::WriteBackJob;
use crate::infrastructure::cache::EdgeCache;
use crate::utils::target_url::{TargetUrlError, parse_target_url};

/// Why a request produced no redirect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),

    #[error("Slug missing from request path")]
    MissingSlug,

    #[error("No redirect stored for slug '{0}'")]
    NotFound(String),

    #[error("Origin lookup failed for slug '{slug}': {source}")]
    Origin { slug: String, source: OriginError },

    #[error("Origin holds an unusable target for slug '{slug}': {reason}")]
    InvalidTarget { slug: String, reason: TargetUrlError },

    #[error("Resolution task aborted: {0}")]
    Aborted(String),
}

/// Which tier served a response. Telemetry only; the response is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    EdgeCache,
    Origin,
}

impl ResponseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EdgeCache => "edge",
            Self::Origin => "origin",
        }
    }
}

/// Result of a successful resolution.
#[derive(Debug, Clone)]
pub struct RedirectOutcome {
    pub response: CachedResponse,
    pub source: ResponseSource,
}

/// Tunables for [`RedirectResolver`].
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// `max-age` advertised on redirect responses.
    pub max_age_seconds: u64,
    /// TTL of entries written back into the edge cache.
    pub edge_ttl: Duration,
    /// Extra attempts after an origin transport failure.
    pub origin_retry_attempts: usize,
    /// Coalesce concurrent misses for the same key.
    pub single_flight: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            max_age_seconds: 3600,
            edge_ttl: Duration::from_secs(3600),
            origin_retry_attempts: 2,
            single_flight: true,
        }
    }
}

/// Orchestrates a redirect lookup across the edge cache and the origin store.
///
/// # Request Flow
///
/// 1. Reject anything but `GET` (405)
/// 2. Reject a missing or empty slug (404)
/// 3. Derive the [`CacheKey`] from the effective request URL, not from the slug
/// 4. Edge cache hit: return the stored response, nothing else happens
/// 5. Miss: ask the origin store for the slug
/// 6. Found: build the 301, return it, and queue a write-back of the same response
/// 7. Not found: 404; origin failure: error, nothing cached
///
/// # Cache Strategy
///
/// - **Cache hit**: Immediate response, no origin query, no write-back
/// - **Cache miss**: Query origin, queue an async cache write
/// - **Cache error**: Log and treat as a miss
///
/// The write-back queue is bounded. When it is full or closed the job is
/// dropped with a warning; the request never waits on it.
pub struct RedirectResolver {
    edge_cache: Arc<dyn EdgeCache>,
    origin: Arc<dyn OriginResolver>,
    responses: RedirectResponseBuilder,
    write_back: mpsc::Sender<WriteBackJob>,
    edge_ttl: Duration,
    origin_retry_attempts: usize,
    single_flight: Option<SingleFlight<Result<CachedResponse, ResolveError>>>,
}

impl RedirectResolver {
    pub fn new(
        edge_cache: Arc<dyn EdgeCache>,
        origin: Arc<dyn OriginResolver>,
        write_back: mpsc::Sender<WriteBackJob>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            edge_cache,
            origin,
            responses: RedirectResponseBuilder::new(settings.max_age_seconds),
            write_back,
            edge_ttl: settings.edge_ttl,
            origin_retry_attempts: settings.origin_retry_attempts,
            single_flight: settings.single_flight.then(SingleFlight::new),
        }
    }

    pub fn edge_cache(&self) -> &Arc<dyn EdgeCache> {
        &self.edge_cache
    }

    pub fn origin(&self) -> &Arc<dyn OriginResolver> {
        &self.origin
    }

    pub fn write_back_sender(&self) -> &mpsc::Sender<WriteBackJob> {
        &self.write_back
    }

    /// Resolves a request to the response that should be sent.
    ///
    /// `url` is the effective public URL the client requested and is the only
    /// input to the cache key. Elapsed time is recorded as
    /// `redirect_resolve_duration_seconds`.
    ///
    /// # Errors
    ///
    /// See [`ResolveError`]. Write-back failures are never reported here.
    pub async fn resolve(
        &self,
        method: &Method,
        slug: Option<&str>,
        url: &Url,
    ) -> Result<RedirectOutcome, ResolveError> {
        let started = Instant::now();
        let result = self.resolve_inner(method, slug, url).await;
        let elapsed = started.elapsed();

        metrics::histogram!("redirect_resolve_duration_seconds").record(elapsed.as_secs_f64());

        match &result {
            Ok(outcome) => {
                metrics::counter!("redirect_requests_total", "source" => outcome.source.as_str())
                    .increment(1);
                debug!(
                    source = outcome.source.as_str(),
                    elapsed_us = elapsed.as_micros() as u64,
                    "Resolved {}",
                    url
                );
            }
            Err(e) => {
                debug!(elapsed_us = elapsed.as_micros() as u64, "No redirect for {}: {}", url, e);
            }
        }

        result
    }

    /// Runs [`Self::resolve`] on its own task.
    ///
    /// If the caller is dropped (client went away), the resolution still runs
    /// to completion, so a found redirect still gets its write-back queued.
    pub async fn resolve_detached(
        self: &Arc<Self>,
        method: Method,
        slug: Option<String>,
        url: Url,
    ) -> Result<RedirectOutcome, ResolveError> {
        let resolver = Arc::clone(self);
        let task =
            tokio::spawn(async move { resolver.resolve(&method, slug.as_deref(), &url).await });

        task.await
            .map_err(|e| ResolveError::Aborted(e.to_string()))?
    }

    async fn resolve_inner(
        &self,
        method: &Method,
        slug: Option<&str>,
        url: &Url,
    ) -> Result<RedirectOutcome, ResolveError> {
        if *method != Method::GET {
            return Err(ResolveError::MethodNotAllowed(method.to_string()));
        }

        let slug = slug.and_then(Slug::parse).ok_or(ResolveError::MissingSlug)?;

        let key = CacheKey::from_url(url);
        let request = CacheRequest::new(&key);

        match self.edge_cache.lookup(&request).await {
            Ok(Some(response)) => {
                return Ok(RedirectOutcome {
                    response,
                    source: ResponseSource::EdgeCache,
                });
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Edge cache lookup failed for {}: {}", key, e);
            }
        }

        let response = match &self.single_flight {
            Some(flight) => {
                flight
                    .run(&key, || self.load_from_origin(&slug, &key))
                    .await?
            }
            None => self.load_from_origin(&slug, &key).await?,
        };

        Ok(RedirectOutcome {
            response,
            source: ResponseSource::Origin,
        })
    }

    /// Origin path: lookup, build the redirect, queue the write-back.
    async fn load_from_origin(
        &self,
        slug: &Slug,
        key: &CacheKey,
    ) -> Result<CachedResponse, ResolveError> {
        let stored = self.lookup_origin(slug).await.map_err(|source| match source {
            OriginError::InvalidRecord(detail) => ResolveError::InvalidTarget {
                slug: slug.to_string(),
                reason: TargetUrlError::Unreadable(detail),
            },
            source => {
                metrics::counter!("redirect_origin_failures_total").increment(1);
                ResolveError::Origin {
                    slug: slug.to_string(),
                    source,
                }
            }
        })?;

        let Some(raw) = stored else {
            return Err(ResolveError::NotFound(slug.to_string()));
        };

        let target = parse_target_url(&raw).map_err(|reason| {
            warn!("Origin value for {} is not a usable URL: {}", slug, reason);
            ResolveError::InvalidTarget {
                slug: slug.to_string(),
                reason,
            }
        })?;

        let response = self.responses.build(&target);
        self.schedule_write_back(key, response.clone());

        Ok(response)
    }

    /// Origin `get` with bounded retry of transport failures.
    ///
    /// Unreadable records are returned on the first attempt.
    async fn lookup_origin(&self, slug: &Slug) -> Result<Option<String>, OriginError> {
        let strategy = ExponentialBackoff::from_millis(10)
            .max_delay(Duration::from_millis(250))
            .map(jitter)
            .take(self.origin_retry_attempts);

        RetryIf::spawn(
            strategy,
            || async {
                self.origin.resolve(slug).await.inspect_err(|e| {
                    warn!("Origin lookup for {} failed: {}", slug, e);
                })
            },
            |e: &OriginError| e.is_transient(),
        )
        .await
    }

    /// Hands the response to the write-back worker without waiting.
    fn schedule_write_back(&self, key: &CacheKey, response: CachedResponse) {
        let job = WriteBackJob::new(key, response, self.edge_ttl);

        match self.write_back.try_send(job) {
            Ok(()) => debug!("Write-back queued for {}", key),
            Err(TrySendError::Full(job)) => {
                warn!("Write-back queue full, dropping {}", job.request.key());
                metrics::counter!("edge_cache_write_back_total", "result" => "dropped")
                    .increment(1);
            }
            Err(TrySendError::Closed(job)) => {
                warn!("Write-back queue closed, dropping {}", job.request.key());
                metrics::counter!("edge_cache_write_back_total", "result" => "dropped")
                    .increment(1);
            }
        }
    }
}

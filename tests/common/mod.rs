#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

use edge_redirector::application::services::{RedirectResolver, ResolverSettings};
use edge_redirector::domain::cache_key::CacheRequest;
use edge_redirector::domain::cached_response::CachedResponse;
use edge_redirector::domain::repositories::{OriginError, OriginResolver};
use edge_redirector::domain::slug::Slug;
use edge_redirector::domain::write_back_job::WriteBackJob;
use edge_redirector::domain::write_back_worker::run_write_back_worker;
use edge_redirector::infrastructure::cache::{CacheError, CacheResult, EdgeCache, MokaEdgeCache};
use edge_redirector::state::AppState;

/// Public host every test request is sent with.
pub const TEST_HOST: &str = "s.example.com";

/// In-memory origin store that counts lookups and can be switched offline.
#[derive(Default)]
pub struct InMemoryOrigin {
    records: HashMap<String, String>,
    unreadable: HashSet<String>,
    calls: AtomicUsize,
    offline: AtomicBool,
}

impl InMemoryOrigin {
    pub fn with_records(records: &[(&str, &str)]) -> Self {
        Self {
            records: records
                .iter()
                .map(|(slug, url)| (slug.to_string(), url.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    /// Makes `slug` answer like a record that is not a string.
    pub fn with_unreadable(mut self, slug: &str) -> Self {
        self.unreadable.insert(slug.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[async_trait]
impl OriginResolver for InMemoryOrigin {
    async fn resolve(&self, slug: &Slug) -> Result<Option<String>, OriginError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.offline.load(Ordering::SeqCst) {
            return Err(OriginError::Unavailable("connection refused".to_string()));
        }

        if self.unreadable.contains(slug.as_str()) {
            return Err(OriginError::InvalidRecord("value is not UTF-8".to_string()));
        }

        Ok(self.records.get(slug.as_str()).cloned())
    }

    async fn health_check(&self) -> bool {
        !self.offline.load(Ordering::SeqCst)
    }
}

/// Everything a test needs to drive the app and inspect its side effects.
pub struct TestContext {
    pub state: AppState,
    pub origin: Arc<InMemoryOrigin>,
    pub cache: Arc<MokaEdgeCache>,
    pub write_back_rx: mpsc::Receiver<WriteBackJob>,
}

impl TestContext {
    /// Applies every write-back queued so far, as the background worker would.
    pub async fn apply_write_backs(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(job) = self.write_back_rx.try_recv() {
            if job.apply(self.cache.as_ref()).await {
                applied += 1;
            }
        }
        applied
    }

    /// Number of write-backs waiting in the queue.
    pub fn pending_write_backs(&self) -> usize {
        self.write_back_rx.len()
    }
}

pub fn test_settings() -> ResolverSettings {
    ResolverSettings {
        max_age_seconds: 3600,
        edge_ttl: Duration::from_secs(3600),
        origin_retry_attempts: 0,
        single_flight: true,
    }
}

pub fn create_test_state(records: &[(&str, &str)]) -> TestContext {
    create_test_state_with(records, test_settings())
}

pub fn create_test_state_with(records: &[(&str, &str)], settings: ResolverSettings) -> TestContext {
    create_test_state_for(InMemoryOrigin::with_records(records), settings)
}

pub fn create_test_state_for(origin: InMemoryOrigin, settings: ResolverSettings) -> TestContext {
    let origin = Arc::new(origin);
    let cache = Arc::new(MokaEdgeCache::new(1_000));
    let (tx, rx) = mpsc::channel(100);

    let edge_cache: Arc<dyn EdgeCache> = cache.clone();
    let origin_resolver: Arc<dyn OriginResolver> = origin.clone();
    let resolver = Arc::new(RedirectResolver::new(edge_cache, origin_resolver, tx, settings));

    TestContext {
        state: AppState::new(resolver, "https", false),
        origin,
        cache,
        write_back_rx: rx,
    }
}

/// Edge cache that never holds anything and rejects every write.
pub struct FailingEdgeCache;

#[async_trait]
impl EdgeCache for FailingEdgeCache {
    async fn lookup(&self, _request: &CacheRequest) -> CacheResult<Option<CachedResponse>> {
        Ok(None)
    }

    async fn store(
        &self,
        _request: &CacheRequest,
        _response: CachedResponse,
        _ttl: Duration,
    ) -> CacheResult<()> {
        Err(CacheError::OperationError("READONLY replica".to_string()))
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

/// App state over `cache` with the real write-back worker running.
pub fn create_state_with_worker(
    records: &[(&str, &str)],
    cache: Arc<dyn EdgeCache>,
) -> (AppState, Arc<InMemoryOrigin>, tokio::task::JoinHandle<()>) {
    let origin = Arc::new(InMemoryOrigin::with_records(records));
    let (tx, rx) = mpsc::channel(100);

    let worker = tokio::spawn(run_write_back_worker(rx, cache.clone(), 2));

    let origin_resolver: Arc<dyn OriginResolver> = origin.clone();
    let resolver = Arc::new(RedirectResolver::new(cache, origin_resolver, tx, test_settings()));

    (AppState::new(resolver, "https", false), origin, worker)
}

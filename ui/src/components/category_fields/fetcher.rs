//! Schema Fetcher
//!
//! Loads a tenant's category schema once per session and keeps it for the
//! rest of that session. Each load runs under a [`FetchHandle`]; once the
//! handle is cancelled the response is dropped instead of being cached or
//! handed back to a component that no longer exists.
//!
//! Concurrent loads for the same session share one request: the first holds
//! a per-session lock while it fetches, the rest wait and read the cache.
//!
//! No retries and no timeout are applied here. A failed load returns the
//! error and leaves the cache untouched, so the next load tries again.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::lock::Mutex as AsyncMutex;

use crate::api::{ApiClient, ApiError};
use crate::session::Session;

use super::types::SchemaResponse;

/// A cached schema; `None` means the tenant has no category fields
pub type CachedSchema = Option<Arc<SchemaResponse>>;

/// Where schemas come from
#[allow(async_fn_in_trait)]
pub trait SchemaSource {
    async fn fetch_schema(&self, session: &Session) -> Result<Option<SchemaResponse>, ApiError>;
}

impl SchemaSource for ApiClient {
    async fn fetch_schema(&self, session: &Session) -> Result<Option<SchemaResponse>, ApiError> {
        self.get_category_fields(session).await
    }
}

/// Cancellation flag for one in-flight load
#[derive(Clone, Debug, Default)]
pub struct FetchHandle {
    cancelled: Arc<AtomicBool>,
}

impl FetchHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Result of [`SchemaFetcher::load`]
#[derive(Clone, Debug, PartialEq)]
pub enum FetchOutcome {
    Ready(CachedSchema),
    /// The handle was cancelled while the request was in flight
    Cancelled,
}

pub struct SchemaFetcher<S> {
    source: S,
    cache: Mutex<HashMap<Session, CachedSchema>>,
    in_flight: Mutex<HashMap<Session, Arc<AsyncMutex<()>>>>,
}

/// Fetcher shared through Leptos context
pub type SharedSchemaFetcher = Arc<SchemaFetcher<ApiClient>>;

impl<S: SchemaSource> SchemaFetcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// The cached schema of `session`, if it was loaded before
    pub fn cached(&self, session: &Session) -> Option<CachedSchema> {
        self.cache().get(session).cloned()
    }

    /// Load the schema for `session`, hitting the network only on a cache miss
    pub async fn load(&self, session: &Session, handle: &FetchHandle) -> Result<FetchOutcome, ApiError> {
        if handle.is_cancelled() {
            return Ok(FetchOutcome::Cancelled);
        }
        if let Some(schema) = self.cached(session) {
            return Ok(FetchOutcome::Ready(schema));
        }

        let lock = self.session_lock(session);
        let _guard = lock.lock().await;

        // Another load may have filled the cache while this one waited
        if let Some(schema) = self.cached(session) {
            return Ok(FetchOutcome::Ready(schema));
        }
        if handle.is_cancelled() {
            return Ok(FetchOutcome::Cancelled);
        }

        log::debug!("Fetching category fields for tenant {}", session.tenant_id);
        let fetched = self.source.fetch_schema(session).await;

        if handle.is_cancelled() {
            log::debug!("Discarding category fields for tenant {} after cancel", session.tenant_id);
            return Ok(FetchOutcome::Cancelled);
        }

        let schema = fetched?.filter(|s| !s.is_empty()).map(Arc::new);
        if let Some(schema) = &schema {
            for issue in schema.check_consistency() {
                log::warn!("Category schema '{}': {}", schema.category, issue);
            }
        }

        self.cache().insert(session.clone(), schema.clone());
        Ok(FetchOutcome::Ready(schema))
    }

    /// Drop cached schemas, e.g. after sign-out
    pub fn clear(&self) {
        self.cache().clear();
    }

    fn session_lock(&self, session: &Session) -> Arc<AsyncMutex<()>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        in_flight.entry(session.clone()).or_default().clone()
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<Session, CachedSchema>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::category_fields::types::tests::{field, schema};
    use futures::executor::block_on;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::AtomicUsize;
    use std::task::{Context, Poll};

    /// Pending on the first poll, so a fetch spans more than one poll
    struct YieldOnce(bool);

    impl Future for YieldOnce {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    struct FakeSource {
        calls: AtomicUsize,
        response: Result<Option<SchemaResponse>, ApiError>,
        cancel_during_fetch: Option<FetchHandle>,
        yield_during_fetch: bool,
    }

    impl FakeSource {
        fn returning(response: Result<Option<SchemaResponse>, ApiError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response,
                cancel_during_fetch: None,
                yield_during_fetch: false,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SchemaSource for FakeSource {
        async fn fetch_schema(&self, _session: &Session) -> Result<Option<SchemaResponse>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.yield_during_fetch {
                YieldOnce(false).await;
            }
            if let Some(handle) = &self.cancel_during_fetch {
                handle.cancel();
            }
            self.response.clone()
        }
    }

    fn pharmacy() -> SchemaResponse {
        schema(vec![("general", vec![field("strength", "text", "general")])])
    }

    #[test]
    fn test_fetches_once_per_session() {
        let fetcher = SchemaFetcher::new(FakeSource::returning(Ok(Some(pharmacy()))));
        let session = Session::new("acme", "tok");
        let handle = FetchHandle::new();

        let first = block_on(fetcher.load(&session, &handle)).unwrap();
        let second = block_on(fetcher.load(&session, &handle)).unwrap();

        assert_eq!(first, second);
        assert!(matches!(first, FetchOutcome::Ready(Some(_))));
        assert_eq!(fetcher.source.calls(), 1);

        block_on(fetcher.load(&Session::new("globex", "tok2"), &handle)).unwrap();
        assert_eq!(fetcher.source.calls(), 2);
    }

    #[test]
    fn test_concurrent_loads_share_one_fetch() {
        let mut source = FakeSource::returning(Ok(Some(pharmacy())));
        source.yield_during_fetch = true;
        let fetcher = SchemaFetcher::new(source);
        let session = Session::new("acme", "tok");
        let (h1, h2) = (FetchHandle::new(), FetchHandle::new());

        let (first, second) = block_on(async {
            futures::join!(fetcher.load(&session, &h1), fetcher.load(&session, &h2))
        });

        assert!(matches!(first, Ok(FetchOutcome::Ready(Some(_)))));
        assert_eq!(first, second);
        assert_eq!(fetcher.source.calls(), 1);
    }

    #[test]
    fn test_absent_or_empty_schema_is_cached_as_none() {
        let fetcher = SchemaFetcher::new(FakeSource::returning(Ok(None)));
        let session = Session::new("acme", "tok");
        let outcome = block_on(fetcher.load(&session, &FetchHandle::new())).unwrap();
        assert_eq!(outcome, FetchOutcome::Ready(None));
        assert_eq!(fetcher.cached(&session), Some(None));

        let empty = schema(vec![]);
        let fetcher = SchemaFetcher::new(FakeSource::returning(Ok(Some(empty))));
        let outcome = block_on(fetcher.load(&session, &FetchHandle::new())).unwrap();
        assert_eq!(outcome, FetchOutcome::Ready(None));
    }

    #[test]
    fn test_failure_is_returned_and_not_cached() {
        let fetcher = SchemaFetcher::new(FakeSource::returning(Err(ApiError::Unauthorized(401))));
        let session = Session::new("acme", "tok");

        let result = block_on(fetcher.load(&session, &FetchHandle::new()));
        assert_eq!(result, Err(ApiError::Unauthorized(401)));
        assert_eq!(fetcher.cached(&session), None);

        let _ = block_on(fetcher.load(&session, &FetchHandle::new()));
        assert_eq!(fetcher.source.calls(), 2);
    }

    #[test]
    fn test_cancel_during_fetch_discards_result() {
        let handle = FetchHandle::new();
        let mut source = FakeSource::returning(Ok(Some(pharmacy())));
        source.cancel_during_fetch = Some(handle.clone());
        let fetcher = SchemaFetcher::new(source);
        let session = Session::new("acme", "tok");

        let outcome = block_on(fetcher.load(&session, &handle)).unwrap();
        assert_eq!(outcome, FetchOutcome::Cancelled);
        assert_eq!(fetcher.cached(&session), None);
    }

    #[test]
    fn test_cancelled_handle_skips_network() {
        let fetcher = SchemaFetcher::new(FakeSource::returning(Ok(Some(pharmacy()))));
        let handle = FetchHandle::new();
        handle.cancel();

        let outcome = block_on(fetcher.load(&Session::new("acme", "tok"), &handle)).unwrap();
        assert_eq!(outcome, FetchOutcome::Cancelled);
        assert_eq!(fetcher.source.calls(), 0);
    }

    #[test]
    fn test_clear_forces_refetch() {
        let fetcher = SchemaFetcher::new(FakeSource::returning(Ok(Some(pharmacy()))));
        let session = Session::new("acme", "tok");
        block_on(fetcher.load(&session, &FetchHandle::new())).unwrap();
        fetcher.clear();
        block_on(fetcher.load(&session, &FetchHandle::new())).unwrap();
        assert_eq!(fetcher.source.calls(), 2);
    }
}

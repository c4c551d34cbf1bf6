//! Debounced catalog search.
//!
//! Each visitor gets one [`DebouncedSearch`] per search box. A query waits
//! out the settle window before it is sent; if another query arrives in the
//! meantime the older one is dropped. The generation is checked again once
//! the response is in, so a slow response to an old query never replaces the
//! results of a newer one.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use tower_sessions::Session;
use uuid::Uuid;

use crate::models::keys;

/// Debouncers idle for this long are dropped.
const IDLE_EXPIRY: Duration = Duration::from_secs(30 * 60);

/// Upper bound on tracked debouncers.
const MAX_DEBOUNCERS: u64 = 10_000;

/// Which search box a query came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    Meals,
    Providers,
}

impl SearchKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Meals => "meals",
            Self::Providers => "providers",
        }
    }
}

/// Latest-wins debouncer for one search box.
#[derive(Clone)]
pub struct DebouncedSearch {
    inner: Arc<DebouncedSearchInner>,
}

struct DebouncedSearchInner {
    generation: AtomicU64,
    window: Duration,
}

impl DebouncedSearch {
    /// Create a debouncer with the given settle window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            inner: Arc::new(DebouncedSearchInner {
                generation: AtomicU64::new(0),
                window,
            }),
        }
    }

    /// Run `fetch` once the settle window passes without a newer query.
    ///
    /// Returns `Ok(None)` when this query was superseded, either before it
    /// was sent or while its response was in flight.
    ///
    /// # Errors
    ///
    /// Returns the error from `fetch` if this query is still current.
    pub async fn run<T, E, F, Fut>(&self, fetch: F) -> Result<Option<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let ticket = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.inner.window).await;
        if !self.is_current(ticket) {
            tracing::debug!(ticket, "Search superseded before sending");
            return Ok(None);
        }

        let result = fetch().await;
        if !self.is_current(ticket) {
            tracing::debug!(ticket, "Search response superseded");
            return Ok(None);
        }

        result.map(Some)
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.inner.generation.load(Ordering::SeqCst) == ticket
    }
}

/// Debouncers for all active visitors.
#[derive(Clone)]
pub struct SearchRegistry {
    debouncers: Cache<String, DebouncedSearch>,
    window: Duration,
}

impl SearchRegistry {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            debouncers: Cache::builder()
                .max_capacity(MAX_DEBOUNCERS)
                .time_to_idle(IDLE_EXPIRY)
                .build(),
            window,
        }
    }

    /// The debouncer for one visitor's search box.
    pub async fn get(&self, visitor: &str, kind: SearchKind) -> DebouncedSearch {
        let window = self.window;
        self.debouncers
            .get_with(format!("{visitor}:{}", kind.as_str()), async move {
                DebouncedSearch::new(window)
            })
            .await
    }
}

/// Stable per-session key used to find the visitor's debouncers.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn visitor_key(session: &Session) -> Result<String, tower_sessions::session::Error> {
    if let Some(key) = session.get::<String>(keys::SEARCH).await? {
        return Ok(key);
    }
    let key = Uuid::new_v4().to_string();
    session.insert(keys::SEARCH, &key).await?;
    Ok(key)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    const WINDOW: Duration = Duration::from_millis(40);

    #[tokio::test]
    async fn test_single_query_runs() {
        let search = DebouncedSearch::new(WINDOW);
        let result = search.run(|| async { Ok::<_, Infallible>("kacchi") }).await;
        assert_eq!(result.unwrap(), Some("kacchi"));
    }

    #[tokio::test]
    async fn test_newer_query_supersedes_pending_one() {
        let search = DebouncedSearch::new(WINDOW);

        let older = {
            let search = search.clone();
            tokio::spawn(async move { search.run(|| async { Ok::<_, Infallible>("bir") }).await })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        let newer = search
            .run(|| async { Ok::<_, Infallible>("biryani") })
            .await;

        assert_eq!(older.await.unwrap().unwrap(), None);
        assert_eq!(newer.unwrap(), Some("biryani"));
    }

    #[tokio::test]
    async fn test_in_flight_response_is_discarded() {
        let search = DebouncedSearch::new(Duration::from_millis(5));

        let older = {
            let search = search.clone();
            tokio::spawn(async move {
                search
                    .run(|| async {
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        Ok::<_, Infallible>("stale")
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;
        let newer = search.run(|| async { Ok::<_, Infallible>("fresh") }).await;

        assert_eq!(newer.unwrap(), Some("fresh"));
        assert_eq!(older.await.unwrap().unwrap(), None);
    }

    #[tokio::test]
    async fn test_errors_surface_for_current_query() {
        let search = DebouncedSearch::new(Duration::from_millis(1));
        let result: Result<Option<()>, &str> = search.run(|| async { Err("offline") }).await;
        assert_eq!(result, Err("offline"));
    }

    #[tokio::test]
    async fn test_registry_shares_debouncer_per_visitor_and_kind() {
        let registry = SearchRegistry::new(WINDOW);
        let a = registry.get("v1", SearchKind::Meals).await;
        let b = registry.get("v1", SearchKind::Meals).await;
        let c = registry.get("v1", SearchKind::Providers).await;

        assert!(Arc::ptr_eq(&a.inner, &b.inner));
        assert!(!Arc::ptr_eq(&a.inner, &c.inner));
    }
}

//! Cache of the last successful feed fetch.
//!
//! The feed is slow and sometimes unavailable. Listing versions may serve
//! slightly stale data, and installing must not touch the network once a
//! version list has been seen. [`FetchCache`] keeps one snapshot and decides
//! per call, from a [`FetchToolsPolicy`], whether to refresh it.

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::fetcher::AvailableToolsFetcher;
use crate::tool::DownloadableTool;

/// How fresh a lookup needs to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchToolsPolicy {
    /// Refresh when the snapshot is older than the refresh interval.
    FetchNew,
    /// Serve the snapshot as is; fetch only if nothing was ever fetched.
    ReturnCached,
}

/// One successful fetch.
#[derive(Debug, Clone)]
pub struct CachedFetchResult {
    /// Tools from every fetcher that succeeded, in registration order.
    pub tools: Vec<DownloadableTool>,
    /// When the fetch completed.
    pub fetched_at: Instant,
}

/// Fetch cache over one or more fetchers.
///
/// Thread-safe. Refreshes are serialized so concurrent callers trigger a
/// single fetch; readers only ever see whole snapshots.
pub struct FetchCache {
    fetchers: Vec<Arc<dyn AvailableToolsFetcher>>,
    refresh_interval: Duration,
    clock: Arc<dyn Clock>,
    snapshot: RwLock<Option<Arc<CachedFetchResult>>>,
    refresh: Mutex<()>,
}

impl FetchCache {
    /// Create an empty cache using the system clock.
    #[must_use]
    pub fn new(fetchers: Vec<Arc<dyn AvailableToolsFetcher>>, refresh_interval: Duration) -> Self {
        Self::with_clock(fetchers, refresh_interval, Arc::new(SystemClock))
    }

    /// Create an empty cache with an explicit time source.
    #[must_use]
    pub fn with_clock(
        fetchers: Vec<Arc<dyn AvailableToolsFetcher>>,
        refresh_interval: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            fetchers,
            refresh_interval,
            clock,
            snapshot: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// Available tools under the given policy.
    ///
    /// Never fails. An empty result after a failed first fetch means no
    /// versions are known yet, not that the feed is empty.
    pub fn get(&self, policy: FetchToolsPolicy) -> Vec<DownloadableTool> {
        match policy {
            FetchToolsPolicy::ReturnCached => {
                if let Some(cached) = self.snapshot() {
                    trace!("Serving cached tools");
                    return cached.tools.clone();
                }
                let _guard = self.refresh.lock();
                // Another caller may have bootstrapped while we waited
                match self.snapshot() {
                    Some(cached) => cached.tools.clone(),
                    None => self.refresh_locked(None),
                }
            }
            FetchToolsPolicy::FetchNew => {
                let _guard = self.refresh.lock();
                let current = self.snapshot();
                if let Some(cached) = &current {
                    if !self.is_stale(cached) {
                        trace!("Cached tools are fresh");
                        return cached.tools.clone();
                    }
                }
                self.refresh_locked(current)
            }
        }
    }

    /// The current snapshot, without fetching.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<CachedFetchResult>> {
        self.snapshot.read().clone()
    }

    fn is_stale(&self, cached: &CachedFetchResult) -> bool {
        self.clock.now().saturating_duration_since(cached.fetched_at) > self.refresh_interval
    }

    /// Fetch from every source and swap in the result. Caller holds `refresh`.
    fn refresh_locked(&self, previous: Option<Arc<CachedFetchResult>>) -> Vec<DownloadableTool> {
        let mut tools = Vec::new();
        let mut failures = 0usize;

        for fetcher in &self.fetchers {
            match fetcher.fetch_available() {
                Ok(fetched) => tools.extend(fetched),
                Err(e) => {
                    failures += 1;
                    warn!(feed_url = %e.feed_url, error = %e.source, "Failed to fetch available tools");
                }
            }
        }

        if !self.fetchers.is_empty() && failures == self.fetchers.len() {
            return match previous {
                Some(stale) => {
                    warn!(count = stale.tools.len(), "All fetchers failed, serving stale tools");
                    stale.tools.clone()
                }
                None => {
                    debug!("All fetchers failed and nothing is cached");
                    Vec::new()
                }
            };
        }

        let result = Arc::new(CachedFetchResult {
            tools,
            fetched_at: self.clock.now(),
        });
        debug!(count = result.tools.len(), "Cached fetched tools");
        *self.snapshot.write() = Some(Arc::clone(&result));
        result.tools.clone()
    }
}

impl std::fmt::Debug for FetchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchCache")
            .field("fetchers", &self.fetchers.len())
            .field("refresh_interval", &self.refresh_interval)
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

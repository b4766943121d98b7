//! TTL response cache
//!
//! A concurrent map of cache key to value with lazy, read-time expiry.
//! There is no background sweep; an expired entry is dropped on the
//! read that finds it. Concurrent writers to the same key overwrite
//! each other - last write wins, which is acceptable because values
//! come from idempotent reads.

use dashmap::DashMap;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;
use twinlens_core::TwinResult;

struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

pub struct TtlCache<T: Clone> {
    entries: DashMap<String, CacheEntry<T>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Return the cached value for `key`, or run `fetch` and cache its
    /// result.
    ///
    /// - `None` key: the call is not cacheable; `fetch` always runs
    ///   and nothing is memoized.
    /// - A `fetch` error is returned unchanged and never cached.
    pub async fn get_or_fetch<F, Fut>(&self, key: Option<String>, fetch: F) -> TwinResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = TwinResult<T>>,
    {
        let Some(key) = key else {
            return fetch().await;
        };

        // Scope the map guard so it is released before awaiting.
        {
            if let Some(entry) = self.entries.get(&key) {
                if entry.expires_at > Instant::now() {
                    debug!(key = %key, "using cached value");
                    return Ok(entry.value.clone());
                }
            }
        }
        self.entries
            .remove_if(&key, |_, entry| entry.expires_at <= Instant::now());

        let value = fetch().await?;
        self.entries.insert(
            key,
            CacheEntry {
                value: value.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        Ok(value)
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

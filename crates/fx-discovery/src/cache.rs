//! Discovery cache
//!
//! Maps a glob pattern to the file list it matched when last scanned.
//! Eviction runs after every write: entries older than the default TTL go
//! first, then the oldest entries until the map is within its size cap.
//! Concurrent discoveries of the same pattern race; the last write wins.

use crate::clock::{Clock, SystemClock};
use crate::lister::{compile_pattern, FileLister};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Default time-to-live of a cache entry (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default maximum number of cached patterns
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Shared, immutable file list
pub type FileList = Arc<Vec<String>>;

/// Cache bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries older than this are evicted on every write (ms)
    pub default_ttl_ms: u64,
    /// Maximum number of cached patterns
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_ms: duration_ms(DEFAULT_TTL),
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl CacheConfig {
    /// Create default config
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With default TTL
    #[inline]
    #[must_use]
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl_ms = duration_ms(ttl);
        self
    }

    /// With size cap
    #[inline]
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Default TTL as a [`Duration`]
    #[inline]
    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// One cached value and when it was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<T> {
    /// Write time, epoch milliseconds
    pub timestamp: u64,
    /// Cached value
    pub data: T,
}

/// Per-call discovery options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoverOptions {
    /// Freshness bound for this lookup; the cache's default TTL when `None`
    pub max_age: Option<Duration>,
    /// Re-scan even when a fresh entry exists
    pub force_refresh: bool,
}

impl DiscoverOptions {
    /// Create default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With freshness bound
    #[inline]
    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// With forced refresh
    #[inline]
    #[must_use]
    pub fn with_force_refresh(mut self, force: bool) -> Self {
        self.force_refresh = force;
        self
    }
}

/// Cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that re-scanned
    pub misses: u64,
    /// Entries dropped by eviction
    pub evictions: u64,
    /// Entries currently cached
    pub entries: usize,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry<FileList>>,
    stats: CacheStats,
}

/// Time- and size-bounded pattern cache
#[derive(Debug)]
pub struct DiscoveryCache<C: Clock = SystemClock> {
    config: CacheConfig,
    clock: C,
    inner: Mutex<Inner>,
}

impl Default for DiscoveryCache<SystemClock> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl DiscoveryCache<SystemClock> {
    /// Create cache on the wall clock
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> DiscoveryCache<C> {
    /// Create cache on a custom clock
    #[must_use]
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Cache bounds
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Files matching `pattern`, from cache when fresh
    ///
    /// A fresh entry is returned as the same shared list, without calling
    /// `lister`. Otherwise `lister` runs and its result is cached. When the
    /// lister fails, the previous list (or an empty one) is returned and the
    /// cache is left untouched.
    pub fn discover(
        &self,
        pattern: &str,
        options: DiscoverOptions,
        lister: &dyn FileLister,
    ) -> FileList {
        let now = self.clock.now_ms();
        let max_age = options
            .max_age
            .map_or(self.config.default_ttl_ms, duration_ms);

        {
            let mut inner = self.inner.lock();
            if !options.force_refresh {
                if let Some(entry) = inner.entries.get(pattern) {
                    if now.saturating_sub(entry.timestamp) < max_age {
                        let data = Arc::clone(&entry.data);
                        inner.stats.hits += 1;
                        tracing::debug!(pattern, files = data.len(), "discovery cache hit");
                        return data;
                    }
                }
            }
            inner.stats.misses += 1;
        }

        // scan without holding the lock
        match lister.list(pattern) {
            Ok(files) => {
                tracing::debug!(pattern, files = files.len(), "discovery scan");
                let data: FileList = Arc::new(files);
                let mut inner = self.inner.lock();
                inner.entries.insert(
                    pattern.to_string(),
                    CacheEntry {
                        timestamp: now,
                        data: Arc::clone(&data),
                    },
                );
                self.evict(&mut inner, now);
                data
            }
            Err(err) => {
                tracing::warn!(pattern, "file listing failed: {}", err);
                self.inner
                    .lock()
                    .entries
                    .get(pattern)
                    .map(|entry| Arc::clone(&entry.data))
                    .unwrap_or_default()
            }
        }
    }

    fn evict(&self, inner: &mut Inner, now: u64) {
        let before = inner.entries.len();
        let ttl = self.config.default_ttl_ms;
        inner
            .entries
            .retain(|_, entry| now.saturating_sub(entry.timestamp) <= ttl);

        let excess = inner.entries.len().saturating_sub(self.config.max_entries);
        if excess > 0 {
            let mut by_age: Vec<(u64, String)> = inner
                .entries
                .iter()
                .map(|(key, entry)| (entry.timestamp, key.clone()))
                .collect();
            by_age.sort();
            for (_, key) in by_age.into_iter().take(excess) {
                inner.entries.remove(&key);
            }
        }

        let evicted = before - inner.entries.len();
        if evicted > 0 {
            inner.stats.evictions += evicted as u64;
            tracing::debug!(evicted, remaining = inner.entries.len(), "discovery cache eviction");
        }
    }

    /// Cached entry for `pattern`, fresh or not
    #[must_use]
    pub fn peek(&self, pattern: &str) -> Option<CacheEntry<FileList>> {
        self.inner.lock().entries.get(pattern).cloned()
    }

    /// Drop the entry for `pattern`
    pub fn invalidate(&self, pattern: &str) -> bool {
        self.inner.lock().entries.remove(pattern).is_some()
    }

    /// Drop every entry whose pattern matches `path`
    ///
    /// Used on file create/delete events. Patterns that no longer compile
    /// are dropped too. Returns the number of entries removed.
    pub fn invalidate_matching(&self, path: &str) -> usize {
        let path = fx_model::paths::normalize_separators(path);
        let mut inner = self.inner.lock();
        let before = inner.entries.len();
        inner.entries.retain(|pattern, _| {
            compile_pattern(pattern)
                .is_ok_and(|m| !m.is_match(&path) && !matches_suffix(pattern, &path))
        });
        before - inner.entries.len()
    }

    /// Drop everything
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    /// Number of cached patterns
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Check if nothing is cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Snapshot of the counters
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            entries: inner.entries.len(),
            ..inner.stats
        }
    }
}

/// Relative patterns also match absolute paths that end in a match
fn matches_suffix(pattern: &str, path: &str) -> bool {
    if pattern.starts_with('/') {
        return false;
    }
    compile_pattern(&format!("**/{pattern}")).is_ok_and(|m| m.is_match(path))
}

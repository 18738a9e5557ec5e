//! FX Discovery
//!
//! Supplies the list of feature files to parse without re-walking the file
//! system on every hierarchy rebuild.
//!
//! # Core Concepts
//!
//! - [`DiscoveryCache`]: Pattern → file list cache bounded by age and size
//! - [`FileLister`]: Anything that can resolve a glob to paths
//! - [`GlobLister`]: Directory walk matched with `globset`
//! - [`Clock`]: Timestamp source, swappable for [`ManualClock`] in tests
//!
//! # Example
//!
//! ```rust,ignore
//! use fx_discovery::{CacheConfig, DiscoverOptions, DiscoveryCache, GlobLister};
//!
//! let cache = DiscoveryCache::new(CacheConfig::default());
//! let lister = GlobLister::new("/path/to/workspace");
//! let files = cache.discover("**/*.feature", DiscoverOptions::new(), &lister);
//! ```

#![warn(unreachable_pub)]

mod cache;
mod clock;
mod error;
mod lister;

pub use cache::{
    CacheConfig, CacheEntry, CacheStats, DiscoverOptions, DiscoveryCache, FileList,
    DEFAULT_MAX_ENTRIES, DEFAULT_TTL,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{DiscoveryError, Result};
pub use lister::{compile_pattern, FileLister, GlobLister, DEFAULT_IGNORED_DIRS};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;

    #[test]
    fn cached_listing_sees_new_file_after_invalidation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.feature"), "Feature: A\n").unwrap();

        let cache = DiscoveryCache::new(CacheConfig::default());
        let lister = GlobLister::new(dir.path());

        let first = cache.discover("**/*.feature", DiscoverOptions::new(), &lister);
        assert_eq!(first.len(), 1);

        let created = dir.path().join("b.feature");
        fs::write(&created, "Feature: B\n").unwrap();

        let stale = cache.discover("**/*.feature", DiscoverOptions::new(), &lister);
        assert!(Arc::ptr_eq(&first, &stale));

        assert_eq!(cache.invalidate_matching(&created.to_string_lossy()), 1);
        let fresh = cache.discover("**/*.feature", DiscoverOptions::new(), &lister);
        assert_eq!(fresh.len(), 2);
    }
}

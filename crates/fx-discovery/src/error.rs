//! Discovery errors

use std::path::PathBuf;

/// Errors raised while listing files
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// Glob pattern failed to compile
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Offending pattern
        pattern: String,
        /// Underlying compile error
        #[source]
        source: globset::Error,
    },

    /// Root directory to search does not exist
    #[error("discovery root not found: {0}")]
    RootNotFound(PathBuf),

    /// Listing failed in a custom lister
    #[error("file listing failed: {0}")]
    Listing(String),
}

/// Result type for discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;

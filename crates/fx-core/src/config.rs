//! Explorer configuration
//!
//! Loaded from a TOML file (conventionally `fx.toml` in the workspace root).
//! Every section and field is optional; missing values take their defaults.
//!
//! ```toml
//! workspace_root = "/path/to/project"
//! feature_glob = "features/**/*.feature"
//! follow_links = false
//! strategy = "tag"
//!
//! [cache]
//! default_ttl_ms = 300000
//! max_entries = 100
//!
//! [naming]
//! max_len = 100
//! truncated_width = 5
//!
//! [runner]
//! program = "behave"
//! format = "json"
//! max_parallel = 4
//! ```

use crate::error::{ConfigError, Result};
use fx_discovery::{compile_pattern, CacheConfig};
use fx_feature::{ExampleNaming, RunnerConfig};
use fx_organize::StrategyKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default glob for feature files
pub const DEFAULT_FEATURE_GLOB: &str = "**/*.feature";

/// Conventional config file name in the workspace root
pub const CONFIG_FILE_NAME: &str = "fx.toml";

/// Explorer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Root that feature paths and result keys are relative to
    pub workspace_root: PathBuf,
    /// Glob selecting feature files below the root
    pub feature_glob: String,
    /// Descend into symlinked directories while discovering
    pub follow_links: bool,
    /// Strategy active at start-up
    pub strategy: StrategyKind,
    /// Discovery cache bounds
    pub cache: CacheConfig,
    /// Naming of expanded examples
    pub naming: ExampleNaming,
    /// Runner command lines
    pub runner: RunnerConfig,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            workspace_root: PathBuf::from("."),
            feature_glob: DEFAULT_FEATURE_GLOB.to_string(),
            follow_links: false,
            strategy: StrategyKind::default(),
            cache: CacheConfig::default(),
            naming: ExampleNaming::default(),
            runner: RunnerConfig::default(),
        }
    }
}

impl ExplorerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With workspace root
    #[inline]
    #[must_use]
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = root.into();
        self
    }

    /// With feature glob
    #[inline]
    #[must_use]
    pub fn with_feature_glob(mut self, glob: impl Into<String>) -> Self {
        self.feature_glob = glob.into();
        self
    }

    /// With symlink following during discovery
    #[inline]
    #[must_use]
    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// With start-up strategy
    #[inline]
    #[must_use]
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// With cache bounds
    #[inline]
    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// With example naming policy
    #[inline]
    #[must_use]
    pub fn with_naming(mut self, naming: ExampleNaming) -> Self {
        self.naming = naming;
        self
    }

    /// With runner config
    #[inline]
    #[must_use]
    pub fn with_runner(mut self, runner: RunnerConfig) -> Self {
        self.runner = runner;
        self
    }

    /// Parse and validate TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for values that parse but cannot be used.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    ///
    /// A relative `workspace_root` is resolved against the file's directory.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// as [`ExplorerConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        if config.workspace_root.is_relative() {
            if let Some(dir) = path.parent() {
                config.workspace_root = dir.join(&config.workspace_root);
            }
        }
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `fx.toml` from `root` if present, otherwise defaults rooted there
    ///
    /// # Errors
    /// As [`ExplorerConfig::load`] when the file exists but is unusable.
    pub fn discover(root: &Path) -> Result<Self> {
        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default().with_workspace_root(root))
        }
    }

    /// Check values serde cannot
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if let Err(err) = compile_pattern(&self.feature_glob) {
            return Err(ConfigError::Invalid {
                field: "feature_glob",
                reason: err.to_string(),
            });
        }
        if self.runner.program.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "runner.program",
                reason: "must not be empty".to_string(),
            });
        }
        if self.runner.max_parallel == 0 {
            return Err(ConfigError::Invalid {
                field: "runner.max_parallel",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Workspace root as a string, separators untouched
    #[must_use]
    pub fn root_str(&self) -> String {
        self.workspace_root.to_string_lossy().into_owned()
    }
}

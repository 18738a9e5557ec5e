//! Feature explorer
//!
//! The context object a host constructs once and passes around. It owns the
//! configuration, the discovery cache, the features parsed by the last
//! refresh and the active organization strategy.

use crate::config::ExplorerConfig;
use fx_discovery::{CacheStats, DiscoverOptions, DiscoveryCache, FileLister, GlobLister};
use fx_feature::{
    derive_actions, invocation_for, plan_parallel, Action, FeatureParser, RunnerInvocation,
};
use fx_model::paths::{is_absolute, normalize_separators, relative_to_root};
use fx_model::{ParsedFeature, Scenario, TestGroup, TestStatus};
use fx_organize::{OrganizationManager, StrategyKind, TestNode};
use fx_status::NodeReport;
use serde::Serialize;
use std::collections::HashMap;

/// Reads feature file contents
pub trait FileReader: Send + Sync {
    /// Read the whole file at `path` as UTF-8
    ///
    /// # Errors
    /// Returns the underlying I/O error.
    fn read(&self, path: &str) -> std::io::Result<String>;
}

/// Reads from the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read(&self, path: &str) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// In-memory reader keyed by path
impl FileReader for HashMap<String, String> {
    fn read(&self, path: &str) -> std::io::Result<String> {
        self.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, format!("no such file: {path}"))
        })
    }
}

/// Outcome of one discovery pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    /// Files the glob matched
    pub files: usize,
    /// Files parsed as features
    pub features: usize,
    /// Scenarios across all features
    pub scenarios: usize,
    /// Files that could not be read or had no feature header
    pub skipped: usize,
}

/// Explorer context
pub struct FeatureExplorer {
    config: ExplorerConfig,
    cache: DiscoveryCache,
    lister: Box<dyn FileLister>,
    reader: Box<dyn FileReader>,
    parser: FeatureParser,
    manager: OrganizationManager,
    features: Vec<ParsedFeature>,
}

impl std::fmt::Debug for FeatureExplorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureExplorer")
            .field("config", &self.config)
            .field("strategy", &self.manager.strategy())
            .field("features", &self.features.len())
            .finish_non_exhaustive()
    }
}

impl FeatureExplorer {
    /// Create explorer over the local file system
    #[must_use]
    pub fn new(config: ExplorerConfig) -> Self {
        let lister =
            GlobLister::new(&config.workspace_root).with_follow_links(config.follow_links);
        Self {
            cache: DiscoveryCache::new(config.cache.clone()),
            lister: Box::new(lister),
            reader: Box::new(FsReader),
            parser: FeatureParser::with_naming(config.naming.clone()),
            manager: OrganizationManager::new(config.strategy),
            features: Vec::new(),
            config,
        }
    }

    /// Replace the file lister
    #[must_use]
    pub fn with_lister(mut self, lister: impl FileLister + 'static) -> Self {
        self.lister = Box::new(lister);
        self
    }

    /// Replace the file reader
    #[must_use]
    pub fn with_reader(mut self, reader: impl FileReader + 'static) -> Self {
        self.reader = Box::new(reader);
        self
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Rediscover and reparse every feature file
    ///
    /// With `force` the file list is re-scanned even if the cached one is
    /// still fresh. Unreadable files and files without a feature header
    /// are logged and skipped.
    pub fn refresh(&mut self, force: bool) -> RefreshSummary {
        let options = DiscoverOptions::new().with_force_refresh(force);
        let files = self
            .cache
            .discover(&self.config.feature_glob, options, self.lister.as_ref());

        let mut summary = RefreshSummary {
            files: files.len(),
            ..RefreshSummary::default()
        };
        let mut features = Vec::with_capacity(files.len());
        for path in files.iter() {
            match self.load(path) {
                Some(feature) => features.push(feature),
                None => summary.skipped += 1,
            }
        }

        summary.features = features.len();
        summary.scenarios = features.iter().map(ParsedFeature::len).sum();
        self.features = features;
        tracing::info!(
            "discovered {} feature files ({} scenarios, {} skipped)",
            summary.features,
            summary.scenarios,
            summary.skipped
        );
        summary
    }

    fn load(&self, path: &str) -> Option<ParsedFeature> {
        let text = match self.reader.read(path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("cannot read {}: {}", path, err);
                return None;
            }
        };
        let feature = self.parser.parse(&text, path);
        if feature.is_none() {
            tracing::debug!("{} has no feature header", path);
        }
        feature
    }

    /// Notify the explorer that `path` was created, changed or deleted
    ///
    /// Cached listings the path could appear in are dropped so the next
    /// refresh re-scans. Returns the number of dropped listings.
    pub fn file_changed(&mut self, path: &str) -> usize {
        self.cache.invalidate_matching(path)
    }

    /// Features parsed by the last refresh
    #[inline]
    #[must_use]
    pub fn features(&self) -> &[ParsedFeature] {
        &self.features
    }

    /// Parsed feature for `path`, absolute or relative to the workspace root
    #[must_use]
    pub fn feature(&self, path: &str) -> Option<&ParsedFeature> {
        let wanted = self.relative(path);
        self.features
            .iter()
            .find(|f| self.relative(&f.file_path) == wanted)
    }

    /// All scenarios of the last refresh, in file order
    #[must_use]
    pub fn scenarios(&self) -> Vec<Scenario> {
        self.features
            .iter()
            .flat_map(|f| f.scenarios.iter().cloned())
            .collect()
    }

    /// Make `kind` the active strategy, returning the previous one
    pub fn set_strategy(&mut self, kind: StrategyKind) -> StrategyKind {
        self.manager.set_strategy(kind)
    }

    /// Active strategy
    #[inline]
    #[must_use]
    pub fn strategy(&self) -> StrategyKind {
        self.manager.strategy()
    }

    /// Groups under the active strategy
    #[must_use]
    pub fn groups(&self) -> Vec<TestGroup> {
        self.manager.organize(&self.scenarios())
    }

    /// Materialized hierarchy under the active strategy
    #[must_use]
    pub fn hierarchy(&self) -> Vec<TestNode> {
        self.manager.hierarchy(&self.scenarios())
    }

    /// Action surface of the feature at `path`
    ///
    /// Uses the last refresh when it contains the file, otherwise reads and
    /// parses it on demand. Empty when the file is not a feature.
    #[must_use]
    pub fn actions_for(&self, path: &str) -> Vec<Action> {
        match self.feature(path) {
            Some(feature) => derive_actions(feature),
            None => self
                .load(path)
                .map(|feature| derive_actions(&feature))
                .unwrap_or_default(),
        }
    }

    /// Actions of the feature at `path` paired with their runner invocations
    #[must_use]
    pub fn invocations_for(&self, path: &str) -> Vec<(Action, RunnerInvocation)> {
        let root = self.config.root_str();
        self.actions_for(path)
            .into_iter()
            .map(|action| {
                let invocation = invocation_for(&action, &root, &self.config.runner);
                (action, invocation)
            })
            .collect()
    }

    /// Batched invocations running every feature file in parallel
    #[must_use]
    pub fn plan_run_all(&self) -> Vec<Vec<RunnerInvocation>> {
        let files: Vec<String> = self.features.iter().map(|f| f.file_path.clone()).collect();
        plan_parallel(&files, &self.config.root_str(), &self.config.runner)
    }

    /// Result for one hierarchy node
    #[must_use]
    pub fn reconcile(
        &self,
        child_id: &str,
        parent_id: &str,
        results: &HashMap<String, TestStatus>,
    ) -> Option<TestStatus> {
        fx_status::reconcile(child_id, parent_id, results, &self.config.root_str()).copied()
    }

    /// Statuses for the whole hierarchy under the active strategy
    #[must_use]
    pub fn apply_results(&self, results: &HashMap<String, TestStatus>) -> Vec<NodeReport> {
        fx_status::apply_results(&self.hierarchy(), results, &self.config.root_str())
    }

    /// Discovery cache counters
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn relative(&self, path: &str) -> String {
        let root = self.config.root_str();
        if is_absolute(path) {
            relative_to_root(path, &root)
        } else {
            normalize_separators(path.trim_start_matches("./"))
        }
    }
}

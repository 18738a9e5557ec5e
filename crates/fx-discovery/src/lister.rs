//! File listing behind the discovery cache

use crate::error::{DiscoveryError, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into by [`GlobLister`]
pub const DEFAULT_IGNORED_DIRS: &[&str] =
    &[".git", "node_modules", "target", ".venv", "__pycache__"];

/// Resolves a glob pattern to the files it currently matches
pub trait FileLister: Send + Sync {
    /// List files matching `pattern`
    ///
    /// # Errors
    /// Returns [`DiscoveryError`] when the pattern is invalid or the listing
    /// cannot be performed.
    fn list(&self, pattern: &str) -> Result<Vec<String>>;
}

impl<F> FileLister for F
where
    F: Fn(&str) -> Result<Vec<String>> + Send + Sync,
{
    fn list(&self, pattern: &str) -> Result<Vec<String>> {
        self(pattern)
    }
}

/// Compile a pattern the way [`GlobLister`] matches it
///
/// `*` stays within one path segment; `**` crosses segments.
///
/// # Errors
/// Returns [`DiscoveryError::InvalidPattern`] if the pattern does not compile.
pub fn compile_pattern(pattern: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| DiscoveryError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Walks a directory tree and matches relative paths against the pattern
#[derive(Debug, Clone)]
pub struct GlobLister {
    root: PathBuf,
    follow_links: bool,
    ignored_dirs: Vec<String>,
}

impl GlobLister {
    /// Create lister rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: false,
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(|d| (*d).to_string()).collect(),
        }
    }

    /// With symlink following
    #[inline]
    #[must_use]
    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// With the set of directory names to skip
    #[inline]
    #[must_use]
    pub fn with_ignored_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Search root
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn descend(&self, entry: &DirEntry) -> bool {
        entry.depth() == 0
            || !entry.file_type().is_dir()
            || !self
                .ignored_dirs
                .iter()
                .any(|d| entry.file_name().to_str() == Some(d.as_str()))
    }
}

impl FileLister for GlobLister {
    fn list(&self, pattern: &str) -> Result<Vec<String>> {
        let matcher = compile_pattern(pattern)?;
        if !self.root.is_dir() {
            return Err(DiscoveryError::RootNotFound(self.root.clone()));
        }

        let mut files: Vec<String> = WalkDir::new(&self.root)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_entry(|e| self.descend(e))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::debug!("skipping unreadable entry: {}", err);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.root).ok()?;
                let relative = fx_model::paths::normalize_separators(&relative.to_string_lossy());
                matcher
                    .is_match(&relative)
                    .then(|| entry.path().to_string_lossy().into_owned())
            })
            .collect();

        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("features/sub")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("top.feature"), "Feature: T\n").unwrap();
        fs::write(root.join("features/b.feature"), "Feature: B\n").unwrap();
        fs::write(root.join("features/sub/a.feature"), "Feature: A\n").unwrap();
        fs::write(root.join("features/steps.py"), "").unwrap();
        fs::write(root.join("node_modules/pkg/x.feature"), "Feature: X\n").unwrap();
        dir
    }

    fn relative(dir: &tempfile::TempDir, files: &[String]) -> Vec<String> {
        let root = dir.path().to_string_lossy().into_owned();
        files
            .iter()
            .map(|f| fx_model::paths::relative_to_root(f, &root))
            .collect()
    }

    #[test]
    fn recursive_pattern_sorted_and_ignored_dirs_skipped() {
        let dir = tree();
        let files = GlobLister::new(dir.path()).list("**/*.feature").unwrap();
        assert_eq!(
            relative(&dir, &files),
            vec!["features/b.feature", "features/sub/a.feature", "top.feature"]
        );
    }

    #[test]
    fn single_star_stays_in_segment() {
        let dir = tree();
        let files = GlobLister::new(dir.path()).list("features/*.feature").unwrap();
        assert_eq!(relative(&dir, &files), vec!["features/b.feature"]);
    }

    #[test]
    fn ignored_dirs_configurable() {
        let dir = tree();
        let files = GlobLister::new(dir.path())
            .with_ignored_dirs(Vec::<String>::new())
            .list("**/x.feature")
            .unwrap();
        assert_eq!(relative(&dir, &files), vec!["node_modules/pkg/x.feature"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_dirs_listed_only_when_following() {
        let dir = tree();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("linked.feature"), "Feature: L\n").unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("features/shared")).unwrap();

        let plain = GlobLister::new(dir.path()).list("features/**/linked.feature").unwrap();
        assert!(plain.is_empty());

        let followed = GlobLister::new(dir.path())
            .with_follow_links(true)
            .list("features/**/linked.feature")
            .unwrap();
        assert_eq!(relative(&dir, &followed), vec!["features/shared/linked.feature"]);
    }

    #[test]
    fn invalid_pattern() {
        let dir = tree();
        let err = GlobLister::new(dir.path()).list("features/[.feature").unwrap_err();
        assert!(matches!(err, DiscoveryError::InvalidPattern { .. }));
    }

    #[test]
    fn missing_root() {
        let err = GlobLister::new("/definitely/not/here").list("**/*.feature").unwrap_err();
        assert!(matches!(err, DiscoveryError::RootNotFound(_)));
    }

    #[test]
    fn closures_are_listers() {
        let lister = |pattern: &str| -> Result<Vec<String>> { Ok(vec![format!("{pattern}.hit")]) };
        assert_eq!(lister.list("x").unwrap(), vec!["x.hit"]);
    }
}

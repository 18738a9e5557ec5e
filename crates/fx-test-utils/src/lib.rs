//! Testing utilities for FX workspace
//!
//! Shared feature-file fixtures, workspace builders and listers.

#![allow(missing_docs)]

use fx_discovery::{DiscoveryError, FileLister};
use fx_model::TestStatus;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Feature with tags, a regular scenario, an expanded outline and an
/// outline without rows.
///
/// Line map: feature 2, `Login` 5, outline `Transfer` 9, example rows 13
/// and 14, outline `Pending` 17.
pub const ACCOUNTS_FEATURE: &str = "\
@smoke
Feature: Accounts

  @smoke @auth
  Scenario: Login
    Given a user

  @auth
  Scenario Outline: Transfer
    When I send <amount>
    Examples:
      | amount |
      | 5      |
      | 10     |

  # no rows yet
  Scenario Outline: Pending
    Given <x>
";

/// Feature with one outline over two columns
///
/// Line map: feature 1, outline `Add` 3, example rows 8 and 9.
pub const MATH_FEATURE: &str = "\
Feature: Math

  Scenario Outline: Add
    When I add <a>
    Then I get <result>
    Examples:
      | a | result |
      | 1 | 1      |
      | 5 | 5      |
";

/// Minimal feature with a single scenario on line 2
pub const SIMPLE_FEATURE: &str = "Feature: F\n  Scenario: S\n    Given x\n";

/// Text without a feature header
pub const NOT_A_FEATURE: &str = "just some notes\nnothing to see\n";

/// Create a temporary workspace containing `files` (relative path, content)
pub fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for (path, content) in files {
        write_file(dir.path(), path, content);
    }
    dir
}

/// Write one file below `root`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write fixture file");
}

/// Build a result map from `(composite key, status)` pairs
pub fn results(entries: &[(&str, TestStatus)]) -> HashMap<String, TestStatus> {
    entries
        .iter()
        .map(|(key, status)| ((*key).to_string(), *status))
        .collect()
}

/// Lister returning a fixed list and counting its calls
#[derive(Debug, Default)]
pub struct CountingLister {
    files: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl CountingLister {
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: Mutex::new(files.into_iter().map(Into::into).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_files(&self, files: Vec<String>) {
        *self.files.lock() = files;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FileLister for CountingLister {
    fn list(&self, _pattern: &str) -> Result<Vec<String>, DiscoveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.files.lock().clone())
    }
}

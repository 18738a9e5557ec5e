//! Status reconciliation
//!
//! Results are keyed `<relative path>:<featureLine>:<scenarioLine>`, while
//! hierarchy nodes may be labelled `:<line>` under a feature parent,
//! `<absolute path>:<line>`, or with the full composite key. Resolution
//! tries, in order:
//!
//! 1. Direct reconstruction of the composite key from child and parent.
//! 2. A scan for keys starting with the child's relative path and ending
//!    with its line.
//! 3. A scan for keys containing the child's `<name>.feature` and ending
//!    with its line.
//!
//! Tiers 2 and 3 only resolve when exactly one key qualifies, so the
//! outcome never depends on map iteration order and an ambiguous match is
//! reported as unresolved rather than guessed.

use fx_model::paths::relative_to_root;
use fx_model::CompositeKey;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::hash::BuildHasher;

static PARENT_FEATURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.*\.feature)(?::(\d+))?").expect("valid regex"));
static COMPOSITE_CHILD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*\.feature):(\d+):(\d+)$").expect("valid regex"));
static PATH_LINE_CHILD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*\.feature):(\d+)$").expect("valid regex"));
static TRAILING_FILE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^/\\:]+\.feature):(\d+)$").expect("valid regex"));

/// How a child id names its scenario
#[derive(Debug, Clone, PartialEq, Eq)]
enum ChildRef {
    /// `<path>:<featureLine>:<scenarioLine>`
    Composite(CompositeKey),
    /// `<path>:<line>`
    PathLine { path: String, line: usize },
    /// `:<line>` or anything whose last `:` segment is a line
    Line(usize),
}

impl ChildRef {
    fn classify(child_id: &str) -> Option<Self> {
        if let Some(caps) = COMPOSITE_CHILD.captures(child_id) {
            let feature_line = caps[2].parse().ok()?;
            let line = caps[3].parse().ok()?;
            return Some(Self::Composite(CompositeKey::new(&caps[1], feature_line, line)));
        }
        if let Some(caps) = PATH_LINE_CHILD.captures(child_id) {
            return Some(Self::PathLine {
                path: caps[1].to_string(),
                line: caps[2].parse().ok()?,
            });
        }
        let last = child_id.strip_prefix(':').unwrap_or(child_id);
        let last = last.rsplit(':').next().unwrap_or(last);
        last.trim().parse().ok().map(Self::Line)
    }

    fn line(&self) -> usize {
        match self {
            Self::Composite(key) => key.scenario_line,
            Self::PathLine { line, .. } | Self::Line(line) => *line,
        }
    }

    fn path(&self) -> Option<&str> {
        match self {
            Self::Composite(key) => Some(&key.path),
            Self::PathLine { path, .. } => Some(path),
            Self::Line(_) => None,
        }
    }
}

/// Feature path and line recovered from a parent id
fn parent_feature(parent_id: &str) -> Option<(String, Option<usize>)> {
    let caps = PARENT_FEATURE.captures(parent_id)?;
    let path = caps.get(1)?.as_str().to_string();
    let line = caps.get(2).and_then(|m| m.as_str().parse().ok());
    Some((path, line))
}

/// Resolve the result for a hierarchy node
///
/// `child_id` is the node's id, `parent_id` the id of its parent (empty
/// when there is none) and `root` the workspace root the result keys are
/// relative to. Returns `None` when no key, or more than one key, matches.
#[must_use]
pub fn reconcile<'a, V, S: BuildHasher>(
    child_id: &str,
    parent_id: &str,
    results: &'a HashMap<String, V, S>,
    root: &str,
) -> Option<&'a V> {
    let resolved = resolve(child_id, parent_id, results, root);
    if resolved.is_none() {
        tracing::debug!(child = child_id, parent = parent_id, "no result for node");
    }
    resolved
}

fn resolve<'a, V, S: BuildHasher>(
    child_id: &str,
    parent_id: &str,
    results: &'a HashMap<String, V, S>,
    root: &str,
) -> Option<&'a V> {
    let child = ChildRef::classify(child_id);
    let parent = parent_feature(parent_id);

    if let Some(child) = &child {
        if let Some(found) = direct(child, parent.as_ref(), results, root) {
            return Some(found);
        }

        let relative = child
            .path()
            .or_else(|| parent.as_ref().map(|(path, _)| path.as_str()))
            .map(|path| relative_to_root(path, root));
        if let Some(relative) = relative {
            let prefix = format!("{relative}:");
            let suffix = format!(":{}", child.line());
            let found = unique(results, |key| key.starts_with(&prefix) && key.ends_with(&suffix));
            if found.is_some() {
                return found;
            }
        }
    }

    let caps = TRAILING_FILE_LINE.captures(child_id)?;
    let file = caps.get(1)?.as_str();
    let suffix = format!(":{}", caps.get(2)?.as_str().parse::<usize>().ok()?);
    unique(results, |key| key.contains(file) && key.ends_with(&suffix))
}

fn direct<'a, V, S: BuildHasher>(
    child: &ChildRef,
    parent: Option<&(String, Option<usize>)>,
    results: &'a HashMap<String, V, S>,
    root: &str,
) -> Option<&'a V> {
    let key = match child {
        ChildRef::Composite(key) => CompositeKey::new(
            &relative_to_root(&key.path, root),
            key.feature_line,
            key.scenario_line,
        ),
        ChildRef::PathLine { .. } | ChildRef::Line(_) => {
            let (path, feature_line) = parent?;
            CompositeKey::new(&relative_to_root(path, root), (*feature_line)?, child.line())
        }
    };
    results.get(&key.to_string())
}

fn unique<'a, V, S: BuildHasher>(
    results: &'a HashMap<String, V, S>,
    accept: impl Fn(&str) -> bool,
) -> Option<&'a V> {
    let mut matches = results.iter().filter(|(key, _)| accept(key));
    let (_, first) = matches.next()?;
    match matches.next() {
        Some(_) => None,
        None => Some(first),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn results(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn absolute_child_under_feature_parent() {
        let results = results(&[("features/x.feature:2:10", "passed")]);
        let found = reconcile(
            "/abs/workspace/features/x.feature:10",
            "features/x.feature:2",
            &results,
            "/abs/workspace",
        );
        assert_eq!(found.map(String::as_str), Some("passed"));
    }

    #[test]
    fn short_child_under_feature_parent() {
        let results = results(&[
            ("features/x.feature:2:10", "failed"),
            ("features/x.feature:2:14", "passed"),
        ]);
        let found = reconcile(":10", "features/x.feature:2", &results, "/ws");
        assert_eq!(found.map(String::as_str), Some("failed"));
    }

    #[test]
    fn short_child_under_outline_parent() {
        let results = results(&[("features/x.feature:2:11", "passed")]);
        let found = reconcile(":11", "features/x.feature:2:outline:7", &results, "/ws");
        assert_eq!(found.map(String::as_str), Some("passed"));
    }

    #[test]
    fn absolute_parent_is_relativized() {
        let results = results(&[("features/x.feature:2:10", "passed")]);
        let found = reconcile(":10", "/ws/features/x.feature:2", &results, "/ws");
        assert_eq!(found.map(String::as_str), Some("passed"));
    }

    #[test]
    fn composite_child_needs_no_parent() {
        let results = results(&[("features/x.feature:2:10", "passed")]);
        assert!(reconcile("features/x.feature:2:10", "tag:@smoke", &results, "/ws").is_some());
        assert!(reconcile("/ws/features/x.feature:2:10", "", &results, "/ws").is_some());
    }

    #[test]
    fn parent_without_feature_line_uses_path_scan() {
        let results = results(&[("features/x.feature:3:10", "passed")]);
        let found = reconcile(":10", "features/x.feature", &results, "/ws");
        assert_eq!(found.map(String::as_str), Some("passed"));
    }

    #[test]
    fn path_scan_respects_relative_path_prefix() {
        let results = results(&[
            ("features/x.feature:3:10", "passed"),
            ("features/y.feature:1:10", "failed"),
        ]);
        let found = reconcile(":10", "features/x.feature", &results, "/ws");
        assert_eq!(found.map(String::as_str), Some("passed"));
        let found = reconcile(":10", "/ws/features/y.feature", &results, "/ws");
        assert_eq!(found.map(String::as_str), Some("failed"));
    }

    #[test]
    fn windows_child_path() {
        let results = results(&[("features/x.feature:2:10", "passed")]);
        let found = reconcile("C:\\ws\\features\\x.feature:10", "", &results, "C:\\ws");
        assert_eq!(found.map(String::as_str), Some("passed"));
    }

    #[test]
    fn unique_suffix_fallback() {
        let results = results(&[
            ("features/deep/x.feature:1:10", "passed"),
            ("features/y.feature:1:10", "failed"),
        ]);
        let found = reconcile("/elsewhere/x.feature:10", "", &results, "/ws");
        assert_eq!(found.map(String::as_str), Some("passed"));
    }

    #[test]
    fn ambiguous_suffix_is_unresolved() {
        let results = results(&[("a/x.feature:1:10", "passed"), ("b/x.feature:1:10", "failed")]);
        assert!(reconcile("/elsewhere/x.feature:10", "", &results, "/ws").is_none());
    }

    #[test]
    fn ambiguous_path_scan_is_unresolved() {
        // two feature headers in one file share the scenario line suffix
        let results = results(&[
            ("features/x.feature:1:10", "passed"),
            ("features/x.feature:5:10", "failed"),
        ]);
        assert!(reconcile(":10", "features/x.feature", &results, "/ws").is_none());
    }

    #[test]
    fn line_suffix_is_segment_exact() {
        let results = results(&[("features/x.feature:2:110", "passed")]);
        assert!(reconcile(":10", "features/x.feature", &results, "/ws").is_none());
    }

    #[test]
    fn garbage_ids_never_panic() {
        let results = results(&[("features/x.feature:2:10", "passed")]);
        for (child, parent) in [
            ("", ""),
            (":", ":"),
            (":abc", "features/x.feature:2"),
            ("tag:@x", "all"),
            (".feature:", ".feature"),
            (":99999999999999999999999", "features/x.feature:2"),
        ] {
            assert!(reconcile(child, parent, &results, "/ws").is_none(), "{child} / {parent}");
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip_absolute_child(
            dir in "[a-m]{1,8}",
            name in "[a-z]{1,8}",
            feature_line in 1usize..50,
            line in 1usize..500,
        ) {
            let rel = format!("{dir}/{name}.feature");
            let key = format!("{rel}:{feature_line}:{line}");
            let results = results(&[(key.as_str(), "passed"), ("other/z.feature:1:1", "failed")]);
            let child = format!("/abs/ws/{rel}:{line}");
            let parent = format!("{rel}:{feature_line}");
            let found = reconcile(&child, &parent, &results, "/abs/ws");
            prop_assert_eq!(found.map(String::as_str), Some("passed"));
        }

        #[test]
        fn prop_insertion_order_irrelevant(
            keys in proptest::collection::vec(("[ab]", 1usize..4, 1usize..6), 0..12),
            line in 1usize..6,
        ) {
            let forward: HashMap<String, usize> = keys
                .iter()
                .enumerate()
                .map(|(i, (f, fl, l))| (format!("{f}/x.feature:{fl}:{l}"), i))
                .collect();
            let backward: HashMap<String, usize> = forward
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();

            let child = format!(":{line}");
            let a = reconcile(&child, "a/x.feature", &forward, "");
            let b = reconcile(&child, "a/x.feature", &backward, "");
            prop_assert_eq!(a, b);
        }
    }
}

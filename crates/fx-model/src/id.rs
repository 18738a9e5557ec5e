//! Structured identifiers for hierarchy nodes and execution results
//!
//! [`NodeId`] carries the structure end-to-end and is only turned into a
//! string at the host boundary. [`CompositeKey`] is the
//! `path:featureLine:scenarioLine` form execution results are keyed by.

use crate::scenario::ScenarioKind;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

static OUTLINE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+\.feature):(\d+):outline:(\d+)$").expect("valid regex"));
static COMPOSITE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+\.feature):(\d+):(\d+)$").expect("valid regex"));
static FEATURE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+\.feature)(?::(\d+))?$").expect("valid regex"));

/// Key of one execution result: `<relative path>:<featureLine>:<scenarioLine>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompositeKey {
    /// Feature file path, relative to the workspace root
    pub path: String,
    /// Line of the `Feature:` header
    pub feature_line: usize,
    /// Line of the scenario header or example row
    pub scenario_line: usize,
}

impl CompositeKey {
    /// Create key, normalizing path separators to `/`
    #[must_use]
    pub fn new(path: &str, feature_line: usize, scenario_line: usize) -> Self {
        Self {
            path: path.replace('\\', "/"),
            feature_line,
            scenario_line,
        }
    }
}

impl Display for CompositeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.feature_line, self.scenario_line)
    }
}

impl FromStr for CompositeKey {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, ':');
        let scenario = parts.next().ok_or_else(|| IdError::Unrecognized(s.to_string()))?;
        let feature = parts.next().ok_or_else(|| IdError::Unrecognized(s.to_string()))?;
        let path = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| IdError::Unrecognized(s.to_string()))?;

        Ok(Self::new(path, parse_line(feature, s)?, parse_line(scenario, s)?))
    }
}

/// Identifier of a node in the materialized test hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeId {
    /// Feature file node: `<path>` or `<path>:<featureLine>`
    Feature {
        /// Feature file path
        path: String,
        /// Line of the `Feature:` header, when known
        feature_line: Option<usize>,
    },
    /// Outline node: `<path>:<featureLine>:outline:<outlineLine>`
    Outline {
        /// Feature file path
        path: String,
        /// Line of the `Feature:` header
        feature_line: usize,
        /// Line of the `Scenario Outline:` header
        line: usize,
    },
    /// Scenario scoped under its parent: `:<line>`
    ScenarioRef(usize),
    /// Fully qualified scenario: `<path>:<featureLine>:<line>`
    Scenario(CompositeKey),
    /// Tag group: `tag:<tag>`
    TagGroup(String),
    /// Group of scenarios without tags: `untagged`
    Untagged,
    /// File group: `file:<path>`
    FileGroup(String),
    /// Scenario-kind group: `kind:regular` or `kind:outline`
    KindGroup(ScenarioKind),
    /// Catch-all group: `all`
    All,
}

impl NodeId {
    /// Feature file path this node refers to, if any
    #[must_use]
    pub fn file_path(&self) -> Option<&str> {
        match self {
            Self::Feature { path, .. } | Self::Outline { path, .. } | Self::FileGroup(path) => {
                Some(path)
            }
            Self::Scenario(key) => Some(&key.path),
            _ => None,
        }
    }

    /// Whether this identifier names a group rather than a runnable scenario
    #[inline]
    #[must_use]
    pub fn is_group(&self) -> bool {
        !matches!(self, Self::ScenarioRef(_) | Self::Scenario(_))
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feature {
                path,
                feature_line: Some(line),
            } => write!(f, "{path}:{line}"),
            Self::Feature {
                path,
                feature_line: None,
            } => write!(f, "{path}"),
            Self::Outline {
                path,
                feature_line,
                line,
            } => write!(f, "{path}:{feature_line}:outline:{line}"),
            Self::ScenarioRef(line) => write!(f, ":{line}"),
            Self::Scenario(key) => write!(f, "{key}"),
            Self::TagGroup(tag) => write!(f, "tag:{tag}"),
            Self::Untagged => write!(f, "untagged"),
            Self::FileGroup(path) => write!(f, "file:{path}"),
            Self::KindGroup(kind) => write!(f, "kind:{}", kind.as_str()),
            Self::All => write!(f, "all"),
        }
    }
}

impl FromStr for NodeId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => return Ok(Self::All),
            "untagged" => return Ok(Self::Untagged),
            _ => {}
        }

        if let Some(tag) = s.strip_prefix("tag:") {
            return Ok(Self::TagGroup(tag.to_string()));
        }
        if let Some(path) = s.strip_prefix("file:") {
            return Ok(Self::FileGroup(path.to_string()));
        }
        if let Some(kind) = s.strip_prefix("kind:") {
            return match kind {
                "regular" => Ok(Self::KindGroup(ScenarioKind::Regular)),
                "outline" => Ok(Self::KindGroup(ScenarioKind::Outline)),
                _ => Err(IdError::Unrecognized(s.to_string())),
            };
        }
        if let Some(line) = s.strip_prefix(':') {
            return Ok(Self::ScenarioRef(parse_line(line, s)?));
        }

        if let Some(caps) = OUTLINE_ID.captures(s) {
            return Ok(Self::Outline {
                path: caps[1].to_string(),
                feature_line: parse_line(&caps[2], s)?,
                line: parse_line(&caps[3], s)?,
            });
        }
        if let Some(caps) = COMPOSITE_ID.captures(s) {
            return Ok(Self::Scenario(CompositeKey::new(
                &caps[1],
                parse_line(&caps[2], s)?,
                parse_line(&caps[3], s)?,
            )));
        }
        if let Some(caps) = FEATURE_ID.captures(s) {
            let feature_line = caps
                .get(2)
                .map(|m| parse_line(m.as_str(), s))
                .transpose()?;
            return Ok(Self::Feature {
                path: caps[1].to_string(),
                feature_line,
            });
        }

        Err(IdError::Unrecognized(s.to_string()))
    }
}

fn parse_line(segment: &str, whole: &str) -> Result<usize, IdError> {
    segment.parse().map_err(|_| IdError::InvalidLine {
        id: whole.to_string(),
        segment: segment.to_string(),
    })
}

/// Errors parsing identifiers
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdError {
    /// Identifier matches none of the known schemes
    #[error("unrecognized identifier: '{0}'")]
    Unrecognized(String),

    /// Line segment is not a number
    #[error("invalid line '{segment}' in identifier '{id}'")]
    InvalidLine {
        /// Identifier being parsed
        id: String,
        /// Offending segment
        segment: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_key_display() {
        let key = CompositeKey::new("features/x.feature", 2, 10);
        assert_eq!(key.to_string(), "features/x.feature:2:10");
    }

    #[test]
    fn composite_key_normalizes_separators() {
        let key = CompositeKey::new("features\\x.feature", 2, 10);
        assert_eq!(key.path, "features/x.feature");
    }

    #[test]
    fn composite_key_from_str() {
        let key: CompositeKey = "features/x.feature:2:10".parse().unwrap();
        assert_eq!(key.path, "features/x.feature");
        assert_eq!(key.feature_line, 2);
        assert_eq!(key.scenario_line, 10);
    }

    #[test]
    fn composite_key_from_str_rejects_garbage() {
        assert!("features/x.feature:10".parse::<CompositeKey>().is_err());
        assert!("a:b:c".parse::<CompositeKey>().is_err());
        assert!(":1:2".parse::<CompositeKey>().is_err());
    }

    #[test]
    fn node_id_group_forms() {
        assert_eq!("all".parse::<NodeId>().unwrap(), NodeId::All);
        assert_eq!("untagged".parse::<NodeId>().unwrap(), NodeId::Untagged);
        assert_eq!(
            "tag:@smoke".parse::<NodeId>().unwrap(),
            NodeId::TagGroup("@smoke".into())
        );
        assert_eq!(
            "file:features/a.feature".parse::<NodeId>().unwrap(),
            NodeId::FileGroup("features/a.feature".into())
        );
        assert_eq!(
            "kind:outline".parse::<NodeId>().unwrap(),
            NodeId::KindGroup(ScenarioKind::Outline)
        );
        assert!("kind:other".parse::<NodeId>().is_err());
    }

    #[test]
    fn node_id_feature_forms() {
        assert_eq!(
            "features/x.feature:2".parse::<NodeId>().unwrap(),
            NodeId::Feature {
                path: "features/x.feature".into(),
                feature_line: Some(2)
            }
        );
        assert_eq!(
            "features/x.feature".parse::<NodeId>().unwrap(),
            NodeId::Feature {
                path: "features/x.feature".into(),
                feature_line: None
            }
        );
    }

    #[test]
    fn node_id_scenario_forms() {
        assert_eq!(":10".parse::<NodeId>().unwrap(), NodeId::ScenarioRef(10));
        assert_eq!(
            "features/x.feature:2:10".parse::<NodeId>().unwrap(),
            NodeId::Scenario(CompositeKey::new("features/x.feature", 2, 10))
        );
        assert_eq!(
            "features/x.feature:2:outline:5".parse::<NodeId>().unwrap(),
            NodeId::Outline {
                path: "features/x.feature".into(),
                feature_line: 2,
                line: 5
            }
        );
    }

    #[test]
    fn node_id_rejects_unknown() {
        assert!(matches!(
            "whatever".parse::<NodeId>(),
            Err(IdError::Unrecognized(_))
        ));
        assert!(matches!(
            ":abc".parse::<NodeId>(),
            Err(IdError::InvalidLine { .. })
        ));
    }

    #[test]
    fn node_id_display_roundtrip() {
        let ids = [
            NodeId::Feature {
                path: "a/b.feature".into(),
                feature_line: Some(1),
            },
            NodeId::Outline {
                path: "a/b.feature".into(),
                feature_line: 1,
                line: 7,
            },
            NodeId::ScenarioRef(4),
            NodeId::Scenario(CompositeKey::new("a/b.feature", 1, 4)),
            NodeId::TagGroup("@wip".into()),
            NodeId::Untagged,
            NodeId::FileGroup("a/b.feature".into()),
            NodeId::KindGroup(ScenarioKind::Regular),
            NodeId::All,
        ];
        for id in ids {
            assert_eq!(id.to_string().parse::<NodeId>().unwrap(), id);
        }
    }

    #[test]
    fn node_id_file_path() {
        let id: NodeId = "features/x.feature:2:10".parse().unwrap();
        assert_eq!(id.file_path(), Some("features/x.feature"));
        assert!(!id.is_group());
        assert_eq!(NodeId::All.file_path(), None);
        assert!(NodeId::All.is_group());
    }
}

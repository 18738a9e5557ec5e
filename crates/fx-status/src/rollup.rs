//! Status roll-up over a materialized hierarchy

use crate::reconciler::reconcile;
use fx_model::{NodeId, NodeStatus, StatusError, TestStatus};
use fx_organize::TestNode;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Status of one hierarchy node and its children
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeReport {
    /// Node id as handed to the host
    pub id: String,
    /// Node label
    pub label: String,
    /// Resolved or rolled-up status
    pub status: NodeStatus,
    /// Child reports in display order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeReport>,
}

impl NodeReport {
    /// Number of leaves with `status`
    #[must_use]
    pub fn count(&self, status: NodeStatus) -> usize {
        if self.children.is_empty() {
            usize::from(self.status == status)
        } else {
            self.children.iter().map(|c| c.count(status)).sum()
        }
    }
}

/// Reconcile every leaf of `nodes` and roll statuses up to the roots
///
/// Leaves are resolved against their parent's id; a leaf with no
/// resolvable result is skipped. A parent fails when any child failed and
/// passes only when every child passed.
#[must_use]
pub fn apply_results<S: BuildHasher>(
    nodes: &[TestNode],
    results: &HashMap<String, TestStatus, S>,
    root: &str,
) -> Vec<NodeReport> {
    nodes.iter().map(|node| report(node, None, results, root)).collect()
}

fn report<S: BuildHasher>(
    node: &TestNode,
    parent: Option<&NodeId>,
    results: &HashMap<String, TestStatus, S>,
    root: &str,
) -> NodeReport {
    let id = node.id.to_string();
    let (status, children) = if node.is_leaf() && !node.id.is_group() {
        let parent_id = parent.map(ToString::to_string).unwrap_or_default();
        let status = reconcile(&id, &parent_id, results, root).copied();
        (NodeStatus::from(status), Vec::new())
    } else {
        let children: Vec<NodeReport> = node
            .children
            .iter()
            .map(|child| report(child, Some(&node.id), results, root))
            .collect();
        (NodeStatus::roll_up(children.iter().map(|c| c.status)), children)
    };

    NodeReport {
        id,
        label: node.label.clone(),
        status,
        children,
    }
}

/// Parse raw executor output into typed results
///
/// Entries with unknown status values are dropped and returned alongside.
#[must_use]
pub fn parse_results<I, K, V>(raw: I) -> (HashMap<String, TestStatus>, Vec<StatusError>)
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: AsRef<str>,
{
    let mut results = HashMap::new();
    let mut errors = Vec::new();
    for (key, value) in raw {
        match value.as_ref().parse::<TestStatus>() {
            Ok(status) => {
                results.insert(key.into(), status);
            }
            Err(err) => {
                tracing::warn!("ignoring result: {}", err);
                errors.push(err);
            }
        }
    }
    (results, errors)
}

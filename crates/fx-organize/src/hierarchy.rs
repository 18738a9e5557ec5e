//! Test hierarchy materialization
//!
//! Turns groups into the node tree a test explorer displays. Feature groups
//! become `file -> outline -> example` trees whose scenario children carry
//! short `:<line>` ids; groups from every other strategy hold leaves with
//! fully composite ids.

use crate::strategy::StrategyKind;
use fx_model::{NodeId, Scenario, TestGroup};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// One node of the materialized hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestNode {
    /// Structured id, serialized as its string form
    #[serde(serialize_with = "serialize_id")]
    pub id: NodeId,
    /// Display label
    pub label: String,
    /// Display description
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Feature file the node points at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// 1-based source line the node points at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Tags of a scenario leaf
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Child nodes in display order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TestNode>,
}

impl TestNode {
    /// Create a node without location or children
    #[must_use]
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            description: String::new(),
            file_path: None,
            line: None,
            tags: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Leaf for one runnable scenario
    #[must_use]
    pub fn leaf(id: NodeId, scenario: &Scenario) -> Self {
        Self {
            file_path: Some(scenario.file_path.clone()),
            line: Some(scenario.line_number),
            tags: scenario.tags.clone(),
            ..Self::new(id, scenario.name.clone())
        }
    }

    /// Set description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether the node has no children
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of leaves under (and including) this node
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(Self::leaf_count).sum()
        }
    }

    /// Depth-first search for a node by id
    #[must_use]
    pub fn find(&self, id: &NodeId) -> Option<&TestNode> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

fn serialize_id<S: Serializer>(id: &NodeId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(id)
}

/// Materialize groups produced by `kind` into a node tree
#[must_use]
pub fn materialize(groups: &[TestGroup], kind: StrategyKind) -> Vec<TestNode> {
    let all = NodeId::All.to_string();
    groups
        .iter()
        .filter_map(|group| {
            // a failed feature grouping falls back to one flat group
            if kind.is_hierarchical() && group.id != all {
                feature_tree(group)
            } else {
                group_node(group)
            }
        })
        .collect()
}

fn feature_tree(group: &TestGroup) -> Option<TestNode> {
    let first = group.scenarios.first()?;
    let mut node = TestNode::new(crate::feature::feature_node(first), group.label.clone())
        .with_description(group.description.clone());
    node.file_path = Some(first.file_path.clone());
    node.line = first.feature_line_number;

    let mut children: IndexMap<ChildSlot, TestNode> = IndexMap::new();
    for scenario in &group.scenarios {
        let leaf = TestNode::leaf(NodeId::ScenarioRef(scenario.line_number), scenario);
        match scenario.outline_line_number {
            Some(outline_line) if scenario.is_example() => {
                children
                    .entry(ChildSlot::Outline(outline_line))
                    .or_insert_with(|| outline_node(scenario, outline_line))
                    .children
                    .push(leaf);
            }
            _ => {
                children.insert(ChildSlot::Scenario(scenario.line_number), leaf);
            }
        }
    }
    node.children = children.into_values().collect();
    Some(node)
}

fn outline_node(example: &Scenario, outline_line: usize) -> TestNode {
    let id = NodeId::Outline {
        path: example.file_path.clone(),
        feature_line: example.feature_line_number.unwrap_or_default(),
        line: outline_line,
    };
    let label = example
        .outline_name
        .clone()
        .unwrap_or_else(|| example.name.clone());
    let mut node = TestNode::new(id, label);
    node.file_path = Some(example.file_path.clone());
    node.line = Some(outline_line);
    node
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ChildSlot {
    Scenario(usize),
    Outline(usize),
}

fn group_node(group: &TestGroup) -> Option<TestNode> {
    let id = match group.id.parse::<NodeId>() {
        Ok(id) => id,
        Err(err) => {
            tracing::warn!("skipping group '{}': {}", group.label, err);
            return None;
        }
    };
    let mut node =
        TestNode::new(id, group.label.clone()).with_description(group.description.clone());
    node.children = group
        .scenarios
        .iter()
        .map(|scenario| {
            let id = scenario
                .composite_key()
                .map_or(NodeId::ScenarioRef(scenario.line_number), NodeId::Scenario);
            TestNode::leaf(id, scenario)
        })
        .collect();
    Some(node)
}

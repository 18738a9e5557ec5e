//! Command surface derived from a parsed feature
//!
//! Produces the run/debug actions an editor attaches inline to a feature
//! file: one feature-level run, a run and a debug per scenario, outline and
//! example, and one run per unique tag.

use crate::naming::extract_outline_name;
use fx_model::{ParsedFeature, Scenario};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Run or debug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Run the target
    Run,
    /// Run the target under a debugger
    Debug,
}

/// What an action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionScope {
    /// Whole feature file
    Feature,
    /// One regular scenario
    Scenario,
    /// Every example of one outline
    Outline,
    /// One expanded example
    Example,
    /// Scenarios carrying one tag
    Tag,
}

/// One invocable action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Run or debug
    pub kind: ActionKind,
    /// Target scope
    pub scope: ActionScope,
    /// Feature file
    pub file_path: String,
    /// Source line the action is anchored to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Name of the target (feature, scenario or outline)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tag for tag-scoped actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Action {
    fn new(kind: ActionKind, scope: ActionScope, file_path: &str) -> Self {
        Self {
            kind,
            scope,
            file_path: file_path.to_string(),
            line: None,
            name: None,
            tag: None,
        }
    }

    fn at(mut self, line: Option<usize>, name: impl Into<String>) -> Self {
        self.line = line;
        self.name = Some(name.into());
        self
    }

    /// Short display title, e.g. `Run Scenario` or `Run @smoke`
    #[must_use]
    pub fn title(&self) -> String {
        let verb = match self.kind {
            ActionKind::Run => "Run",
            ActionKind::Debug => "Debug",
        };
        match (self.scope, self.tag.as_deref()) {
            (ActionScope::Tag, Some(tag)) => format!("{verb} {tag}"),
            (ActionScope::Feature, _) => format!("{verb} Feature"),
            (ActionScope::Scenario, _) => format!("{verb} Scenario"),
            (ActionScope::Outline, _) => format!("{verb} Outline"),
            (ActionScope::Example, _) => format!("{verb} Example"),
            (ActionScope::Tag, None) => format!("{verb} Tag"),
        }
    }
}

/// Derive the action surface of a feature
#[must_use]
pub fn derive_actions(feature: &ParsedFeature) -> Vec<Action> {
    let path = feature.file_path.as_str();
    let mut actions = vec![Action::new(ActionKind::Run, ActionScope::Feature, path)
        .at(feature.feature_line_number, feature.feature.clone())];

    let mut outlines_seen: HashSet<usize> = HashSet::new();
    for scenario in &feature.scenarios {
        let line = Some(scenario.line_number);
        if scenario.is_scenario_outline {
            outlines_seen.insert(scenario.line_number);
            push_pair(&mut actions, ActionScope::Outline, path, line, &scenario.name);
        } else if let Some(outline_line) = scenario.outline_line_number {
            if outlines_seen.insert(outline_line) {
                let outline_name = outline_name_of(scenario);
                push_pair(
                    &mut actions,
                    ActionScope::Outline,
                    path,
                    Some(outline_line),
                    &outline_name,
                );
            }
            push_pair(&mut actions, ActionScope::Example, path, line, &scenario.name);
        } else {
            push_pair(&mut actions, ActionScope::Scenario, path, line, &scenario.name);
        }
    }

    let tags: IndexSet<&str> = feature
        .tags
        .iter()
        .chain(feature.scenarios.iter().flat_map(|s| &s.tags))
        .map(String::as_str)
        .collect();
    actions.extend(tags.into_iter().map(|tag| {
        let mut action = Action::new(ActionKind::Run, ActionScope::Tag, path);
        action.tag = Some(tag.to_string());
        action
    }));

    actions
}

fn push_pair(
    actions: &mut Vec<Action>,
    scope: ActionScope,
    path: &str,
    line: Option<usize>,
    name: &str,
) {
    for kind in [ActionKind::Run, ActionKind::Debug] {
        actions.push(Action::new(kind, scope, path).at(line, name));
    }
}

fn outline_name_of(example: &Scenario) -> String {
    example
        .outline_name
        .clone()
        .unwrap_or_else(|| extract_outline_name(&example.name))
}

//! Scenario-type strategy: regular scenarios and outlines

use crate::flat::describe;
use fx_model::{NodeId, Scenario, ScenarioKind, TestGroup};

/// Label of the regular scenario group
pub const REGULAR_LABEL: &str = "Regular Scenarios";

/// Label of the outline group
pub const OUTLINE_LABEL: &str = "Scenario Outlines";

pub(crate) fn organize(scenarios: &[Scenario]) -> Vec<TestGroup> {
    let (outlines, regular): (Vec<Scenario>, Vec<Scenario>) = scenarios
        .iter()
        .cloned()
        .partition(|s| s.kind() == ScenarioKind::Outline);

    [
        (ScenarioKind::Regular, REGULAR_LABEL, regular),
        (ScenarioKind::Outline, OUTLINE_LABEL, outlines),
    ]
    .into_iter()
    .filter(|(_, _, members)| !members.is_empty())
    .map(|(kind, label, members)| {
        let description = describe(members.len());
        TestGroup::new(NodeId::KindGroup(kind).to_string(), label, members)
            .with_description(description)
    })
    .collect()
}

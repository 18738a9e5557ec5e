//! Flat strategy: every scenario in one group

use fx_model::{NodeId, Scenario, TestGroup};

/// Label of the single flat group
pub const ALL_SCENARIOS_LABEL: &str = "All Scenarios";

pub(crate) fn organize(scenarios: &[Scenario]) -> Vec<TestGroup> {
    vec![TestGroup::new(NodeId::All.to_string(), ALL_SCENARIOS_LABEL, scenarios.to_vec())
        .with_description(describe(scenarios.len()))]
}

pub(crate) fn describe(count: usize) -> String {
    match count {
        1 => "1 scenario".to_string(),
        n => format!("{n} scenarios"),
    }
}

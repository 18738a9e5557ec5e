//! File strategy: one group per feature file, in encounter order

use crate::strategy::OrganizeError;
use fx_model::{NodeId, Scenario, TestGroup};
use indexmap::IndexMap;

pub(crate) fn organize(scenarios: &[Scenario]) -> Result<Vec<TestGroup>, OrganizeError> {
    let by_file = group_by_file(scenarios)?;
    Ok(by_file
        .into_iter()
        .map(|(path, members)| {
            let label = members[0].file_name().to_string();
            TestGroup::new(NodeId::FileGroup(path.to_string()).to_string(), label, members)
                .with_description(path)
        })
        .collect())
}

/// Bucket scenarios by file path, keeping first-seen file order
pub(crate) fn group_by_file(
    scenarios: &[Scenario],
) -> Result<IndexMap<&str, Vec<Scenario>>, OrganizeError> {
    let mut by_file: IndexMap<&str, Vec<Scenario>> = IndexMap::new();
    for scenario in scenarios {
        if scenario.file_path.trim().is_empty() {
            return Err(OrganizeError::MissingFilePath(scenario.name.clone()));
        }
        by_file
            .entry(scenario.file_path.as_str())
            .or_default()
            .push(scenario.clone());
    }
    Ok(by_file)
}

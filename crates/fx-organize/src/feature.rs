//! Feature strategy: one group per file, materialized as a tree
//!
//! The group id is the feature node id (`<path>:<featureLine>`), so the
//! reconciler can recover both the file and the feature line from a child's
//! parent.

use crate::file::group_by_file;
use crate::strategy::OrganizeError;
use fx_model::{NodeId, Scenario, TestGroup};

pub(crate) fn organize(scenarios: &[Scenario]) -> Result<Vec<TestGroup>, OrganizeError> {
    let by_file = group_by_file(scenarios)?;
    Ok(by_file
        .into_iter()
        .map(|(path, members)| {
            let id = feature_node(&members[0]);
            let label = members[0].file_name().to_string();
            TestGroup::new(id.to_string(), label, members).with_description(path)
        })
        .collect())
}

/// Feature node id for the file a scenario belongs to
pub(crate) fn feature_node(scenario: &Scenario) -> NodeId {
    NodeId::Feature {
        path: scenario.file_path.clone(),
        feature_line: scenario.feature_line_number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_id_carries_feature_line() {
        let scenarios = vec![
            Scenario::new("S", "features/x.feature", 4).with_feature_line(2),
            Scenario::new("T", "features/y.feature", 3).with_feature_line(1),
        ];
        let groups = organize(&scenarios).unwrap();
        assert_eq!(groups[0].id, "features/x.feature:2");
        assert_eq!(groups[0].label, "x.feature");
        assert_eq!(groups[1].id, "features/y.feature:1");
    }

    #[test]
    fn unknown_feature_line_uses_path() {
        let groups = organize(&[Scenario::new("S", "x.feature", 4)]).unwrap();
        assert_eq!(groups[0].id, "x.feature");
    }
}

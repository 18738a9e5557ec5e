//! Tag strategy
//!
//! One group per distinct tag in first-seen order, then `Untagged`. A
//! scenario with several tags is a member of each of their groups.

use crate::flat::describe;
use crate::strategy::OrganizeError;
use fx_model::{NodeId, Scenario, TestGroup};
use indexmap::{IndexMap, IndexSet};

/// Label of the group for scenarios without tags
pub const UNTAGGED_LABEL: &str = "Untagged";

pub(crate) fn organize(scenarios: &[Scenario]) -> Result<Vec<TestGroup>, OrganizeError> {
    let mut by_tag: IndexMap<&str, Vec<Scenario>> = IndexMap::new();
    let mut untagged = Vec::new();

    for scenario in scenarios {
        // a tag repeated on one scenario still counts once
        let tags: IndexSet<&str> = scenario.tags.iter().map(String::as_str).collect();
        if tags.is_empty() {
            untagged.push(scenario.clone());
            continue;
        }
        for tag in tags {
            validate(scenario, tag)?;
            by_tag.entry(tag).or_default().push(scenario.clone());
        }
    }

    let mut groups: Vec<TestGroup> = by_tag
        .into_iter()
        .map(|(tag, members)| {
            let description = describe(members.len());
            TestGroup::new(NodeId::TagGroup(tag.to_string()).to_string(), tag, members)
                .with_description(description)
        })
        .collect();

    if !untagged.is_empty() {
        let description = describe(untagged.len());
        groups.push(
            TestGroup::new(NodeId::Untagged.to_string(), UNTAGGED_LABEL, untagged)
                .with_description(description),
        );
    }
    Ok(groups)
}

fn validate(scenario: &Scenario, tag: &str) -> Result<(), OrganizeError> {
    let body = tag.strip_prefix('@').unwrap_or_default();
    if body.is_empty() || body.chars().any(char::is_whitespace) {
        return Err(OrganizeError::InvalidTag {
            scenario: scenario.name.clone(),
            tag: tag.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn tagged(name: &str, line: usize, tags: &[&str]) -> Scenario {
        Scenario::new(name, "a.feature", line).with_tags(tags.iter().copied())
    }

    fn names(group: &TestGroup) -> Vec<&str> {
        group.scenarios.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn multi_membership_and_untagged_last() {
        let scenarios = vec![
            tagged("plain", 2, &[]),
            tagged("both", 4, &["@a", "@b"]),
            tagged("only-b", 6, &["@b"]),
        ];
        let groups = organize(&scenarios).unwrap();

        let ids: Vec<_> = groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["tag:@a", "tag:@b", "untagged"]);
        assert_eq!(names(&groups[0]), vec!["both"]);
        assert_eq!(names(&groups[1]), vec!["both", "only-b"]);
        assert_eq!(names(&groups[2]), vec!["plain"]);
        assert_eq!(groups[2].label, "Untagged");
    }

    #[test]
    fn duplicate_tag_counts_once() {
        let groups = organize(&[tagged("dup", 2, &["@a", "@a"])]).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 1);
    }

    #[test]
    fn no_untagged_group_when_all_tagged() {
        let groups = organize(&[tagged("x", 2, &["@a"])]).unwrap();
        assert!(groups.iter().all(|g| g.id != "untagged"));
    }

    #[test]
    fn invalid_tag_is_an_error() {
        let err = organize(&[tagged("x", 2, &["@"])]).unwrap_err();
        assert!(matches!(err, OrganizeError::InvalidTag { .. }));
        assert!(organize(&[tagged("x", 2, &["nope"])]).is_err());
    }

    proptest! {
        #[test]
        fn prop_membership_multiplicity(
            tag_sets in proptest::collection::vec(
                proptest::collection::vec(prop_oneof!["@a", "@b", "@c", "@d"], 0..4),
                0..25,
            )
        ) {
            let scenarios: Vec<Scenario> = tag_sets
                .iter()
                .enumerate()
                .map(|(i, tags)| Scenario::new(format!("s{i}"), "p.feature", i + 1).with_tags(tags.clone()))
                .collect();
            let groups = organize(&scenarios).unwrap();

            let expected: usize = scenarios
                .iter()
                .map(|s| s.tags.iter().collect::<IndexSet<_>>().len().max(1))
                .sum();
            let total: usize = groups.iter().map(TestGroup::len).sum();
            prop_assert_eq!(total, expected);

            for scenario in &scenarios {
                let member_of: IndexSet<&str> = groups
                    .iter()
                    .filter(|g| g.scenarios.iter().any(|s| s.name == scenario.name))
                    .map(|g| g.label.as_str())
                    .collect();
                let own: IndexSet<&str> = scenario.tags.iter().map(String::as_str).collect();
                if own.is_empty() {
                    prop_assert_eq!(member_of, IndexSet::from([UNTAGGED_LABEL]));
                } else {
                    prop_assert_eq!(member_of, own);
                }
            }
        }
    }
}

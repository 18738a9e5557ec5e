//! Feature model builder
//!
//! Consumes scanner output and assembles a [`ParsedFeature`]. Scenario
//! outlines are expanded into one concrete [`Scenario`] per example row;
//! an outline without data rows is kept as a single synthetic scenario.

use crate::error::ParseIssue;
use crate::naming::{substitute_placeholders, ExampleNaming};
use crate::scanner::{scan, split_row, LineKind, ScannedLine};
use fx_model::{ParsedFeature, Scenario};
use std::path::Path;

/// Parsed model plus the malformed constructs skipped along the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    /// `None` when the text has no `Feature:` header
    pub feature: Option<ParsedFeature>,
    /// Skipped constructs, in source order
    pub issues: Vec<ParseIssue>,
}

/// Whole-file feature parser
///
/// Stateless apart from its naming policy; every call rebuilds the model
/// from scratch.
#[derive(Debug, Clone, Default)]
pub struct FeatureParser {
    naming: ExampleNaming,
}

impl FeatureParser {
    /// Create parser with the default naming policy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create parser with a custom naming policy
    #[inline]
    #[must_use]
    pub fn with_naming(naming: ExampleNaming) -> Self {
        Self { naming }
    }

    /// Naming policy for expanded examples
    #[inline]
    #[must_use]
    pub fn naming(&self) -> &ExampleNaming {
        &self.naming
    }

    /// Parse `text` read from `file_path`
    ///
    /// Returns `None` when the text is not a feature file (no `Feature:`
    /// header), which is distinct from a feature with zero scenarios.
    #[must_use]
    pub fn parse(&self, text: &str, file_path: &str) -> Option<ParsedFeature> {
        self.parse_with_issues(text, file_path).feature
    }

    /// Parse and also report skipped constructs
    #[must_use]
    pub fn parse_with_issues(&self, text: &str, file_path: &str) -> ParseOutcome {
        let mut builder = Builder::new(&self.naming, file_path);
        for line in scan(text) {
            builder.feed(&line);
        }
        let outcome = builder.finish();

        for issue in &outcome.issues {
            tracing::debug!(file = file_path, %issue, "skipped malformed construct");
        }
        outcome
    }

    /// Check if this parser handles the given path
    #[must_use]
    pub fn can_parse(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }

    /// Supported file extensions (without dot)
    #[must_use]
    pub fn extensions(&self) -> &[&str] {
        &["feature"]
    }
}

/// Parse with the default naming policy
#[must_use]
pub fn parse_feature(text: &str, file_path: &str) -> Option<ParsedFeature> {
    FeatureParser::default().parse(text, file_path)
}

struct FeatureHeader {
    name: String,
    line: usize,
    tags: Vec<String>,
}

struct Outline {
    name: String,
    line: usize,
    tags: Vec<String>,
    steps: Vec<String>,
    examples: Option<Examples>,
    rows: usize,
}

struct Examples {
    tags: Vec<String>,
    header: Option<Vec<String>>,
    rejected: bool,
}

enum Block {
    None,
    Background,
    Scenario(Scenario),
    Outline(Outline),
}

struct Builder<'a> {
    naming: &'a ExampleNaming,
    file_path: &'a str,
    feature: Option<FeatureHeader>,
    scenarios: Vec<Scenario>,
    pending_tags: Vec<String>,
    block: Block,
    doc_string: Option<(&'static str, usize)>,
    issues: Vec<ParseIssue>,
}

impl<'a> Builder<'a> {
    fn new(naming: &'a ExampleNaming, file_path: &'a str) -> Self {
        Self {
            naming,
            file_path,
            feature: None,
            scenarios: Vec::new(),
            pending_tags: Vec::new(),
            block: Block::None,
            doc_string: None,
            issues: Vec::new(),
        }
    }

    fn feed(&mut self, line: &ScannedLine) {
        if let Some((delimiter, _)) = self.doc_string {
            if line.trimmed.starts_with(delimiter) {
                self.doc_string = None;
            }
            return;
        }

        let number = line.line_number;
        match line.kind() {
            LineKind::Blank | LineKind::Other => self.pending_tags.clear(),
            LineKind::Comment => {}
            LineKind::Tags(tags) => self.pending_tags.extend(tags),
            LineKind::Feature(name) => self.start_feature(name, number),
            LineKind::Rule(_) => {
                self.finish_block();
                self.pending_tags.clear();
            }
            LineKind::Background => {
                self.finish_block();
                self.pending_tags.clear();
                self.block = Block::Background;
            }
            LineKind::Scenario(name) => self.start_scenario(name, number, false),
            LineKind::Outline(name) => self.start_scenario(name, number, true),
            LineKind::Examples(_) => self.start_examples(number),
            LineKind::TableRow => self.table_row(&line.trimmed, number),
            LineKind::DocString(delimiter) => self.doc_string = Some((delimiter, number)),
            LineKind::Step => {
                self.pending_tags.clear();
                self.push_step(&line.trimmed);
            }
        }
    }

    fn start_feature(&mut self, name: &str, line: usize) {
        if self.feature.is_some() {
            self.issues.push(ParseIssue::DuplicateFeature { line });
            self.pending_tags.clear();
            return;
        }
        self.finish_block();
        self.feature = Some(FeatureHeader {
            name: name.to_string(),
            line,
            tags: std::mem::take(&mut self.pending_tags),
        });
    }

    fn start_scenario(&mut self, name: &str, line: usize, outline: bool) {
        self.finish_block();
        let tags = std::mem::take(&mut self.pending_tags);

        let Some(feature_line) = self.feature.as_ref().map(|f| f.line) else {
            self.issues.push(ParseIssue::ScenarioBeforeFeature { line });
            return;
        };

        self.block = if outline {
            Block::Outline(Outline {
                name: name.to_string(),
                line,
                tags,
                steps: Vec::new(),
                examples: None,
                rows: 0,
            })
        } else {
            Block::Scenario(
                Scenario::new(name, self.file_path, line)
                    .with_feature_line(feature_line)
                    .with_tags(tags),
            )
        };
    }

    fn start_examples(&mut self, line: usize) {
        match &mut self.block {
            Block::Outline(outline) => {
                outline.examples = Some(Examples {
                    tags: std::mem::take(&mut self.pending_tags),
                    header: None,
                    rejected: false,
                });
            }
            _ => {
                self.issues.push(ParseIssue::ExamplesWithoutOutline { line });
                self.pending_tags.clear();
            }
        }
    }

    fn table_row(&mut self, trimmed: &str, line: usize) {
        // step data tables are not part of the model
        let Block::Outline(outline) = &mut self.block else {
            return;
        };
        let Some(examples) = outline.examples.as_mut() else {
            return;
        };
        if examples.rejected {
            return;
        }

        let Some(cells) = split_row(trimmed) else {
            self.issues.push(ParseIssue::MalformedRow { line });
            return;
        };

        let Some(header) = examples.header.as_ref() else {
            if cells.iter().any(String::is_empty) {
                self.issues.push(ParseIssue::EmptyHeaderCell { line });
                examples.rejected = true;
            } else {
                examples.header = Some(cells);
            }
            return;
        };

        if cells.len() != header.len() {
            self.issues.push(ParseIssue::CellCountMismatch {
                line,
                expected: header.len(),
                found: cells.len(),
            });
            return;
        }

        outline.rows += 1;
        let name = self
            .naming
            .example_name(outline.rows, &outline.name, header, &cells);
        let steps = outline
            .steps
            .iter()
            .map(|step| substitute_placeholders(step, header, &cells));
        let tags = outline.tags.iter().chain(&examples.tags).cloned();
        let feature_line = self.feature.as_ref().map_or(0, |f| f.line);

        self.scenarios.push(
            Scenario::new(name, self.file_path, line)
                .with_feature_line(feature_line)
                .with_tags(tags)
                .with_steps(steps)
                .example_of(outline.name.clone(), outline.line),
        );
    }

    fn push_step(&mut self, step: &str) {
        match &mut self.block {
            Block::Scenario(scenario) => scenario.steps.push(step.to_string()),
            Block::Outline(outline) if outline.examples.is_none() => {
                outline.steps.push(step.to_string());
            }
            _ => {}
        }
    }

    fn finish_block(&mut self) {
        match std::mem::replace(&mut self.block, Block::None) {
            Block::Scenario(scenario) => self.scenarios.push(scenario),
            Block::Outline(outline) if outline.rows == 0 => {
                let feature_line = self.feature.as_ref().map_or(0, |f| f.line);
                self.scenarios.push(
                    Scenario::new(outline.name, self.file_path, outline.line)
                        .with_feature_line(feature_line)
                        .with_tags(outline.tags)
                        .with_steps(outline.steps)
                        .as_outline(),
                );
            }
            Block::Outline(_) | Block::Background | Block::None => {}
        }
    }

    fn finish(mut self) -> ParseOutcome {
        self.finish_block();
        if let Some((_, line)) = self.doc_string {
            self.issues.push(ParseIssue::UnterminatedDocString { line });
        }

        let feature = self.feature.map(|header| {
            ParsedFeature::new(header.name, self.file_path)
                .with_feature_line(header.line)
                .with_tags(header.tags)
                .with_scenarios(self.scenarios)
        });

        ParseOutcome {
            feature,
            issues: self.issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PATH: &str = "features/calc.feature";

    fn parse(text: &str) -> ParsedFeature {
        parse_feature(text, PATH).expect("feature header present")
    }

    #[test]
    fn minimal_feature() {
        let feature = parse("Feature: F\n  Scenario: S\n    Given x\n");
        assert_eq!(feature.feature, "F");
        assert_eq!(feature.feature_line_number, Some(1));
        assert_eq!(feature.scenarios.len(), 1);

        let s = &feature.scenarios[0];
        assert_eq!(s.name, "S");
        assert_eq!(s.line_number, 2);
        assert_eq!(s.line, 1);
        assert_eq!(s.feature_line_number, Some(1));
        assert_eq!(s.steps, vec!["Given x"]);
        assert_eq!(s.file_path, PATH);
        assert!(!s.is_scenario_outline);
    }

    #[test]
    fn custom_naming_policy_applies_to_examples() {
        let parser = FeatureParser::with_naming(
            ExampleNaming::default().with_max_len(25).with_truncated_width(2),
        );
        assert_eq!(parser.naming().max_len, 25);

        let text = "\
Feature: F
  Scenario Outline: Add
    When I add <first> and <second>
    Examples:
      | first | second |
      | 1     | 2      |
";
        let feature = parser.parse(text, PATH).unwrap();
        assert_eq!(feature.scenarios[0].name, "1: Add - first: 1, se...: 2");
    }

    #[test]
    fn byte_order_mark_does_not_hide_header() {
        let feature = parse("\u{feff}Feature: F\n  Scenario: S\n    Given x\n");
        assert_eq!(feature.feature, "F");
        assert_eq!(feature.feature_line_number, Some(1));
        assert_eq!(feature.scenarios[0].line_number, 2);
    }

    #[test]
    fn no_feature_header_is_none() {
        assert!(parse_feature("Scenario: S\n  Given x\n", PATH).is_none());
        assert!(parse_feature("", PATH).is_none());
        assert!(parse_feature("just some text", PATH).is_none());
    }

    #[test]
    fn feature_without_scenarios_is_some() {
        let feature = parse("Feature: Empty\n  Just a description\n");
        assert!(feature.is_empty());
    }

    #[test]
    fn outline_expansion() {
        let text = "\
Feature: Calculator
  Scenario Outline: Add
    Given I have <a>
    Then I get <result>
    Examples:
      | a | result |
      | 1 | 1      |
      | 5 | 5      |
";
        let feature = parse(text);
        let names: Vec<_> = feature.scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["1: Add - a: 1, result: 1", "2: Add - a: 5, result: 5"]);

        let first = &feature.scenarios[0];
        assert_eq!(first.line_number, 7);
        assert_eq!(first.outline_line_number, Some(2));
        assert_eq!(first.outline_name.as_deref(), Some("Add"));
        assert_eq!(first.steps, vec!["Given I have 1", "Then I get 1"]);
        assert!(!first.is_scenario_outline);
        assert_eq!(feature.scenarios[1].line_number, 8);
    }

    #[test]
    fn outline_without_rows_kept_once() {
        let text = "\
Feature: F
  Scenario Outline: Pending
    Given <x>
    Examples:
      | x |
";
        let feature = parse(text);
        assert_eq!(feature.scenarios.len(), 1);
        let s = &feature.scenarios[0];
        assert_eq!(s.name, "Pending");
        assert_eq!(s.line_number, 2);
        assert!(s.is_scenario_outline);
        assert_eq!(s.outline_line_number, Some(2));
    }

    #[test]
    fn outline_without_examples_kept_once() {
        let feature = parse("Feature: F\n  Scenario Outline: Lonely\n    Given <x>\n");
        assert_eq!(feature.scenarios.len(), 1);
        assert!(feature.scenarios[0].is_scenario_outline);
    }

    #[test]
    fn multiple_example_blocks_keep_counting() {
        let text = "\
Feature: F
  Scenario Outline: O
    Given <x>
    Examples: first
      | x |
      | 1 |
    @slow
    Examples: second
      | x |
      | 2 |
";
        let feature = parse(text);
        let names: Vec<_> = feature.scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["1: O - x: 1", "2: O - x: 2"]);
        assert!(feature.scenarios[0].tags.is_empty());
        assert_eq!(feature.scenarios[1].tags, vec!["@slow"]);
    }

    #[test]
    fn tags_attach_to_following_header() {
        let text = "\
@feature-tag
Feature: F

  @a @b
  @c,@a
  Scenario: Tagged
    Given x

  Scenario: Plain
    Given y
";
        let feature = parse(text);
        assert_eq!(feature.tags, vec!["@feature-tag"]);
        assert_eq!(feature.scenarios[0].tags, vec!["@a", "@b", "@c", "@a"]);
        assert!(feature.scenarios[1].tags.is_empty());
    }

    #[test]
    fn tags_not_carried_across_blank_lines() {
        let text = "\
Feature: F
  @orphan

  Scenario: S
    Given x
";
        let feature = parse(text);
        assert!(feature.scenarios[0].tags.is_empty());
    }

    #[test]
    fn tags_survive_comment_lines() {
        let text = "\
Feature: F
  @kept
  # a comment
  Scenario: S
    Given x
";
        let feature = parse(text);
        assert_eq!(feature.scenarios[0].tags, vec!["@kept"]);
    }

    #[test]
    fn outline_tags_flow_to_examples() {
        let text = "\
Feature: F
  @math
  Scenario Outline: O
    Given <x>
    Examples:
      | x |
      | 1 |
";
        let feature = parse(text);
        assert_eq!(feature.scenarios[0].tags, vec!["@math"]);
    }

    #[test]
    fn malformed_rows_skipped() {
        let text = "\
Feature: F
  Scenario Outline: O
    Given <a>
    Examples:
      | a | b |
      | 1 | 2 |
      | 3 |
      | 4 | 5
      | 6 | 7 |
  Scenario: After
    Given x
";
        let outcome = FeatureParser::new().parse_with_issues(text, PATH);
        let feature = outcome.feature.unwrap();
        let names: Vec<_> = feature.scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["1: O - a: 1, b: 2", "2: O - a: 6, b: 7", "After"]);
        assert_eq!(
            outcome.issues,
            vec![
                ParseIssue::CellCountMismatch {
                    line: 7,
                    expected: 2,
                    found: 1
                },
                ParseIssue::MalformedRow { line: 8 },
            ]
        );
    }

    #[test]
    fn empty_header_rejects_block() {
        let text = "\
Feature: F
  Scenario Outline: O
    Given <a>
    Examples:
      | a |  |
      | 1 | 2 |
";
        let outcome = FeatureParser::new().parse_with_issues(text, PATH);
        let feature = outcome.feature.unwrap();
        assert_eq!(feature.scenarios.len(), 1);
        assert!(feature.scenarios[0].is_scenario_outline);
        assert_eq!(outcome.issues, vec![ParseIssue::EmptyHeaderCell { line: 5 }]);
    }

    #[test]
    fn examples_outside_outline_reported() {
        let text = "\
Feature: F
  Scenario: S
    Given x
    Examples:
      | a |
      | 1 |
";
        let outcome = FeatureParser::new().parse_with_issues(text, PATH);
        assert_eq!(outcome.feature.unwrap().scenarios.len(), 1);
        assert_eq!(outcome.issues, vec![ParseIssue::ExamplesWithoutOutline { line: 4 }]);
    }

    #[test]
    fn step_tables_and_doc_strings_ignored() {
        let text = "\
Feature: F
  Scenario Outline: O
    Given the table
      | not | examples |
    And the text
      \"\"\"
      Scenario: not a scenario
      | x |
      \"\"\"
    Examples:
      | v |
      | 1 |
";
        let feature = parse(text);
        assert_eq!(feature.scenarios.len(), 1);
        assert_eq!(feature.scenarios[0].name, "1: O - v: 1");
        assert_eq!(feature.scenarios[0].steps, vec!["Given the table", "And the text"]);
    }

    #[test]
    fn background_steps_not_attached() {
        let text = "\
Feature: F
  Background:
    Given setup
  Scenario: S
    When act
";
        let feature = parse(text);
        assert_eq!(feature.scenarios.len(), 1);
        assert_eq!(feature.scenarios[0].steps, vec!["When act"]);
    }

    #[test]
    fn rules_do_not_hide_scenarios() {
        let text = "\
Feature: F
  Rule: R1
    Scenario: A
      Given x
  Rule: R2
    Example: B
      Given y
";
        let feature = parse(text);
        let names: Vec<_> = feature.scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn windows_line_endings_number_identically() {
        let unix = parse("Feature: F\n\n  Scenario: S\n    Given x\n");
        let windows = parse("Feature: F\r\n\r\n  Scenario: S\r\n    Given x\r\n");
        assert_eq!(unix, windows);
        assert_eq!(windows.scenarios[0].line_number, 3);
    }

    #[test]
    fn scenario_before_feature_skipped() {
        let text = "Scenario: Early\n  Given x\nFeature: F\n  Scenario: S\n";
        let outcome = FeatureParser::new().parse_with_issues(text, PATH);
        let feature = outcome.feature.unwrap();
        assert_eq!(feature.scenarios.len(), 1);
        assert_eq!(feature.scenarios[0].name, "S");
        assert_eq!(outcome.issues, vec![ParseIssue::ScenarioBeforeFeature { line: 1 }]);
    }

    #[test]
    fn duplicate_feature_and_open_doc_string_reported() {
        let text = "Feature: A\nFeature: B\n  Scenario: S\n    Given x\n    \"\"\"\n    text\n";
        let outcome = FeatureParser::new().parse_with_issues(text, PATH);
        assert_eq!(outcome.feature.as_ref().unwrap().feature, "A");
        assert_eq!(
            outcome.issues,
            vec![
                ParseIssue::DuplicateFeature { line: 2 },
                ParseIssue::UnterminatedDocString { line: 5 },
            ]
        );
    }

    #[test]
    fn parser_extensions() {
        let parser = FeatureParser::new();
        assert!(parser.can_parse(Path::new("features/a.feature")));
        assert!(!parser.can_parse(Path::new("features/a.py")));
        assert!(!parser.can_parse(Path::new("feature")));
    }
}

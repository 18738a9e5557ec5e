//! Runner command lines for derived actions
//!
//! Execution is external; this module only builds the argv a host hands to
//! the runner process.

use crate::actions::{Action, ActionKind, ActionScope};
use fx_model::paths::relative_to_root;
use serde::{Deserialize, Serialize};

/// Default runner executable
pub const DEFAULT_PROGRAM: &str = "behave";

/// Default number of feature files run side by side
pub const DEFAULT_MAX_PARALLEL: usize = 4;

/// Output format the runner uses when none is requested
const RUNNER_DEFAULT_FORMAT: &str = "pretty";

/// How the external runner is invoked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Runner executable
    pub program: String,
    /// Arguments appended to every invocation
    pub extra_args: Vec<String>,
    /// Output format (`--format`)
    pub format: Option<String>,
    /// Pass `--dry-run`
    pub dry_run: bool,
    /// Batch width for parallel runs
    pub max_parallel: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            extra_args: Vec::new(),
            format: None,
            dry_run: false,
            max_parallel: DEFAULT_MAX_PARALLEL,
        }
    }
}

impl RunnerConfig {
    /// Create default config
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With runner executable
    #[inline]
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// With output format
    #[inline]
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// With dry-run flag
    #[inline]
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// With extra argument
    #[inline]
    #[must_use]
    pub fn with_extra_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// With parallel batch width (at least 1)
    #[inline]
    #[must_use]
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    fn append_common(&self, args: &mut Vec<String>) {
        if let Some(format) = self
            .format
            .as_deref()
            .filter(|f| *f != RUNNER_DEFAULT_FORMAT)
        {
            args.push("--format".to_string());
            args.push(format.to_string());
        }
        if self.dry_run {
            args.push("--dry-run".to_string());
        }
        args.extend(self.extra_args.iter().cloned());
    }
}

/// A single runner process to spawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerInvocation {
    /// Executable
    pub program: String,
    /// Arguments, unquoted
    pub args: Vec<String>,
    /// Attach a debugger
    pub debug: bool,
}

impl RunnerInvocation {
    /// Render as a single shell-style command line
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@=,+".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

/// Build the runner invocation for one action
///
/// Paths are made relative to `workspace_root` so the runner is started from
/// the workspace directory.
#[must_use]
pub fn invocation_for(action: &Action, workspace_root: &str, cfg: &RunnerConfig) -> RunnerInvocation {
    let path = relative_to_root(&action.file_path, workspace_root);
    let mut args = Vec::new();

    match action.scope {
        ActionScope::Feature => args.push(path),
        ActionScope::Scenario | ActionScope::Example => match action.line {
            Some(line) => args.push(format!("{path}:{line}")),
            None => args.push(path),
        },
        ActionScope::Outline => {
            args.push(path);
            if let Some(name) = action.name.as_deref() {
                args.push("--name".to_string());
                args.push(format!("^{}", regex::escape(name)));
            }
        }
        ActionScope::Tag => {
            args.push(path);
            if let Some(tag) = action.tag.as_deref() {
                args.push("--tags".to_string());
                args.push(tag.to_string());
            }
        }
    }
    cfg.append_common(&mut args);

    RunnerInvocation {
        program: cfg.program.clone(),
        args,
        debug: action.kind == ActionKind::Debug,
    }
}

/// Plan a parallel run over whole feature files
///
/// One invocation per file, grouped into batches of at most
/// `cfg.max_parallel`; batches run one after another.
#[must_use]
pub fn plan_parallel(
    files: &[String],
    workspace_root: &str,
    cfg: &RunnerConfig,
) -> Vec<Vec<RunnerInvocation>> {
    let width = cfg.max_parallel.max(1);
    let invocations: Vec<RunnerInvocation> = files
        .iter()
        .map(|file| {
            let mut args = vec![relative_to_root(file, workspace_root)];
            cfg.append_common(&mut args);
            RunnerInvocation {
                program: cfg.program.clone(),
                args,
                debug: false,
            }
        })
        .collect();

    invocations.chunks(width).map(<[_]>::to_vec).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::derive_actions;
    use crate::parser::parse_feature;
    use pretty_assertions::assert_eq;

    const TEXT: &str = "\
Feature: Math
  @fast
  Scenario: Zero
    Given 0
  Scenario Outline: Add (simple)
    When I add <a>
    Examples:
      | a |
      | 1 |
";

    fn actions() -> Vec<Action> {
        let feature = parse_feature(TEXT, "/ws/features/math.feature").unwrap();
        derive_actions(&feature)
    }

    fn find(scope: ActionScope, kind: ActionKind) -> Action {
        actions()
            .into_iter()
            .find(|a| a.scope == scope && a.kind == kind)
            .unwrap()
    }

    #[test]
    fn feature_runs_whole_file() {
        let inv = invocation_for(
            &find(ActionScope::Feature, ActionKind::Run),
            "/ws",
            &RunnerConfig::default(),
        );
        assert_eq!(inv.program, "behave");
        assert_eq!(inv.args, vec!["features/math.feature"]);
        assert!(!inv.debug);
    }

    #[test]
    fn scenario_and_example_use_line() {
        let cfg = RunnerConfig::default();
        let scenario = invocation_for(&find(ActionScope::Scenario, ActionKind::Run), "/ws", &cfg);
        assert_eq!(scenario.args, vec!["features/math.feature:3"]);

        let example = invocation_for(&find(ActionScope::Example, ActionKind::Debug), "/ws", &cfg);
        assert_eq!(example.args, vec!["features/math.feature:9"]);
        assert!(example.debug);
    }

    #[test]
    fn outline_filters_by_escaped_name() {
        let inv = invocation_for(
            &find(ActionScope::Outline, ActionKind::Run),
            "/ws",
            &RunnerConfig::default(),
        );
        assert_eq!(
            inv.args,
            vec!["features/math.feature", "--name", r"^Add \(simple\)"]
        );
    }

    #[test]
    fn tag_selects_with_tags() {
        let inv = invocation_for(
            &find(ActionScope::Tag, ActionKind::Run),
            "/ws",
            &RunnerConfig::default(),
        );
        assert_eq!(inv.args, vec!["features/math.feature", "--tags", "@fast"]);
    }

    #[test]
    fn common_flags_appended() {
        let cfg = RunnerConfig::new()
            .with_program("python -m behave")
            .with_format("json")
            .with_dry_run(true)
            .with_extra_arg("--no-capture");
        let inv = invocation_for(&find(ActionScope::Feature, ActionKind::Run), "/ws", &cfg);
        assert_eq!(inv.program, "python -m behave");
        assert_eq!(
            inv.args,
            vec![
                "features/math.feature",
                "--format",
                "json",
                "--dry-run",
                "--no-capture"
            ]
        );
    }

    #[test]
    fn default_format_not_passed() {
        let cfg = RunnerConfig::new().with_format("pretty");
        let inv = invocation_for(&find(ActionScope::Feature, ActionKind::Run), "/ws", &cfg);
        assert_eq!(inv.args, vec!["features/math.feature"]);
    }

    #[test]
    fn command_line_quotes_when_needed() {
        let inv = invocation_for(
            &find(ActionScope::Outline, ActionKind::Run),
            "/ws",
            &RunnerConfig::default(),
        );
        assert_eq!(
            inv.command_line(),
            r#"behave features/math.feature --name "^Add \\(simple\\)""#
        );
    }

    #[test]
    fn parallel_plan_batches() {
        let files: Vec<String> = (0..10).map(|i| format!("/ws/f{i}.feature")).collect();
        let plan = plan_parallel(&files, "/ws", &RunnerConfig::default());
        let sizes: Vec<usize> = plan.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(plan[2][1].args, vec!["f9.feature"]);
    }

    #[test]
    fn parallel_plan_zero_width_is_sequential() {
        let mut cfg = RunnerConfig::default();
        cfg.max_parallel = 0;
        let files = vec!["a.feature".to_string(), "b.feature".to_string()];
        assert_eq!(plan_parallel(&files, "", &cfg).len(), 2);
    }
}

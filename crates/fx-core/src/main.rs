use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use fx_core::{ExplorerConfig, FeatureExplorer};
use fx_organize::{StrategyKind, TestNode};
use fx_status::NodeReport;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("fx")
        .version(fx_core::VERSION)
        .about("Feature file explorer: discover, organize and reconcile BDD scenarios")
        .subcommand_required(true)
        .arg(
            Arg::new("root")
                .long("root")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Workspace root (defaults to the current directory)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Config file (defaults to <root>/fx.toml when present)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Output as JSON"),
        )
        .subcommand(
            Command::new("list")
                .about("List scenarios grouped by an organization strategy")
                .arg(
                    Arg::new("strategy")
                        .long("strategy")
                        .value_parser(value_parser!(StrategyKind))
                        .help("feature, tag, file, type or flat"),
                ),
        )
        .subcommand(
            Command::new("actions")
                .about("Show run/debug actions and runner command lines for a feature file")
                .arg(Arg::new("file").required(true).help("Feature file")),
        )
        .subcommand(
            Command::new("status")
                .about("Map execution results onto the scenario tree")
                .arg(
                    Arg::new("results")
                        .long("results")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON object of composite key -> passed|failed"),
                )
                .arg(
                    Arg::new("strategy")
                        .long("strategy")
                        .value_parser(value_parser!(StrategyKind))
                        .help("feature, tag, file, type or flat"),
                ),
        )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    let json = matches.get_flag("json");
    let mut explorer = FeatureExplorer::new(config);

    match matches.subcommand() {
        Some(("list", args)) => {
            apply_strategy(&mut explorer, args);
            explorer.refresh(false);
            let tree = explorer.hierarchy();
            if json {
                println!("{}", serde_json::to_string_pretty(&tree)?);
            } else {
                let strategy = explorer.strategy();
                println!("Strategy: {} ({})", strategy.label(), strategy.description());
                for node in &tree {
                    print_node(node, 0);
                }
            }
        }
        Some(("actions", args)) => {
            let file = args
                .get_one::<String>("file")
                .context("missing feature file")?;
            let path = if fx_model::paths::is_absolute(file) {
                PathBuf::from(file)
            } else {
                explorer.config().workspace_root.join(file)
            };
            let invocations = explorer.invocations_for(&path.to_string_lossy());
            if invocations.is_empty() {
                anyhow::bail!("{file} is not a readable feature file");
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&invocations)?);
            } else {
                for (action, invocation) in &invocations {
                    let target = action
                        .name
                        .as_deref()
                        .or(action.tag.as_deref())
                        .unwrap_or_default();
                    let debug = if invocation.debug { " [debug]" } else { "" };
                    println!(
                        "{:<16} {:<40} {}{}",
                        action.title(),
                        target,
                        invocation.command_line(),
                        debug
                    );
                }
            }
        }
        Some(("status", args)) => {
            apply_strategy(&mut explorer, args);
            let path = args
                .get_one::<PathBuf>("results")
                .context("missing results file")?;
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            let raw: HashMap<String, String> = serde_json::from_str(&text)
                .with_context(|| format!("{} is not a JSON object of strings", path.display()))?;
            let (results, errors) = fx_status::parse_results(raw);
            if !errors.is_empty() {
                tracing::warn!("{} results ignored", errors.len());
            }

            explorer.refresh(false);
            let reports = explorer.apply_results(&results);
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    print_report(report, 0);
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn load_config(matches: &ArgMatches) -> Result<ExplorerConfig> {
    let root = matches.get_one::<PathBuf>("root").cloned();
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ExplorerConfig::load(path)?,
        None => {
            let dir = match &root {
                Some(root) => root.clone(),
                None => std::env::current_dir().context("cannot determine current directory")?,
            };
            ExplorerConfig::discover(&dir)?
        }
    };
    if let Some(root) = root {
        config.workspace_root = root;
    }
    Ok(config)
}

fn apply_strategy(explorer: &mut FeatureExplorer, args: &ArgMatches) {
    if let Some(kind) = args.get_one::<StrategyKind>("strategy") {
        explorer.set_strategy(*kind);
    }
}

fn print_node(node: &TestNode, depth: usize) {
    let indent = "  ".repeat(depth);
    match node.line {
        Some(line) if node.is_leaf() => println!("{indent}{} (line {line})", node.label),
        _ => println!("{indent}{} [{}]", node.label, node.id),
    }
    for child in &node.children {
        print_node(child, depth + 1);
    }
}

fn print_report(report: &NodeReport, depth: usize) {
    let indent = "  ".repeat(depth);
    let status = format!("{:?}", report.status).to_uppercase();
    println!("{indent}{status:<8} {}", report.label);
    for child in &report.children {
        print_report(child, depth + 1);
    }
}

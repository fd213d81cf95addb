//! TaskPanel CLI - run tasks across a panel of LLM workers.

mod roster;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use taskpanel_coordinator::{
    CoordinatorConfig, JsonFileSink, PresetCatalog, ResultSink, StdoutSink, TaskPanel,
};
use taskpanel_core::{CombinedResult, TaskCatalog, WorkerOutcome};

use crate::roster::load_roster;

/// TaskPanel CLI - fan a task out to several workers and review the results
#[derive(Parser)]
#[command(name = "taskpanel")]
#[command(about = "Run tasks across a panel of LLM workers", long_about = None)]
struct Cli {
    /// Worker roster (JSON array of {name, provider, model, role?, ...})
    #[arg(short, long, global = true)]
    workers: Option<PathBuf>,

    /// Per-round timeout in seconds (default: wait for every worker)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Extra presets (JSON object of name -> {instructions, review_instructions})
    #[arg(long, global = true)]
    presets: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a custom task
    Run {
        /// Input JSON file (array of records)
        #[arg(short, long)]
        input: PathBuf,

        /// Instructions for the task-workers
        #[arg(long)]
        instructions: String,

        /// Instructions for the reviewers (omit to skip the review round)
        #[arg(short, long, default_value = "")]
        review: String,

        /// Write the result to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a preset task
    Preset {
        /// Preset name
        name: String,

        /// Input JSON file (array of records)
        #[arg(short, long)]
        input: PathBuf,

        /// Write the result to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List workers in the roster
    #[command(name = "list-workers")]
    ListWorkers,

    /// List available presets
    #[command(name = "list-presets")]
    ListPresets,

    /// List supported provider kinds
    #[command(name = "list-providers")]
    ListProviders,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let panel = build_panel(&cli).await?;

    match cli.command {
        Commands::Run {
            input,
            instructions,
            review,
            output,
        } => {
            let input = read_input(&input)?;
            let result = panel.execute_task(input, &instructions, &review).await?;
            emit(&result, output.as_deref())?;
        }
        Commands::Preset {
            name,
            input,
            output,
        } => {
            let input = read_input(&input)?;
            let result = panel.execute_preset_task(&name, input).await?;
            emit(&result, output.as_deref())?;
        }
        Commands::ListWorkers => {
            let workers = panel.list_workers().await;
            println!("Workers ({}):", workers.len());
            println!("{:<20}  {:<8}  {:<12}  {}", "NAME", "ROLE", "PROVIDER", "MODEL");
            println!("{}", "-".repeat(72));
            for worker in workers {
                println!(
                    "{:<20}  {:<8}  {:<12}  {}",
                    worker.name,
                    worker.role.as_str(),
                    worker.provider,
                    worker.model
                );
            }
        }
        Commands::ListPresets => {
            for name in panel.catalog().names() {
                println!("{name}");
            }
        }
        Commands::ListProviders => {
            for kind in panel.factory().kinds() {
                let key = if kind.requires_api_key() { "api key" } else { "" };
                println!("{:<12}  {}", kind.as_str(), key);
            }
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for results.
fn init_logging(verbose: bool) {
    let default = if verbose { "taskpanel=debug" } else { "taskpanel=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn build_panel(cli: &Cli) -> Result<TaskPanel, Box<dyn std::error::Error>> {
    let mut config = CoordinatorConfig::default();
    if let Some(secs) = cli.timeout_secs {
        config = config.with_round_timeout(Duration::from_secs(secs));
    }

    let mut catalog = PresetCatalog::builtin();
    if let Some(path) = &cli.presets {
        catalog = catalog.load_file(path)?;
    }

    let panel = TaskPanel::new()
        .with_config(config)
        .with_catalog(Arc::new(catalog));

    if let Some(path) = &cli.workers {
        for entry in load_roster(path)? {
            panel
                .add_worker(
                    &entry.name,
                    &entry.provider,
                    &entry.model,
                    entry.role,
                    &entry.backend_config(),
                )
                .await?;
        }
        info!(workers = panel.list_workers().await.len(), "Roster loaded");
    }

    Ok(panel)
}

fn read_input(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read input {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&text)?)
}

fn emit(result: &CombinedResult, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if result.task_outcomes.is_empty() {
        warn!("No task-workers registered; pass --workers to load a roster");
    }

    match output {
        Some(path) => {
            JsonFileSink::new(path).write(result)?;
            print_summary(result);
        }
        None => StdoutSink.write(result)?,
    }
    Ok(())
}

fn print_summary(result: &CombinedResult) {
    println!("Execution {}:", result.execution_id);
    if let Some(preset) = &result.preset {
        println!("  Preset:    {}", preset);
    }
    println!("  Records:   {}", result.input.len());
    print_round("Task", &result.task_outcomes);
    if result.was_reviewed() {
        print_round("Review", &result.review_outcomes);
    }
    println!(
        "  Result:    {} succeeded, {} failed",
        result.succeeded(),
        result.failed()
    );
}

fn print_round(label: &str, outcomes: &[WorkerOutcome]) {
    println!("  {} round:", label);
    for outcome in outcomes {
        let detail = outcome.error.as_deref().unwrap_or("");
        println!(
            "    {:<20}  {:<7}  {:>6} ms  {}",
            outcome.worker.name,
            outcome.status.as_str(),
            outcome.elapsed_ms,
            detail
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use taskpanel_core::ProviderKind;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from([
            "taskpanel",
            "--workers",
            "roster.json",
            "run",
            "--input",
            "in.json",
            "--instructions",
            "Summarize",
            "--review",
            "Check",
            "--timeout-secs",
            "30",
        ]);

        assert_eq!(cli.workers.as_deref(), Some(Path::new("roster.json")));
        assert_eq!(cli.timeout_secs, Some(30));
        match cli.command {
            Commands::Run { instructions, review, output, .. } => {
                assert_eq!(instructions, "Summarize");
                assert_eq!(review, "Check");
                assert!(output.is_none());
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_preset() {
        let cli = Cli::parse_from(["taskpanel", "preset", "code-review", "-i", "in.json", "-o", "out.json"]);
        match cli.command {
            Commands::Preset { name, output, .. } => {
                assert_eq!(name, "code-review");
                assert_eq!(output.as_deref(), Some(Path::new("out.json")));
            }
            _ => panic!("expected preset"),
        }
    }

    #[test]
    fn test_every_provider_listed() {
        assert_eq!(TaskPanel::new().factory().kinds().len(), ProviderKind::all().len());
    }
}

//! Tabook CLI
//!
//! Runs a batch of scheduling and attendance commands against the saved
//! state and reports the outcome of each.

mod request;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tabook_core::{CommandRunner, Config, JsonStore, Model, NoPersistence, Persistence, SystemClock};
use tracing_subscriber::EnvFilter;

use crate::request::parse_entry;

/// Tabook - consultation scheduling and tutorial attendance
///
/// Reads a JSON array of command requests and executes them in order
/// against the saved state, saving after every successful change.
#[derive(Parser, Debug)]
#[command(name = "tabook")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the JSON command batch
    #[arg(value_name = "BATCH")]
    batch: PathBuf,

    /// Path to configuration file (default: tabook.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// State snapshot to load and save (overrides dataFile from the config)
    #[arg(short, long, value_name = "FILE")]
    state: Option<String>,

    /// Execute without writing the state back
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(config = ?args.config, state = ?args.state, "Starting tabook");

    match run(&args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            tracing::warn!(failed, "Some commands were rejected");
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

/// Loads everything and runs the batch. Returns the number of rejected commands.
fn run(args: &Args) -> anyhow::Result<usize> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(ref state) = args.state {
        config.data_file.clone_from(state);
    }
    config.validate()?;

    let store = JsonStore::new(&config.data_file);
    tracing::info!(path = %store.path().display(), "Loading state");
    let model = store.load(&config)?;

    let entries = load_batch(&args.batch)?;
    tracing::info!(commands = entries.len(), "Loaded command batch");

    let (failed, model) = if args.dry_run {
        println!("Dry run: state will not be saved");
        let mut runner = CommandRunner::new(model, SystemClock, NoPersistence);
        let failed = run_batch(&mut runner, entries);
        (failed, runner.into_model())
    } else {
        let mut runner = CommandRunner::new(model, SystemClock, store);
        let failed = run_batch(&mut runner, entries);
        (failed, runner.into_model())
    };

    println!();
    print_summary(&model, failed);
    Ok(failed)
}

/// Loads configuration from the specified path or default location.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

/// Reads the JSON command batch as raw entries, decoded one by one later.
fn load_batch(path: &Path) -> anyhow::Result<Vec<serde_json::Value>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read command batch '{}': {e}",
            path.display()
        )
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        anyhow::anyhow!(
            "Invalid command batch '{}': {e}\n\nSuggestion: The batch must be a JSON array of objects with a \"command\" field",
            path.display()
        )
    })
}

/// Runs each request in order, printing its feedback. Returns the number of failures.
fn run_batch<P: Persistence>(
    runner: &mut CommandRunner<SystemClock, P>,
    entries: Vec<serde_json::Value>,
) -> usize {
    let mut failed = 0;
    for (index, entry) in entries.into_iter().enumerate() {
        let number = index + 1;
        let command = match parse_entry(entry) {
            Ok(command) => command,
            Err(e) => {
                println!("[{number}] Error: {e}");
                failed += 1;
                continue;
            }
        };

        match runner.run(&command) {
            Ok(result) => {
                println!("[{number}] {}", result.feedback());
                if result.refresh_person_list {
                    tracing::debug!(command = command.name(), "Person list refresh requested");
                }
            }
            Err(e) => {
                println!("[{number}] Error: {e}");
                failed += 1;
            }
        }
    }
    failed
}

/// Prints the final state summary.
fn print_summary(model: &Model, failed: usize) {
    println!("=== Tabook Summary ===");
    println!("Students: {}", model.persons().count());
    println!("Tutorials: {}", model.tutorials().len());
    println!("Consultations: {}", model.consultations().len());
    if failed > 0 {
        println!("Rejected commands: {failed}");
    }
}

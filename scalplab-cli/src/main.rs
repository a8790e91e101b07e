//! ScalpLab CLI — parse one message or replay a whole backlog.
//!
//! Commands:
//! - `parse` — run the engine on one message file, print the result as JSON
//! - `replay` — feed a JSONL backlog through the engine into the setup store,
//!   print a commit report, optionally journal and export CSV artifacts

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use scalplab_core::{Engine, RawMessage};
use scalplab_runner::{
    replay_messages, write_levels_csv, write_setups_csv, DuplicatePolicy, ReplayReport,
    RunnerConfig, SetupStore,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "scalplab",
    about = "ScalpLab CLI — trade setup extraction engine"
)]
struct Cli {
    /// Path to a runner TOML config. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine on one message and print the EngineResult as JSON.
    Parse {
        /// Path to a JSON message file ({"message_id", "channel_id",
        /// "author_id", "content", "timestamp"}).
        message: PathBuf,

        /// Pretty-print the JSON output.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Replay a backlog (one JSON message per line) into the setup store.
    Replay {
        /// Path to a JSONL backlog file.
        backlog: PathBuf,

        /// Duplicate policy: skip, replace, allow. Overrides the config file.
        #[arg(long)]
        policy: Option<String>,

        /// JSONL commit journal path. Overrides the config file.
        #[arg(long)]
        journal: Option<PathBuf>,

        /// Write committed setups to this CSV file.
        #[arg(long)]
        export_setups: Option<PathBuf>,

        /// Write normalized level rows to this CSV file.
        #[arg(long)]
        export_levels: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let runner_config = match &cli.config {
        Some(path) => RunnerConfig::from_toml_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => RunnerConfig::default(),
    };

    match cli.command {
        Commands::Parse { message, pretty } => run_parse(runner_config, &message, pretty),
        Commands::Replay {
            backlog,
            policy,
            journal,
            export_setups,
            export_levels,
        } => run_replay(
            runner_config,
            &backlog,
            policy,
            journal,
            export_setups,
            export_levels,
        ),
    }
}

fn run_parse(config: RunnerConfig, path: &PathBuf, pretty: bool) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading message file {}", path.display()))?;
    let message: RawMessage =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

    let engine = Engine::new(config.engine);
    let result = engine.process(&message);

    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

fn run_replay(
    config: RunnerConfig,
    backlog: &PathBuf,
    policy: Option<String>,
    journal: Option<PathBuf>,
    export_setups: Option<PathBuf>,
    export_levels: Option<PathBuf>,
) -> Result<()> {
    let policy = match policy.as_deref() {
        Some("skip") => DuplicatePolicy::Skip,
        Some("replace") => DuplicatePolicy::Replace,
        Some("allow") => DuplicatePolicy::Allow,
        Some(other) => bail!("unknown policy '{other}'. Valid: skip, replace, allow"),
        None => config.policy,
    };
    let journal = journal.or(config.journal);

    let messages = read_backlog(backlog)?;

    let engine = Engine::new(config.engine);
    let store = match &journal {
        Some(path) => SetupStore::new(policy).with_journal(path),
        None => SetupStore::new(policy),
    };

    let report = replay_messages(&messages, &engine, &store)?;
    print_report(&report, store.len());

    let committed = store.all_active();
    if let Some(path) = export_setups {
        write_setups_csv(&path, &committed)?;
        println!("Setups CSV: {}", path.display());
    }
    if let Some(path) = export_levels {
        write_levels_csv(&path, &committed)?;
        println!("Levels CSV: {}", path.display());
    }

    Ok(())
}

fn read_backlog(path: &PathBuf) -> Result<Vec<RawMessage>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading backlog file {}", path.display()))?;

    let mut messages = Vec::new();
    for (i, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let message: RawMessage = serde_json::from_str(line)
            .with_context(|| format!("parsing backlog line {}", i + 1))?;
        messages.push(message);
    }
    Ok(messages)
}

fn print_report(report: &ReplayReport, batches: usize) {
    println!();
    println!("=== Replay Report ===");
    println!("Processed:    {}", report.processed);
    println!("Parsed:       {}", report.parsed);
    println!("Failed:       {}", report.failed);
    println!("Line errors:  {}", report.line_errors);
    println!();
    println!("--- Commits ---");
    println!("Established:  {}", report.established);
    println!("Replaced:     {}", report.replaced);
    println!("Discarded:    {}", report.discarded);
    println!("Retained:     {}", report.retained);
    println!("Batches held: {batches}");
    println!();
}

//! slugtree command line
//!
//! Resolves hierarchical URL paths for a JSON snapshot of content entries,
//! without a running content store.
//!
//! Usage:
//!   slugtree resolve --entries snapshot.json [--config slugtree.toml] [--write]
//!   slugtree check --entries snapshot.json

use anyhow::Result;
use clap::{Parser, Subcommand};
use slugtree_cli::{Snapshot, load_config};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "slugtree", version)]
#[command(about = "Hierarchical URL paths for content entries")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recompute slug, full path and path metadata of every managed entry
    Resolve {
        #[command(flatten)]
        input: Input,

        /// Write the updated snapshot back to the entries file
        #[arg(long)]
        write: bool,

        /// Write the updated snapshot to this file instead
        #[arg(short, long, conflicts_with = "write")]
        output: Option<PathBuf>,

        /// Print run reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report full paths held by more than one managed entry
    Check {
        #[command(flatten)]
        input: Input,

        /// Print conflicts as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
struct Input {
    /// JSON array of raw entries
    #[arg(short, long)]
    entries: PathBuf,

    /// Engine configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Managed content type, repeatable. Replaces the configured set.
    #[arg(short = 't', long = "content-type")]
    content_types: Vec<String>,
}

impl Input {
    fn open(&self) -> Result<Snapshot> {
        let config = load_config(self.config.as_deref(), &self.content_types)?;
        Snapshot::load(&self.entries, config)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Resolve {
            input,
            write,
            output,
            json,
        } => {
            let output = if write {
                Some(input.entries.clone())
            } else {
                output
            };
            resolve(&input, output, json).await
        }
        Command::Check { input, json } => check(&input, json).await,
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

async fn resolve(input: &Input, output: Option<PathBuf>, json: bool) -> Result<ExitCode> {
    let snapshot = input.open()?;
    info!(
        "resolving {} ({} managed types)",
        input.entries.display(),
        snapshot.config().managed_content_type_ids.len()
    );
    let summary = snapshot.resolve().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for report in &summary.reports {
            let status = if report.is_noop() { "unchanged" } else { "updated" };
            println!("{:<48} {} ({status})", report.full_path, report.entry_id);
            if let Some(old) = &report.superseded {
                println!("    was {old}");
            }
            if let Some(other) = &report.conflict_with {
                println!("    ! also used by {other}");
            }
        }
        for failure in &summary.failures {
            println!("{}: {}", failure.entry_id, failure.message);
        }
    }

    if let Some(path) = output {
        snapshot.save(&path).await?;
    }

    Ok(if summary.failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn check(input: &Input, json: bool) -> Result<ExitCode> {
    let snapshot = input.open()?;
    let conflicts = snapshot.check().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conflicts)?);
    } else if conflicts.is_empty() {
        println!("no conflicting paths");
    } else {
        for conflict in &conflicts {
            let ids: Vec<_> = conflict.entries.iter().map(|id| id.as_str()).collect();
            println!("{}: {}", conflict.full_path, ids.join(", "));
        }
    }

    Ok(if conflicts.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

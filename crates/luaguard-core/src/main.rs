//! luaguard CLI
//!
//! Thin command-line surface over the safe-mutation pipeline, for agent
//! tooling and manual use:
//!
//! ```text
//! luaguard check game/init.luau
//! luaguard apply game/init.luau --content-file /tmp/proposed.luau
//! ```
//!
//! Rollback history lives in memory inside the process that owns the
//! orchestrator, so the multi-step history/rollback surface is a library
//! concern for long-lived hosts; `apply` here still snapshots and
//! auto-reverts within its own run.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use luaguard_core::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "luaguard", version, about = "safe-mutation pipeline for Luau/Lua scripts")]
struct Cli {
    /// Optional JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a file and scan it for anti-patterns
    Check {
        /// File to inspect
        file: PathBuf,
    },
    /// Write new content through the pipeline (snapshot, validate,
    /// auto-rollback on failure)
    Apply {
        /// Target file
        file: PathBuf,
        /// File holding the proposed content
        #[arg(long)]
        content_file: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> Result<GuardConfig> {
    match path {
        None => Ok(GuardConfig::default()),
        Some(p) => {
            let raw = std::fs::read_to_string(p)
                .with_context(|| format!("reading config {}", p.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing config {}", p.display()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Check { file } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let validation = Validator::new().check_balance(&content);
            let hits = Scanner::new().scan(&content);
            let report = ReportGenerator::new().generate(
                Some(&file.display().to_string()),
                &validation,
                &hits,
            );
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render());
            }
            if !validation.is_valid() {
                std::process::exit(1);
            }
        }
        Command::Apply { file, content_file } => {
            let proposed = tokio::fs::read_to_string(&content_file)
                .await
                .with_context(|| format!("reading {}", content_file.display()))?;
            let orchestrator = Orchestrator::new(config, Arc::new(TokioFileAccess));
            let outcome = orchestrator.apply(&file, &proposed).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else if outcome.success {
                println!("committed {}", file.display());
            } else if outcome.rollback_performed {
                println!("rejected {} (previous content restored)", file.display());
                if let Some(validation) = &outcome.validation {
                    for error in &validation.errors {
                        println!("  {error}");
                    }
                }
            } else if let Some(error) = &outcome.error {
                eprintln!("{error}");
            }
            if !outcome.success {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

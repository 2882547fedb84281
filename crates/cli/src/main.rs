//! # notify
//!
//! Command-line entry point.
//!
//! Provides:
//! - Configuration loading and validation
//! - stdin -> batcher -> delivery workers pipeline
//! - Graceful shutdown on SIGINT/SIGTERM

mod cli;
mod commands;
mod pipeline;

use std::future::Future;

use anyhow::{Context, Result};
use clap::Parser;
use observability::ObservabilityConfig;
use tokio::runtime::{Builder, Runtime};
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_notify, run_validate};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    block_on_detached(runtime, execute(&cli))
}

async fn execute(cli: &Cli) -> Result<()> {
    observability::init_with_config(observability_config(cli))?;

    info!(version = env!("CARGO_PKG_VERSION"), "notify starting");

    let result = match &cli.command {
        Commands::Run(args) => run_notify(args).await,
        Commands::Validate(args) => run_validate(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Drive `future` to completion, then shut the runtime down without joining
/// blocking tasks.
///
/// A blocked stdin read cannot be interrupted; joining it would keep the
/// process alive after an interrupted run until the next line or EOF.
fn block_on_detached<F: Future>(runtime: Runtime, future: F) -> F::Output {
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    output
}

/// Map global flags onto the tracing setup
fn observability_config(cli: &Cli) -> ObservabilityConfig {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: match &cli.command {
            Commands::Run(args) => args.metrics_port.filter(|port| *port != 0),
            Commands::Validate(_) => None,
        },
        default_log_level: default_log_level.to_string(),
        force_level: cli.quiet,
    }
}

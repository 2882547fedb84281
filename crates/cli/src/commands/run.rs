//! `run` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::NotifyConfig;
use tokio::io::BufReader;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, Shutdown};

/// Execute the `run` command
pub async fn run_notify(args: &RunArgs) -> Result<()> {
    let config = resolve_config(args)?;

    info!(
        url = %config.url,
        workers = config.num_workers,
        interval_ms = config.send_interval_ms,
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print!("{}", ConfigLoader::to_toml(&config.with_defaults())?);
        return Ok(());
    }

    let shutdown = Shutdown::default();
    tokio::spawn(watch_signals(shutdown.clone()));

    let input = BufReader::new(tokio::io::stdin());
    let stats = Pipeline::new(config)
        .run(input, shutdown)
        .await
        .context("Pipeline execution failed")?;

    info!(
        delivered = stats.shutdown.delivered,
        failed = stats.shutdown.failed,
        cancelled = stats.shutdown.cancelled,
        duration_secs = stats.duration.as_secs_f64(),
        "notify finished"
    );
    stats.print_summary();

    Ok(())
}

/// Merge the optional config file with command-line overrides
fn resolve_config(args: &RunArgs) -> Result<NotifyConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!(config = %path.display(), "Loading configuration");
            ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => NotifyConfig::new(""),
    };

    if let Some(url) = &args.url {
        config.url = url.clone();
    }
    if let Some(secs) = args.interval {
        config.send_interval_ms = secs.saturating_mul(1000);
    }
    if let Some(workers) = args.workers {
        config.num_workers = workers;
    }

    config_loader::validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// First SIGINT/SIGTERM stops reading input and lets queued deliveries finish;
/// a second one abandons them too.
async fn watch_signals(shutdown: Shutdown) {
    wait_for_signal().await;
    warn!("Received shutdown signal, finishing queued deliveries (signal again to abort)");
    shutdown.ingest.cancel();

    wait_for_signal().await;
    warn!("Received second shutdown signal, abandoning queued deliveries");
    shutdown.dispatch.cancel();
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn wait_for_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

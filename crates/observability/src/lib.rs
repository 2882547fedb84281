//! # Observability
//!
//! Tracing setup and Prometheus metrics for the notify pipeline.
//!
//! ## Features
//!
//! - Tracing initialisation (JSON/Pretty/Compact)
//! - Prometheus exporter
//! - Delivery and batching recorders
//!
//! ## Usage
//!
//! ```ignore
//! observability::init_with_config(ObservabilityConfig::default())?;
//!
//! let started = std::time::Instant::now();
//! let outcome = transport.deliver(&message.body).await;
//! observability::record_delivery(outcome.is_ok(), started.elapsed());
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// Re-exports
pub use crate::metrics::{
    record_batch_flushed, record_delivery, record_errors_discarded, record_intake_depth,
    record_messages_cancelled, RunningStats, StatsSummary,
};

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log format
    pub log_format: LogFormat,
    /// Prometheus port (None = disabled)
    pub metrics_port: Option<u16>,
    /// Level used when `RUST_LOG` is unset
    pub default_log_level: String,
    /// Ignore `RUST_LOG` and use `default_log_level` as-is
    pub force_level: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            metrics_port: None,
            default_log_level: "info".to_string(),
            force_level: false,
        }
    }
}

/// Log format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logs
    #[default]
    Json,
    /// Human-readable
    Pretty,
    /// Compact single-line
    Compact,
}

/// Initialise with a custom configuration
///
/// Logs go to stderr so stdout stays free for command output.
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    // 1. Tracing
    let filter = if config.force_level {
        EnvFilter::new(&config.default_log_level)
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level))
    };

    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    // 2. Prometheus exporter (if enabled)
    if let Some(port) = config.metrics_port {
        init_metrics_only(port)?;
    }

    tracing::info!(
        log_format = ?config.log_format,
        metrics_port = ?config.metrics_port,
        "Observability initialized"
    );

    Ok(())
}

/// Install only the Prometheus exporter
///
/// For when tracing is already set up elsewhere.
pub fn init_metrics_only(port: u16) -> Result<()> {
    let builder = PrometheusBuilder::new();
    builder
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}

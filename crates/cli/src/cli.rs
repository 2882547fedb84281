//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// notify - batch stdin lines into HTTP POST notifications
#[derive(Parser, Debug)]
#[command(
    name = "notify",
    author,
    version,
    about = "Send each stdin line as an HTTP POST notification",
    long_about = "Reads lines from stdin and sends each non-empty line as the text/plain body \n\
                  of an HTTP POST to the target URL. Lines are collected for one interval \n\
                  and then handed to a pool of delivery workers."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "NOTIFY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "NOTIFY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read stdin and deliver every line to the target URL
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Target URL (required unless the config file sets `url`)
    #[arg(long, env = "NOTIFY_URL")]
    pub url: Option<String>,

    /// Batching interval in seconds [default: 5]
    #[arg(short, long, env = "NOTIFY_INTERVAL")]
    pub interval: Option<u64>,

    /// Number of delivery workers [default: 20]
    #[arg(short, long, env = "NOTIFY_WORKERS")]
    pub workers: Option<usize>,

    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, env = "NOTIFY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, env = "NOTIFY_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Print the resolved configuration and exit without reading stdin
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "notify.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

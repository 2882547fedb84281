//! `validate` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::NotifyConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    /// Configuration with defaults applied
    #[serde(skip_serializing_if = "Option::is_none")]
    resolved: Option<NotifyConfig>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            resolved: None,
        };
    }

    match ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                resolved: Some(config.with_defaults()),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            resolved: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &NotifyConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.url.starts_with("http://") {
        warnings.push("url uses plain http".to_string());
    }

    let resolved = config.clone().with_defaults();
    if resolved.send_interval_buffer_capacity > resolved.intake_queue_capacity {
        warnings.push(format!(
            "send_interval_buffer_capacity ({}) exceeds intake_queue_capacity ({}) - flushes will wait on workers",
            resolved.send_interval_buffer_capacity, resolved.intake_queue_capacity
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref config) = result.resolved {
            println!("\n  URL: {}", config.url);
            println!("  Workers: {}", config.num_workers);
            println!("  Interval: {} ms", config.send_interval_ms);
            println!(
                "  Queues: intake={}, errors={}, window={}",
                config.intake_queue_capacity,
                config.error_queue_capacity,
                config.send_interval_buffer_capacity
            );
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{AdapterKind, SimulatorBlueprint, SinkType, StrategyKind};
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
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    strategy: String,
    tick_ms: u64,
    adapter: String,
    sink_count: usize,
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
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: (!warnings.is_empty()).then_some(warnings),
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    strategy: blueprint.generator.strategy.as_str().to_string(),
                    tick_ms: blueprint.generator.tick_ms,
                    adapter: blueprint.exposure.adapter.as_str().to_string(),
                    sink_count: blueprint.exposure.sinks.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &SimulatorBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();
    let generator = &blueprint.generator;
    let exposure = &blueprint.exposure;

    if generator.strategy == StrategyKind::Oscillation && generator.mode_duration_ticks != 200 {
        warnings.push(
            "generator.mode_duration_ticks has no effect with the oscillation strategy".to_string(),
        );
    }

    // HTTP 模式下 sinks 不生效; 默认配置本身就带 file sink, 不告警
    if exposure.adapter == AdapterKind::File
        && !exposure.sinks.iter().any(|s| s.sink_type == SinkType::File)
    {
        warnings.push("file adapter without a file sink - no snapshot file".to_string());
    }

    if generator.tick_ms < 10 {
        warnings.push(format!(
            "generator.tick_ms = {} is very short - expect heavy log and disk traffic",
            generator.tick_ms
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Strategy: {}", summary.strategy);
            println!("  Tick: {} ms", summary.tick_ms);
            println!("  Adapter: {}", summary.adapter);
            println!("  Sinks: {}", summary.sink_count);
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

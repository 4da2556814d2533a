//! `run` command implementation.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{AdapterKind, SimulatorBlueprint, SinkConfig, SinkType};
use tracing::info;

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_simulator(args: &RunArgs) -> Result<()> {
    let blueprint = load_blueprint(args)?;
    let blueprint = apply_overrides(blueprint, args)?;

    info!(
        strategy = blueprint.generator.strategy.as_str(),
        tick_ms = blueprint.generator.tick_ms,
        adapter = blueprint.exposure.adapter.as_str(),
        bind = %blueprint.exposure.bind,
        sinks = blueprint.exposure.sinks.len(),
        "Configuration loaded"
    );

    let metrics_port = args
        .metrics_port
        .or(blueprint.observability.metrics_port)
        .filter(|port| *port != 0);

    let pipeline_config = PipelineConfig {
        blueprint,
        max_ticks: (args.max_ticks > 0).then_some(args.max_ticks),
        timeout: (args.timeout > 0).then(|| Duration::from_secs(args.timeout)),
        metrics_port,
    };
    let bounded = pipeline_config.max_ticks.is_some() || pipeline_config.timeout.is_some();

    info!("Starting simulator...");

    let stats = Pipeline::new(pipeline_config)
        .run(setup_shutdown_signal())
        .await
        .context("Simulator run failed")?;

    info!(
        ticks = stats.runner.ticks,
        frames_dropped = stats.runner.frames_dropped,
        duration_secs = stats.duration.as_secs_f64(),
        ticks_per_sec = format!("{:.2}", stats.ticks_per_second()),
        "Simulator finished"
    );

    if bounded {
        stats.print_summary();
    }

    Ok(())
}

/// Configuration file if given, defaults otherwise
fn load_blueprint(args: &RunArgs) -> Result<SimulatorBlueprint> {
    let Some(path) = &args.config else {
        info!("No configuration file given, using defaults");
        return Ok(SimulatorBlueprint::default());
    };

    info!(config = %path.display(), "Loading configuration");
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }

    ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Apply command-line overrides and re-validate
fn apply_overrides(
    mut blueprint: SimulatorBlueprint,
    args: &RunArgs,
) -> Result<SimulatorBlueprint, CliError> {
    if let Some(strategy) = args.strategy {
        info!(strategy = ?strategy, "Overriding strategy from CLI");
        blueprint.generator.strategy = strategy.into();
    }
    if let Some(adapter) = args.adapter {
        blueprint.exposure.adapter = adapter.into();
    }
    if let Some(ref bind) = args.bind {
        info!(bind = %bind, "Overriding bind address from CLI");
        blueprint.exposure.bind = bind.clone();
    }
    if let Some(ref output) = args.output {
        // An output path only makes sense for the file adapter
        if args.adapter.is_none() {
            blueprint.exposure.adapter = AdapterKind::File;
        }
        set_output_path(&mut blueprint, output.display().to_string());
    }
    if let Some(tick_ms) = args.tick_ms {
        blueprint.generator.tick_ms = tick_ms;
    }

    ConfigLoader::validate(&blueprint).map_err(CliError::InvalidOverride)?;
    Ok(blueprint)
}

fn set_output_path(blueprint: &mut SimulatorBlueprint, path: String) {
    let sinks = &mut blueprint.exposure.sinks;
    match sinks.iter_mut().find(|s| s.sink_type == SinkType::File) {
        Some(sink) => {
            sink.params.insert("path".to_string(), path);
        }
        None => sinks.push(SinkConfig {
            name: "signals_file".to_string(),
            sink_type: SinkType::File,
            queue_capacity: 16,
            params: HashMap::from([("path".to_string(), path)]),
        }),
    }
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
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

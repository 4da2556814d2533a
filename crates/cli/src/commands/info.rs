//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{BatteryReset, SimulatorBlueprint, StrategyKind};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Effective configuration for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    generator: GeneratorInfo,
    exposure: ExposureInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics_port: Option<u16>,
}

#[derive(Serialize)]
struct GeneratorInfo {
    strategy: String,
    tick_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode_duration_ticks: Option<u32>,
    battery_reset: BatteryReset,
}

#[derive(Serialize)]
struct ExposureInfo {
    adapter: String,
    bind: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sinks: Vec<SinkInfo>,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    sink_type: String,
    queue_capacity: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let info = build_config_info(&blueprint);
    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(blueprint: &SimulatorBlueprint) -> ConfigInfo {
    let generator = &blueprint.generator;
    let sinks = blueprint
        .exposure
        .sinks
        .iter()
        .map(|s| SinkInfo {
            name: s.name.clone(),
            sink_type: format!("{:?}", s.sink_type),
            queue_capacity: s.queue_capacity,
            path: s.params.get("path").cloned(),
        })
        .collect();

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        generator: GeneratorInfo {
            strategy: generator.strategy.as_str().to_string(),
            tick_ms: generator.tick_ms,
            mode_duration_ticks: (generator.strategy == StrategyKind::DriveMode)
                .then_some(generator.mode_duration_ticks),
            battery_reset: generator.effective_battery_reset(),
        },
        exposure: ExposureInfo {
            adapter: blueprint.exposure.adapter.as_str().to_string(),
            bind: blueprint.exposure.bind.clone(),
            sinks,
        },
        metrics_port: blueprint.observability.metrics_port,
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Vehicle Simulator Configuration                 ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let generator = &info.generator;
    println!("⚙️  Generator");
    println!("   ├─ Version: {}", info.version);
    println!("   ├─ Strategy: {}", generator.strategy);
    println!("   ├─ Tick: {} ms", generator.tick_ms);
    if let Some(ticks) = generator.mode_duration_ticks {
        println!("   ├─ Mode duration: {} ticks", ticks);
    }
    println!(
        "   └─ Battery reset: below {}% -> {}%",
        generator.battery_reset.threshold, generator.battery_reset.target
    );

    let exposure = &info.exposure;
    println!("\n📤 Exposure");
    println!("   ├─ Adapter: {}", exposure.adapter);
    println!("   └─ Bind: {}", exposure.bind);

    if !exposure.sinks.is_empty() {
        println!("\n📝 Sinks ({})", exposure.sinks.len());
        for (i, sink) in exposure.sinks.iter().enumerate() {
            let prefix = if i == exposure.sinks.len() - 1 { "└─" } else { "├─" };
            match &sink.path {
                Some(path) => println!("   {} {} ({}, {})", prefix, sink.name, sink.sink_type, path),
                None => println!("   {} {} ({})", prefix, sink.name, sink.sink_type),
            }
        }
    }

    match info.metrics_port {
        Some(port) => println!("\n📈 Metrics: port {}", port),
        None => println!("\n📈 Metrics: disabled"),
    }

    println!();
}

//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::{AdapterKind, StrategyKind};
use std::path::PathBuf;

/// Vehicle telemetry simulator
#[derive(Parser, Debug)]
#[command(
    name = "vehicle-sim",
    author,
    version,
    about = "Simulated vehicle telemetry over HTTP or a JSON file",
    long_about = "Generates speed, outside/cabin temperature and battery level on a fixed \n\
                  tick and exposes the latest snapshot via `GET /signals` or a JSON file \n\
                  rewritten every tick.\n\n\
                  Without a subcommand, runs with the default configuration."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "VEHICLE_SIM_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format (logs always go to stderr)
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "VEHICLE_SIM_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the simulator
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display the effective configuration
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); defaults apply when omitted
    #[arg(short, long, env = "VEHICLE_SIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the generation strategy
    #[arg(long, value_enum, env = "VEHICLE_SIM_STRATEGY")]
    pub strategy: Option<StrategyArg>,

    /// Override the exposure adapter
    #[arg(long, value_enum, env = "VEHICLE_SIM_ADAPTER")]
    pub adapter: Option<AdapterArg>,

    /// Override the HTTP listen address
    #[arg(long, env = "VEHICLE_SIM_BIND")]
    pub bind: Option<String>,

    /// Override the snapshot file path (file adapter)
    #[arg(short, long, env = "VEHICLE_SIM_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Override the tick period in milliseconds
    #[arg(long, env = "VEHICLE_SIM_TICK_MS")]
    pub tick_ms: Option<u64>,

    /// Stop after this many ticks (0 = unlimited)
    #[arg(long, default_value = "0", env = "VEHICLE_SIM_MAX_TICKS")]
    pub max_ticks: u64,

    /// Stop after this many seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "VEHICLE_SIM_TIMEOUT")]
    pub timeout: u64,

    /// Prometheus metrics port (0 = disabled); overrides the configuration
    #[arg(long, env = "VEHICLE_SIM_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "vehicle-sim.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "vehicle-sim.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Generation strategy as spelled on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyArg {
    /// Sawtooth speed, wrapping outside temperature
    Oscillation,
    /// Cycle through drive-mode target profiles
    DriveMode,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Oscillation => StrategyKind::Oscillation,
            StrategyArg::DriveMode => StrategyKind::DriveMode,
        }
    }
}

/// Exposure adapter as spelled on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdapterArg {
    /// `GET /signals`
    Http,
    /// Snapshot file plus console stream
    File,
}

impl From<AdapterArg> for AdapterKind {
    fn from(arg: AdapterArg) -> Self {
        match arg {
            AdapterArg::Http => AdapterKind::Http,
            AdapterArg::File => AdapterKind::File,
        }
    }
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
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

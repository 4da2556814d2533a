//! # Vehicle Simulator CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - 生成器 / HTTP / 文件输出的编排与生命周期管理
//! - 优雅关闭处理
//!
//! 日志写 stderr；stdout 只承载遥测 JSON 行与 "Switching to mode N"。

mod cli;
mod commands;
mod error;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands, RunArgs};
use commands::{run_info, run_simulator, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Vehicle simulator starting"
    );

    let result = match &cli.command {
        // Bare invocation: run with defaults, still honouring VEHICLE_SIM_* variables
        None => run_simulator(&RunArgs::parse_from(["vehicle-sim"])).await,
        Some(Commands::Run(args)) => run_simulator(args).await,
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Info(args)) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: None,
        default_log_level: default_log_level.to_string(),
    })
}

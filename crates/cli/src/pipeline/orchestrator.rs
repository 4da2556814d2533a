//! Pipeline orchestrator - wires generator, publisher and exposure adapter.
//!
//! The generator runs on a background task. The HTTP server (or, for the
//! file adapter, the wait for the session to end) runs on the calling task.
//! Everything stops when the first of these happens: the shutdown future
//! resolves, the timeout elapses, the generator reaches `max_ticks`, or the
//! server fails.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::{AdapterKind, SimulatorBlueprint};
use dispatcher::{create_dispatcher, MetricsSnapshot};
use generator::{build_strategy, TelemetryRunner};
use http_api::SignalsServer;
use publisher::SnapshotPublisher;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::PipelineStats;
use crate::error::CliError;

/// Frames buffered between the generator and the dispatcher
const FRAME_BUFFER: usize = 64;

/// How long sinks get to drain after the generator stops
const DISPATCHER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Validated blueprint, CLI overrides applied
    pub blueprint: SimulatorBlueprint,

    /// Maximum number of ticks (None = unlimited)
    pub max_ticks: Option<u64>,

    /// Session timeout (None = no timeout)
    pub timeout: Option<Duration>,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run one simulator session until it stops
    pub async fn run<S>(self, shutdown: S) -> Result<PipelineStats>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;
        let adapter = blueprint.exposure.adapter;

        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let bind_addr: Option<SocketAddr> = match adapter {
            AdapterKind::Http => Some(
                blueprint
                    .exposure
                    .bind
                    .parse()
                    .with_context(|| format!("Invalid bind address '{}'", blueprint.exposure.bind))?,
            ),
            AdapterKind::File => None,
        };

        // Generator
        let strategy = build_strategy(&blueprint.generator);
        let strategy_name = strategy.name();
        let publisher = Arc::new(SnapshotPublisher::new(strategy.snapshot()));
        let mut runner = TelemetryRunner::new(strategy, Arc::clone(&publisher));

        info!(
            strategy = strategy_name,
            tick_ms = blueprint.generator.tick_ms,
            adapter = adapter.as_str(),
            "Generator configured"
        );

        // Dispatcher (file adapter only)
        let mut dispatcher_task = None;
        if adapter == AdapterKind::File {
            let (frame_tx, frame_rx) = mpsc::channel(FRAME_BUFFER);
            let dispatcher = create_dispatcher(blueprint.exposure.sinks.clone(), frame_rx)
                .map_err(CliError::from)
                .context("Failed to create dispatcher")?;
            info!(sinks = dispatcher.sink_count(), "Dispatcher started");
            dispatcher_task = Some(dispatcher.spawn());
            runner = runner.with_frame_sink(frame_tx);
        }

        // Stop channel shared by every component
        let (stop_tx, stop_rx) = watch::channel(false);

        let period = Duration::from_millis(blueprint.generator.tick_ms);
        let runner_task = spawn_runner(runner, period, self.config.max_ticks, &stop_tx);
        let supervisor = spawn_supervisor(shutdown, self.config.timeout, &stop_tx);

        let exposure_result = match bind_addr {
            Some(addr) => SignalsServer::new(addr, Arc::clone(&publisher))
                .run_until(wait_stopped(stop_rx.clone()))
                .await
                .map_err(CliError::from),
            None => {
                wait_stopped(stop_rx.clone()).await;
                Ok(())
            }
        };

        // Whatever ended the session, stop everything else
        let _ = stop_tx.send(true);
        supervisor.abort();

        let runner_stats = runner_task
            .await
            .map_err(|e| CliError::task_failed("generator", e))?;

        let sink_metrics = match dispatcher_task {
            Some(task) => drain_dispatcher(task).await?,
            None => Vec::new(),
        };

        exposure_result.context("HTTP server failed")?;

        let stats = PipelineStats {
            strategy: strategy_name,
            adapter,
            runner: runner_stats,
            sink_metrics,
            duration: start_time.elapsed(),
        };

        info!(
            ticks = stats.runner.ticks,
            duration_secs = stats.duration.as_secs_f64(),
            last_sequence = publisher.sequence(),
            "Simulator shutdown complete"
        );

        Ok(stats)
    }
}

fn spawn_runner(
    runner: TelemetryRunner,
    period: Duration,
    max_ticks: Option<u64>,
    stop_tx: &watch::Sender<bool>,
) -> JoinHandle<generator::RunnerStats> {
    let stop_rx = stop_tx.subscribe();
    let stop_tx = stop_tx.clone();
    tokio::spawn(async move {
        let mut runner = runner;
        let stats = runner.run(period, stop_rx, max_ticks).await;
        // A bounded run ends the whole session
        let _ = stop_tx.send(true);
        stats
    })
}

fn spawn_supervisor<S>(
    shutdown: S,
    timeout: Option<Duration>,
    stop_tx: &watch::Sender<bool>,
) -> JoinHandle<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let stop_rx = stop_tx.subscribe();
    let stop_tx = stop_tx.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown => warn!("Received shutdown signal, stopping..."),
            _ = sleep_or_pending(timeout) => {
                warn!(timeout_secs = timeout.map(|t| t.as_secs()), "Run timed out");
            }
            _ = wait_stopped(stop_rx) => {}
        }
        let _ = stop_tx.send(true);
    })
}

async fn drain_dispatcher(
    task: JoinHandle<Vec<(String, MetricsSnapshot)>>,
) -> Result<Vec<(String, MetricsSnapshot)>> {
    match tokio::time::timeout(DISPATCHER_DRAIN_TIMEOUT, task).await {
        Ok(Ok(metrics)) => Ok(metrics),
        Ok(Err(e)) => Err(CliError::task_failed("dispatcher", e).into()),
        Err(_) => {
            warn!("Dispatcher did not drain in time");
            Ok(Vec::new())
        }
    }
}

async fn wait_stopped(mut stop_rx: watch::Receiver<bool>) {
    let _ = stop_rx.wait_for(|stopped| *stopped).await;
}

async fn sleep_or_pending(timeout: Option<Duration>) {
    match timeout {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

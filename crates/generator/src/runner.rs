//! TelemetryRunner - the periodic generation task
//!
//! Each tick: advance the strategy, publish the snapshot, record metrics,
//! then hand the frame to the dispatcher without waiting.

use std::sync::Arc;
use std::time::{Duration, Instant};

use contracts::TelemetryFrame;
use observability::{record_tick, TelemetryStatsAggregator};
use publisher::SnapshotPublisher;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::strategy::GeneratorStrategy;

/// Statistics from a runner session
#[derive(Debug, Clone, Default)]
pub struct RunnerStats {
    /// Ticks completed
    pub ticks: u64,

    /// Frames accepted by the dispatcher queue
    pub frames_forwarded: u64,

    /// Frames dropped because the queue was full or closed
    pub frames_dropped: u64,

    /// Wall-clock duration of `run`
    pub duration: Duration,

    /// Running statistics of the generated telemetry
    pub telemetry: TelemetryStatsAggregator,
}

impl RunnerStats {
    pub fn ticks_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.ticks as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Drives a strategy and publishes every tick
pub struct TelemetryRunner {
    strategy: Box<dyn GeneratorStrategy>,
    publisher: Arc<SnapshotPublisher>,
    frame_tx: Option<mpsc::Sender<TelemetryFrame>>,
    tick: u64,
    stats: RunnerStats,
}

impl TelemetryRunner {
    pub fn new(strategy: Box<dyn GeneratorStrategy>, publisher: Arc<SnapshotPublisher>) -> Self {
        Self {
            strategy,
            publisher,
            frame_tx: None,
            tick: 0,
            stats: RunnerStats::default(),
        }
    }

    /// Forward every frame to the dispatcher
    pub fn with_frame_sink(mut self, frame_tx: mpsc::Sender<TelemetryFrame>) -> Self {
        self.frame_tx = Some(frame_tx);
        self
    }

    pub fn publisher(&self) -> &Arc<SnapshotPublisher> {
        &self.publisher
    }

    /// Number of ticks completed so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn stats(&self) -> &RunnerStats {
        &self.stats
    }

    /// Run exactly one tick
    pub fn step(&mut self) -> TelemetryFrame {
        self.tick += 1;
        let frame = self.strategy.advance().into_frame(self.tick);

        let sequence = self.publisher.publish(frame.snapshot);

        record_tick(&frame);
        self.stats.ticks += 1;
        self.stats.telemetry.update(&frame);

        if frame.mode_switched {
            if let Some(mode) = frame.mode {
                info!(tick = frame.tick, mode = mode.as_str(), "Switching to mode {}", mode.index());
            }
        }
        if frame.battery_reset {
            debug!(tick = frame.tick, "battery recharged");
        }
        debug!(
            tick = frame.tick,
            sequence,
            strategy = self.strategy.name(),
            snapshot = %frame.snapshot,
            "tick"
        );

        self.forward(frame);
        frame
    }

    fn forward(&mut self, frame: TelemetryFrame) {
        let Some(tx) = &self.frame_tx else {
            return;
        };

        match tx.try_send(frame) {
            Ok(()) => self.stats.frames_forwarded += 1,
            Err(TrySendError::Full(_)) => {
                self.stats.frames_dropped += 1;
                warn!(tick = frame.tick, "Dispatcher queue full, frame dropped");
            }
            Err(TrySendError::Closed(_)) => {
                self.stats.frames_dropped += 1;
                warn!(tick = frame.tick, "Dispatcher channel closed, no longer forwarding");
                self.frame_tx = None;
            }
        }
    }

    /// Tick every `period` until `shutdown` turns true (or its sender is
    /// dropped) or `max_ticks` ticks have run in this call.
    pub async fn run(
        &mut self,
        period: Duration,
        mut shutdown: watch::Receiver<bool>,
        max_ticks: Option<u64>,
    ) -> RunnerStats {
        let start = Instant::now();
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            strategy = self.strategy.name(),
            period_ms = period.as_millis() as u64,
            max_ticks = ?max_ticks,
            "Telemetry generator started"
        );

        let mut ticks_this_run = 0u64;
        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                _ = interval.tick() => {}
            }

            self.step();
            ticks_this_run += 1;

            if let Some(max) = max_ticks {
                if ticks_this_run >= max {
                    info!(ticks = ticks_this_run, "Reached max ticks limit");
                    break;
                }
            }
        }

        self.stats.duration += start.elapsed();
        info!(
            ticks = self.stats.ticks,
            dropped = self.stats.frames_dropped,
            "Telemetry generator stopped"
        );
        self.stats.clone()
    }

    /// Move the runner onto a background task
    pub fn spawn(self, period: Duration, max_ticks: Option<u64>) -> RunnerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut runner = self;
            runner.run(period, shutdown_rx, max_ticks).await
        });
        RunnerHandle { shutdown_tx, task }
    }
}

/// Handle to a spawned runner
pub struct RunnerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<RunnerStats>,
}

impl RunnerHandle {
    /// Ask the runner to stop after the current tick
    pub fn stop(&self) {
        // Receiver already gone means the runner has finished
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the runner to finish on its own
    pub async fn join(self) -> Result<RunnerStats, JoinError> {
        self.task.await
    }

    /// Stop and wait
    pub async fn shutdown(self) -> Result<RunnerStats, JoinError> {
        self.stop();
        self.join().await
    }
}

//! Session statistics.

use std::time::Duration;

use contracts::AdapterKind;
use dispatcher::MetricsSnapshot;
use generator::RunnerStats;

/// Statistics from one simulator session
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Strategy that drove the session
    pub strategy: &'static str,

    /// Exposure adapter in use
    pub adapter: AdapterKind,

    /// Generator statistics (ticks, forwarded/dropped frames, telemetry)
    pub runner: RunnerStats,

    /// Per-sink delivery counters (file adapter only)
    pub sink_metrics: Vec<(String, MetricsSnapshot)>,

    /// Total duration of the session
    pub duration: Duration,
}

impl PipelineStats {
    pub fn ticks_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.runner.ticks as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    ///
    /// Goes to stderr: stdout may be carrying the console sink's JSON lines.
    pub fn print_summary(&self) {
        eprintln!("\n=== Session Statistics ===\n");
        eprintln!("Strategy: {}", self.strategy);
        eprintln!("Adapter: {}", self.adapter.as_str());
        eprintln!("Duration: {:.2}s", self.duration.as_secs_f64());
        eprintln!("Ticks: {} ({:.2}/s)", self.runner.ticks, self.ticks_per_second());

        if self.adapter == AdapterKind::File {
            eprintln!(
                "Frames forwarded: {}, dropped: {}",
                self.runner.frames_forwarded, self.runner.frames_dropped
            );
            for (name, metrics) in &self.sink_metrics {
                eprintln!("  {}: {}", name, metrics);
            }
        }

        eprintln!();
        eprint!("{}", self.runner.telemetry.summary());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_per_second() {
        let stats = PipelineStats {
            strategy: "oscillation",
            adapter: AdapterKind::Http,
            runner: RunnerStats {
                ticks: 20,
                ..Default::default()
            },
            sink_metrics: Vec::new(),
            duration: Duration::from_secs(10),
        };
        assert_eq!(stats.ticks_per_second(), 2.0);

        let empty = PipelineStats {
            duration: Duration::ZERO,
            ..stats
        };
        assert_eq!(empty.ticks_per_second(), 0.0);
    }
}

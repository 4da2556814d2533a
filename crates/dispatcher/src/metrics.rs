//! Per-sink delivery counters

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters for a single sink, shared between its handle and worker
#[derive(Debug, Default)]
pub struct SinkMetrics {
    queue_len: AtomicUsize,
    write_count: AtomicU64,
    failure_count: AtomicU64,
    dropped_count: AtomicU64,
    /// Tick of the most recent successful write (0 = none yet)
    last_tick: AtomicU64,
}

impl SinkMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::Relaxed)
    }

    /// Record a successful write of `tick`
    pub fn record_write(&self, tick: u64) {
        self.write_count.fetch_add(1, Ordering::Relaxed);
        self.last_tick.fetch_max(tick, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    pub fn inc_dropped_count(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn last_tick(&self) -> u64 {
        self.last_tick.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queue_len: self.queue_len(),
            write_count: self.write_count(),
            failure_count: self.failure_count(),
            dropped_count: self.dropped_count(),
            last_tick: self.last_tick(),
        }
    }
}

/// Snapshot of sink metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub queue_len: usize,
    pub write_count: u64,
    pub failure_count: u64,
    pub dropped_count: u64,
    pub last_tick: u64,
}

impl MetricsSnapshot {
    /// Frames offered to the sink, whatever their fate
    pub fn offered(&self) -> u64 {
        self.write_count + self.failure_count + self.dropped_count
    }

    /// Percentage of offered frames that were written
    pub fn delivery_rate(&self) -> f64 {
        let offered = self.offered();
        if offered == 0 {
            0.0
        } else {
            self.write_count as f64 / offered as f64 * 100.0
        }
    }
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "written={} failed={} dropped={} last_tick={} ({:.1}% delivered)",
            self.write_count,
            self.failure_count,
            self.dropped_count,
            self.last_tick,
            self.delivery_rate()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_write_tracks_latest_tick() {
        let metrics = SinkMetrics::new();
        metrics.record_write(3);
        metrics.record_write(2);

        assert_eq!(metrics.write_count(), 2);
        assert_eq!(metrics.last_tick(), 3);
    }

    #[test]
    fn test_snapshot_rates() {
        let metrics = SinkMetrics::new();
        for tick in 1..=3 {
            metrics.record_write(tick);
        }
        metrics.inc_failure_count();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.offered(), 4);
        assert!((snapshot.delivery_rate() - 75.0).abs() < 1e-9);
        assert!(snapshot.to_string().contains("written=3 failed=1 dropped=0"));
    }

    #[test]
    fn test_empty_delivery_rate() {
        assert_eq!(MetricsSnapshot::default().delivery_rate(), 0.0);
    }
}

//! 遥测指标收集模块
//!
//! 基于 TelemetryFrame 收集和统计生成器的运行指标。

use std::collections::HashMap;

use contracts::{DriverTip, TelemetryFrame};
use metrics::{counter, gauge};

/// 从 TelemetryFrame 记录指标
///
/// 生成器每完成一个节拍调用一次。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_tick;
///
/// let frame = outcome.into_frame(tick);
/// record_tick(&frame);
/// ```
pub fn record_tick(frame: &TelemetryFrame) {
    let snapshot = &frame.snapshot;

    counter!("vehicle_sim_ticks_total").increment(1);

    gauge!("vehicle_sim_speed_kmh").set(snapshot.speed_kmh);
    gauge!("vehicle_sim_outside_temp_c").set(snapshot.outside_temp_c);
    gauge!("vehicle_sim_cabin_temp_c").set(snapshot.cabin_temp_c);
    gauge!("vehicle_sim_battery_level_percent").set(snapshot.battery_level_percent);

    if frame.mode_switched {
        let mode = frame.mode.map(|m| m.as_str()).unwrap_or("none");
        counter!("vehicle_sim_mode_switches_total", "mode" => mode).increment(1);
    }

    if frame.battery_reset {
        counter!("vehicle_sim_battery_resets_total").increment(1);
    }

    gauge!("vehicle_sim_driver_tip").set(DriverTip::classify(snapshot).label() as f64);
}

/// 记录一次 `GET /signals` 请求
pub fn record_signals_request() {
    counter!("vehicle_sim_signals_requests_total").increment(1);
}

/// 记录帧分发结果
pub fn record_frame_dispatched(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "vehicle_sim_frames_dispatched_total",
        "sink" => sink_name.to_string(),
        "status" => status
    )
    .increment(1);
}

/// 遥测指标聚合器
///
/// 在内存中聚合指标，便于在有界运行结束时输出摘要。
#[derive(Debug, Clone, Default)]
pub struct TelemetryStatsAggregator {
    /// 总节拍数
    pub total_ticks: u64,

    /// 电池重置次数
    pub battery_resets: u64,

    /// 模式切换次数
    pub mode_switches: u64,

    /// 车速统计
    pub speed_stats: RunningStats,

    /// 座舱温度统计
    pub cabin_stats: RunningStats,

    /// 电量统计
    pub battery_stats: RunningStats,

    /// 各类驾驶提示出现次数
    pub tip_counts: HashMap<DriverTip, u64>,
}

impl TelemetryStatsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, frame: &TelemetryFrame) {
        let snapshot = &frame.snapshot;

        self.total_ticks += 1;
        if frame.battery_reset {
            self.battery_resets += 1;
        }
        if frame.mode_switched {
            self.mode_switches += 1;
        }

        self.speed_stats.push(snapshot.speed_kmh);
        self.cabin_stats.push(snapshot.cabin_temp_c);
        self.battery_stats.push(snapshot.battery_level_percent);

        *self
            .tip_counts
            .entry(DriverTip::classify(snapshot))
            .or_insert(0) += 1;
    }

    /// 生成摘要报告
    pub fn summary(&self) -> TelemetrySummary {
        TelemetrySummary {
            total_ticks: self.total_ticks,
            battery_resets: self.battery_resets,
            mode_switches: self.mode_switches,
            speed_kmh: StatsSummary::from(&self.speed_stats),
            cabin_temp_c: StatsSummary::from(&self.cabin_stats),
            battery_level_percent: StatsSummary::from(&self.battery_stats),
            tip_counts: self.tip_counts.clone(),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct TelemetrySummary {
    pub total_ticks: u64,
    pub battery_resets: u64,
    pub mode_switches: u64,
    pub speed_kmh: StatsSummary,
    pub cabin_temp_c: StatsSummary,
    pub battery_level_percent: StatsSummary,
    pub tip_counts: HashMap<DriverTip, u64>,
}

impl std::fmt::Display for TelemetrySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Telemetry Summary ===")?;
        writeln!(f, "Total ticks: {}", self.total_ticks)?;
        writeln!(f, "Battery resets: {}", self.battery_resets)?;
        writeln!(f, "Mode switches: {}", self.mode_switches)?;
        writeln!(f, "Speed (km/h): {}", self.speed_kmh)?;
        writeln!(f, "Cabin temp (°C): {}", self.cabin_temp_c)?;
        writeln!(f, "Battery (%): {}", self.battery_level_percent)?;

        if !self.tip_counts.is_empty() {
            writeln!(f, "Driver tips:")?;
            let mut tips: Vec<_> = self.tip_counts.iter().collect();
            tips.sort_by_key(|(tip, _)| tip.label());
            for (tip, count) in tips {
                writeln!(f, "  {}: {}", tip.as_str(), count)?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.2}, max={:.2}, mean={:.2}, std={:.2} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{DriveMode, VehicleSnapshot};

    fn frame(tick: u64, speed: f64, cabin: f64, battery: f64) -> TelemetryFrame {
        TelemetryFrame::from_snapshot(tick, VehicleSnapshot::new(speed, 30.0, cabin, battery))
    }

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            stats.push(v);
        }

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_update() {
        let mut aggregator = TelemetryStatsAggregator::new();

        aggregator.update(&frame(1, 50.0, 24.0, 90.0));
        aggregator.update(&frame(2, 130.0, 24.0, 80.0));
        aggregator.update(&TelemetryFrame {
            mode: Some(DriveMode::Comfort),
            mode_switched: true,
            battery_reset: true,
            ..frame(3, 60.0, 35.0, 100.0)
        });

        assert_eq!(aggregator.total_ticks, 3);
        assert_eq!(aggregator.battery_resets, 1);
        assert_eq!(aggregator.mode_switches, 1);
        assert_eq!(aggregator.speed_stats.max(), 130.0);
        assert_eq!(aggregator.tip_counts.get(&DriverTip::Normal), Some(&1));
        assert_eq!(aggregator.tip_counts.get(&DriverTip::Safety), Some(&1));
        assert_eq!(aggregator.tip_counts.get(&DriverTip::Comfort), Some(&1));

        aggregator.reset();
        assert_eq!(aggregator.total_ticks, 0);
    }

    #[test]
    fn test_summary_display() {
        let mut aggregator = TelemetryStatsAggregator::new();
        aggregator.update(&frame(1, 5.0, 27.2, 99.95));
        aggregator.update(&frame(2, 10.0, 27.4, 15.0));

        let output = format!("{}", aggregator.summary());
        assert!(output.contains("Total ticks: 2"));
        assert!(output.contains("min=5.00, max=10.00"));
        assert!(output.contains("normal: 1"));
        assert!(output.contains("energy_tip: 1"));
    }

    #[test]
    fn test_empty_stats_display() {
        assert_eq!(StatsSummary::default().to_string(), "N/A");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_tick(&frame(1, 5.0, 27.2, 99.95));
        record_signals_request();
        record_frame_dispatched("console", true);
    }
}

//! SimulatorBlueprint - Config Loader 输出
//!
//! 描述完整的模拟器配置：生成策略、节拍、电池重置、暴露方式、输出路由。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的模拟器配置蓝图
///
/// Every section is optional; an empty document yields the defaults
/// (oscillation strategy, 500 ms tick, HTTP on 0.0.0.0:8080).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SimulatorBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 遥测生成器设置
    #[serde(default)]
    #[validate(nested)]
    pub generator: GeneratorConfig,

    /// 快照暴露方式
    #[serde(default)]
    #[validate(nested)]
    pub exposure: ExposureConfig,

    /// 可观测性设置
    #[serde(default)]
    pub observability: ObservabilityOptions,
}

/// 生成策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Sawtooth speed, wrapping outside temperature
    #[default]
    Oscillation,
    /// Cycles through drive-mode target profiles
    DriveMode,
}

impl StrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Oscillation => "oscillation",
            Self::DriveMode => "drive_mode",
        }
    }
}

/// 生成器配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GeneratorConfig {
    /// 生成策略
    pub strategy: StrategyKind,

    /// 节拍周期 (毫秒)
    #[validate(range(min = 1, max = 60000))]
    pub tick_ms: u64,

    /// 每个驾驶模式持续的节拍数 (仅 drive_mode)
    #[validate(range(min = 1))]
    pub mode_duration_ticks: u32,

    /// 低电量重置 (缺省时按策略取默认值)
    #[validate(nested)]
    pub battery_reset: Option<BatteryReset>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            tick_ms: 500,
            mode_duration_ticks: 200,
            battery_reset: None,
        }
    }
}

impl GeneratorConfig {
    /// Configured reset pair, or the strategy's default
    pub fn effective_battery_reset(&self) -> BatteryReset {
        self.battery_reset
            .unwrap_or_else(|| BatteryReset::for_strategy(self.strategy))
    }
}

/// 低电量重置：电量低于 `threshold` 时直接回到 `target`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct BatteryReset {
    /// 触发阈值 (%)
    #[validate(range(min = 0.0, max = 100.0))]
    pub threshold: f64,

    /// 重置目标 (%)
    #[validate(range(min = 0.0, max = 100.0))]
    pub target: f64,
}

impl BatteryReset {
    pub const OSCILLATION: Self = Self {
        threshold: 5.0,
        target: 100.0,
    };

    pub const DRIVE_MODE: Self = Self {
        threshold: 3.0,
        target: 100.0,
    };

    pub fn for_strategy(strategy: StrategyKind) -> Self {
        match strategy {
            StrategyKind::Oscillation => Self::OSCILLATION,
            StrategyKind::DriveMode => Self::DRIVE_MODE,
        }
    }

    /// Apply the reset rule to a battery level
    ///
    /// Returns the new level and whether a reset happened.
    pub fn apply(&self, level: f64) -> (f64, bool) {
        if level < self.threshold {
            (self.target, true)
        } else {
            (level, false)
        }
    }
}

/// 暴露方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    /// Polling HTTP endpoint `GET /signals`
    #[default]
    Http,
    /// Snapshot file rewritten every tick
    File,
}

impl AdapterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::File => "file",
        }
    }
}

/// 暴露配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ExposureConfig {
    /// 启用的适配器
    pub adapter: AdapterKind,

    /// HTTP 监听地址
    pub bind: String,

    /// 文件模式下的输出路由
    #[validate(nested)]
    pub sinks: Vec<SinkConfig>,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            adapter: AdapterKind::default(),
            bind: default_bind(),
            sinks: default_sinks(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_sinks() -> Vec<SinkConfig> {
    vec![
        SinkConfig {
            name: "signals_file".to_string(),
            sink_type: SinkType::File,
            queue_capacity: default_queue_capacity(),
            params: HashMap::from([("path".to_string(), "signals.json".to_string())]),
        },
        SinkConfig {
            name: "console".to_string(),
            sink_type: SinkType::Console,
            queue_capacity: default_queue_capacity(),
            params: HashMap::new(),
        },
    ]
}

/// Sink 配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SinkConfig {
    /// Sink 名称
    #[validate(length(min = 1))]
    pub name: String,

    /// Sink 类型
    pub sink_type: SinkType,

    /// 队列容量
    #[serde(default = "default_queue_capacity")]
    #[validate(range(min = 1))]
    pub queue_capacity: usize,

    /// Sink 特定参数
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_queue_capacity() -> usize {
    16
}

/// Sink 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Overwrites a JSON snapshot file
    File,
    /// JSON line per tick on stdout
    Console,
}

/// 可观测性配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityOptions {
    /// Prometheus 端口 (None = 禁用)
    pub metrics_port: Option<u16>,
}

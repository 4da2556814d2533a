//! # Generator
//!
//! Timer-driven telemetry generation.
//!
//! 负责：
//! - 两种生成策略 (oscillation / drive_mode)，共享 `move_toward` + clamp
//! - 每个节拍发布完整快照到 `SnapshotPublisher`
//! - 将 `TelemetryFrame` 推送给 dispatcher，不阻塞生成循环

pub mod drive_mode;
pub mod oscillation;
pub mod primitives;
pub mod runner;
pub mod strategy;

pub use drive_mode::{DriveModeGenerator, DriveModeState};
pub use oscillation::{OscillationGenerator, OscillationState};
pub use primitives::{clamp, move_toward, Bounds, Drain};
pub use runner::{RunnerHandle, RunnerStats, TelemetryRunner};
pub use strategy::{build_strategy, GeneratorStrategy, TickOutcome};

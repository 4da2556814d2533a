//! # Dispatcher
//!
//! 遥测帧分发模块（文件暴露适配器）。
//!
//! 负责：
//! - 消费生成器推送的 `TelemetryFrame`
//! - Fan-out 到多个 sinks（文件覆盖写 / 控制台 JSON 行）
//! - 隔离慢 sink 与失败 sink，不阻塞生成循环

pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod sinks;

pub use contracts::{SnapshotSink, TelemetryFrame};
pub use dispatcher::{create_dispatcher, Dispatcher, DispatcherBuilder, DispatcherConfig};
pub use error::DispatcherError;
pub use handle::SinkHandle;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{ConsoleSink, FileSink, FileSinkConfig};

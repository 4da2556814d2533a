//! FileSink - rewrites one JSON file with the latest snapshot

use contracts::{ContractError, SnapshotSink, TelemetryFrame};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, instrument};

/// Default output file, relative to the working directory
pub const DEFAULT_PATH: &str = "signals.json";

/// Configuration for FileSink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// File rewritten every frame
    pub path: PathBuf,
}

impl Default for FileSinkConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PATH),
        }
    }
}

impl FileSinkConfig {
    /// Create config from params map (`path`)
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let path = params
            .get("path")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PATH));

        Self { path }
    }
}

/// Sink that overwrites a file with the snapshot JSON every frame
///
/// The JSON is written to a sibling temp file and renamed over the target,
/// so a reader of the target sees either the previous or the new snapshot.
pub struct FileSink {
    name: String,
    config: FileSinkConfig,
    tmp_path: PathBuf,
}

impl FileSink {
    /// Create a new FileSink
    ///
    /// Nothing is touched on disk until the first write; a missing parent
    /// directory surfaces as a write failure.
    pub fn new(name: impl Into<String>, config: FileSinkConfig) -> Self {
        let tmp_path = tmp_path_for(&config.path);
        Self {
            name: name.into(),
            config,
            tmp_path,
        }
    }

    /// Create from params map (for factory)
    pub fn from_params(name: impl Into<String>, params: &HashMap<String, String>) -> Self {
        Self::new(name, FileSinkConfig::from_params(params))
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    fn replace_file(&self, content: &str) -> std::io::Result<()> {
        fs::write(&self.tmp_path, content)?;
        fs::rename(&self.tmp_path, &self.config.path)
    }

    fn persist_frame(&self, frame: &TelemetryFrame) -> Result<(), ContractError> {
        let json = frame.snapshot.to_json()?;
        self.replace_file(&json).map_err(|e| {
            error!(
                sink = %self.name,
                path = %self.config.path.display(),
                tick = frame.tick,
                error = %e,
                "cannot write signals file"
            );
            ContractError::sink_write(&self.name, format!("{}: {e}", self.config.path.display()))
        })
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl SnapshotSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_sink_write",
        skip(self, frame),
        fields(sink = %self.name, tick = frame.tick)
    )]
    async fn write(&mut self, frame: &TelemetryFrame) -> Result<(), ContractError> {
        self.persist_frame(frame)
    }

    #[instrument(name = "file_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    #[instrument(name = "file_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        if self.tmp_path.exists() {
            let _ = fs::remove_file(&self.tmp_path);
        }
        debug!(sink = %self.name, path = %self.config.path.display(), "FileSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::VehicleSnapshot;
    use tempfile::tempdir;

    fn frame(tick: u64, speed: f64) -> TelemetryFrame {
        TelemetryFrame::from_snapshot(tick, VehicleSnapshot::new(speed, 30.1, 27.2, 99.95))
    }

    #[test]
    fn test_config_from_params() {
        let params = HashMap::from([("path".to_string(), "out/s.json".to_string())]);
        assert_eq!(FileSinkConfig::from_params(&params).path, PathBuf::from("out/s.json"));

        let blank = HashMap::from([("path".to_string(), "  ".to_string())]);
        assert_eq!(FileSinkConfig::from_params(&blank).path, PathBuf::from(DEFAULT_PATH));
        assert_eq!(FileSinkConfig::from_params(&HashMap::new()).path, PathBuf::from(DEFAULT_PATH));
    }

    #[test]
    fn test_tmp_path_is_sibling() {
        assert_eq!(
            tmp_path_for(Path::new("/data/signals.json")),
            PathBuf::from("/data/signals.json.tmp")
        );
    }

    #[tokio::test]
    async fn test_file_sink_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("signals.json");
        let mut sink = FileSink::new("file", FileSinkConfig { path: path.clone() });

        sink.write(&frame(1, 5.0)).await.unwrap();
        sink.write(&frame(2, 10.0)).await.unwrap();
        sink.close().await.unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let snapshot = VehicleSnapshot::from_json(&content).unwrap();
        assert_eq!(snapshot.speed_kmh, 10.0);
        // Single object, nothing appended
        assert_eq!(content.lines().count(), 1);
        assert!(!sink.tmp_path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_file_sink_reports_unwritable_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("signals.json");
        let mut sink = FileSink::new("file", FileSinkConfig { path });

        let err = sink.write(&frame(1, 5.0)).await.unwrap_err();
        assert!(matches!(err, ContractError::SinkWrite { .. }));

        // The sink stays usable once the directory appears
        fs::create_dir(dir.path().join("missing")).unwrap();
        sink.write(&frame(2, 10.0)).await.unwrap();
    }
}

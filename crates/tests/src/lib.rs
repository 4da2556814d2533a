//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试 (JSON 形状、配置文件)
//! - e2e: generator -> publisher -> HTTP `/signals`
//! - e2e: generator -> dispatcher -> file / console sink

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{DriverTip, SimulatorBlueprint, StrategyKind, VehicleSnapshot};

    #[test]
    fn test_snapshot_json_shape() {
        let json = VehicleSnapshot::new(85.0, 28.4, 22.1, 76.3).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "battery_level_percent",
                "cabin_temp_c",
                "outside_temp_c",
                "speed_kmh"
            ]
        );
        assert!(object.values().all(|v| v.is_f64()));
    }

    #[test]
    fn test_default_blueprint_round_trips_through_toml() {
        let toml = ConfigLoader::to_toml(&SimulatorBlueprint::default()).unwrap();
        let parsed = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();

        assert_eq!(parsed.generator.strategy, StrategyKind::Oscillation);
        assert_eq!(parsed.generator.tick_ms, 500);
        assert_eq!(parsed.exposure.bind, "0.0.0.0:8080");
        assert_eq!(parsed.exposure.sinks.len(), 2);
    }

    #[test]
    fn test_driver_tip_precedence() {
        // Low battery and high speed at once: safety wins
        let snapshot = VehicleSnapshot::new(130.0, 25.0, 24.0, 5.0);
        assert_eq!(DriverTip::classify(&snapshot), DriverTip::Safety);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{
        AdapterKind, BatteryReset, DriveMode, SinkConfig, SinkType, SnapshotSink, TelemetryFrame,
        VehicleSnapshot,
    };
    use dispatcher::{create_dispatcher, ConsoleSink, Dispatcher, SinkHandle};
    use generator::{build_strategy, DriveModeGenerator, TelemetryRunner};
    use http_api::SignalsServer;
    use publisher::SnapshotPublisher;
    use tokio::sync::mpsc;

    /// JSON round trips may differ in the last bit
    fn assert_snapshot_eq(a: VehicleSnapshot, b: VehicleSnapshot) {
        let pairs = [
            (a.speed_kmh, b.speed_kmh),
            (a.outside_temp_c, b.outside_temp_c),
            (a.cabin_temp_c, b.cabin_temp_c),
            (a.battery_level_percent, b.battery_level_percent),
        ];
        for (x, y) in pairs {
            assert!((x - y).abs() < 1e-9, "{a:?} != {b:?}");
        }
    }

    fn runner_for(strategy: Box<dyn generator::GeneratorStrategy>) -> TelemetryRunner {
        let publisher = Arc::new(SnapshotPublisher::new(strategy.snapshot()));
        TelemetryRunner::new(strategy, publisher)
    }

    async fn fetch_signals(client: &reqwest::Client, url: &str) -> serde_json::Value {
        client
            .get(url)
            .send()
            .await
            .unwrap()
            .json::<serde_json::Value>()
            .await
            .unwrap()
    }

    /// End-to-end: oscillation runner -> publisher -> `GET /signals`
    #[tokio::test]
    async fn test_e2e_http_pipeline() {
        let blueprint = ConfigLoader::load_from_str(
            "[generator]\nstrategy = \"oscillation\"\ntick_ms = 1\n",
            ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(blueprint.exposure.adapter, AdapterKind::Http);

        let runner = runner_for(build_strategy(&blueprint.generator));
        let publisher = Arc::clone(runner.publisher());

        let server = SignalsServer::new("127.0.0.1:0".parse().unwrap(), Arc::clone(&publisher))
            .spawn()
            .await
            .unwrap();
        let url = format!("http://{}/signals", server.local_addr());
        let client = reqwest::Client::new();

        // Initial state is served before any tick
        let initial = fetch_signals(&client, &url).await;
        assert_eq!(initial["speed_kmh"], 0.0);
        assert_eq!(initial["battery_level_percent"], 100.0);

        let generator = runner.spawn(Duration::from_millis(1), None);
        tokio::time::timeout(Duration::from_secs(5), async {
            while publisher.sequence() < 10 {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .expect("generator did not tick");

        let body = fetch_signals(&client, &url).await;
        let served: VehicleSnapshot = serde_json::from_value(body).unwrap();
        assert!(served.within_hard_limits());
        assert!(served.speed_kmh > 0.0);

        let stats = generator.shutdown().await.unwrap();
        assert!(stats.ticks >= 10);
        // After stopping, the endpoint serves the final snapshot
        let last: VehicleSnapshot =
            serde_json::from_value(fetch_signals(&client, &url).await).unwrap();
        assert_snapshot_eq(last, publisher.read());

        server.shutdown().await.unwrap();
    }

    /// Concurrent HTTP readers never see a value outside the hard limits
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_readers_during_generation() {
        let runner = runner_for(Box::new(DriveModeGenerator::new(5, BatteryReset::DRIVE_MODE)));
        let publisher = Arc::clone(runner.publisher());
        let server = SignalsServer::new("127.0.0.1:0".parse().unwrap(), publisher)
            .spawn()
            .await
            .unwrap();
        let url = format!("http://{}/signals", server.local_addr());

        let generator = runner.spawn(Duration::from_millis(1), None);

        let mut readers = Vec::new();
        for _ in 0..4 {
            let url = url.clone();
            readers.push(tokio::spawn(async move {
                let client = reqwest::Client::new();
                for _ in 0..50 {
                    let snapshot: VehicleSnapshot =
                        serde_json::from_value(fetch_signals(&client, &url).await).unwrap();
                    assert!(snapshot.within_hard_limits(), "{snapshot:?}");
                }
            }));
        }
        for reader in readers {
            reader.await.unwrap();
        }

        generator.shutdown().await.unwrap();
        server.shutdown().await.unwrap();
    }

    /// End-to-end: drive-mode runner -> dispatcher -> file sink
    #[tokio::test]
    async fn test_e2e_file_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals.json");

        let (frame_tx, frame_rx) = mpsc::channel(64);
        let sinks = vec![SinkConfig {
            name: "signals_file".to_string(),
            sink_type: SinkType::File,
            queue_capacity: 64,
            params: HashMap::from([("path".to_string(), path.display().to_string())]),
        }];
        let dispatcher = create_dispatcher(sinks, frame_rx).unwrap();
        let dispatcher_task = dispatcher.spawn();

        let runner = runner_for(Box::new(DriveModeGenerator::default())).with_frame_sink(frame_tx);
        let publisher = Arc::clone(runner.publisher());

        // The runner owns the only sender: finishing it closes the dispatcher input
        let stats = runner
            .spawn(Duration::from_millis(1), Some(30))
            .join()
            .await
            .unwrap();
        assert_eq!(stats.ticks, 30);
        assert_eq!(stats.frames_dropped, 0);
        let summary: observability::TelemetrySummary = stats.telemetry.summary();
        assert_eq!(summary.total_ticks, 30);
        assert_eq!(summary.mode_switches, 0);

        let metrics = tokio::time::timeout(Duration::from_secs(5), dispatcher_task)
            .await
            .unwrap()
            .unwrap();
        let (name, file_metrics) = &metrics[0];
        assert_eq!(name, "signals_file");
        assert_eq!(file_metrics.write_count, 30);
        assert_eq!(file_metrics.last_tick, 30);

        // One complete snapshot, the last one published
        let content = std::fs::read_to_string(&path).unwrap();
        let written = VehicleSnapshot::from_json(&content).unwrap();
        assert_snapshot_eq(written, publisher.read());
        assert_eq!(written.speed_kmh, 60.0);
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// "Switching to mode N" follows the switching tick's line and precedes the first mode-N line
    #[tokio::test]
    async fn test_console_stream_announces_mode_switch() {
        let buf = SharedBuf::default();
        let console = ConsoleSink::with_writer("console", Box::new(buf.clone()));
        let handle = SinkHandle::spawn(console, 16);

        let (frame_tx, frame_rx) = mpsc::channel(16);
        let dispatcher = Dispatcher::with_handles(vec![handle], frame_rx);
        let dispatcher_task = dispatcher.spawn();

        let strategy = DriveModeGenerator::new(3, BatteryReset::DRIVE_MODE);
        let mut runner = runner_for(Box::new(strategy)).with_frame_sink(frame_tx);
        let frames: Vec<TelemetryFrame> = (0..6).map(|_| runner.step()).collect();
        drop(runner);

        tokio::time::timeout(Duration::from_secs(5), dispatcher_task)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(frames[2].mode, Some(DriveMode::Comfort));
        assert_eq!(frames[5].mode, Some(DriveMode::Safety));

        let output = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[3], "Switching to mode 1");
        assert_eq!(lines[7], "Switching to mode 2");

        let switching: VehicleSnapshot = serde_json::from_str(lines[2]).unwrap();
        assert_snapshot_eq(switching, frames[2].snapshot);
        let first_comfort: VehicleSnapshot = serde_json::from_str(lines[4]).unwrap();
        assert_snapshot_eq(first_comfort, frames[3].snapshot);
    }

    /// A sink that fails every write does not stop the file sink
    #[tokio::test]
    async fn test_failing_sink_isolated() {
        struct Broken;

        impl SnapshotSink for Broken {
            fn name(&self) -> &str {
                "broken"
            }

            async fn write(&mut self, _frame: &TelemetryFrame) -> Result<(), contracts::ContractError> {
                Err(contracts::ContractError::sink_write("broken", "always fails"))
            }

            async fn flush(&mut self) -> Result<(), contracts::ContractError> {
                Ok(())
            }

            async fn close(&mut self) -> Result<(), contracts::ContractError> {
                Ok(())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");
        let file = dispatcher::FileSink::new(
            "file",
            dispatcher::FileSinkConfig {
                path: path.clone(),
            },
        );

        let (frame_tx, frame_rx) = mpsc::channel(16);
        let dispatcher = Dispatcher::with_handles(
            vec![SinkHandle::spawn(Broken, 16), SinkHandle::spawn(file, 16)],
            frame_rx,
        );
        let dispatcher_task = dispatcher.spawn();

        let mut runner = runner_for(build_strategy(&Default::default())).with_frame_sink(frame_tx);
        for _ in 0..5 {
            runner.step();
        }
        let last = runner.publisher().read();
        drop(runner);

        let metrics = dispatcher_task.await.unwrap();
        let by_name: HashMap<_, _> = metrics.into_iter().collect();
        assert_eq!(by_name["broken"].failure_count, 5);
        assert_eq!(by_name["file"].write_count, 5);

        let written = VehicleSnapshot::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_snapshot_eq(written, last);
    }
}

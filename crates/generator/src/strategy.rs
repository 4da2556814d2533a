//! GeneratorStrategy - one tick of physics, selected by configuration

use contracts::{DriveMode, GeneratorConfig, StrategyKind, TelemetryFrame, VehicleSnapshot};

use crate::drive_mode::DriveModeGenerator;
use crate::oscillation::OscillationGenerator;

/// Result of advancing a strategy by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub snapshot: VehicleSnapshot,
    /// Mode active after the tick (drive-mode strategy only)
    pub mode: Option<DriveMode>,
    pub mode_switched: bool,
    pub battery_reset: bool,
}

impl TickOutcome {
    pub fn into_frame(self, tick: u64) -> TelemetryFrame {
        TelemetryFrame {
            tick,
            snapshot: self.snapshot,
            mode: self.mode,
            mode_switched: self.mode_switched,
            battery_reset: self.battery_reset,
        }
    }
}

/// A telemetry state machine
///
/// Implementations never fail and never stop on their own: numeric edge
/// cases are handled by clamping and the battery reset rule.
pub trait GeneratorStrategy: Send {
    /// Strategy name (used for logging)
    fn name(&self) -> &'static str;

    /// Current state, before the next tick
    fn snapshot(&self) -> VehicleSnapshot;

    /// Current drive mode, if the strategy has one
    fn mode(&self) -> Option<DriveMode> {
        None
    }

    /// Advance by one tick
    fn advance(&mut self) -> TickOutcome;
}

/// Build the configured strategy from its initial state
pub fn build_strategy(config: &GeneratorConfig) -> Box<dyn GeneratorStrategy> {
    let battery_reset = config.effective_battery_reset();
    match config.strategy {
        StrategyKind::Oscillation => Box::new(OscillationGenerator::new(battery_reset)),
        StrategyKind::DriveMode => Box::new(DriveModeGenerator::new(
            config.mode_duration_ticks,
            battery_reset,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::BatteryReset;

    #[test]
    fn test_build_oscillation() {
        let strategy = build_strategy(&GeneratorConfig::default());
        assert_eq!(strategy.name(), "oscillation");
        assert_eq!(strategy.mode(), None);
        assert_eq!(
            strategy.snapshot(),
            VehicleSnapshot::new(0.0, 30.0, 27.0, 100.0)
        );
    }

    #[test]
    fn test_build_drive_mode() {
        let config = GeneratorConfig {
            strategy: StrategyKind::DriveMode,
            ..Default::default()
        };
        let strategy = build_strategy(&config);
        assert_eq!(strategy.name(), "drive_mode");
        assert_eq!(strategy.mode(), Some(DriveMode::Normal));
        assert_eq!(
            strategy.snapshot(),
            VehicleSnapshot::new(0.0, 25.0, 24.0, 100.0)
        );
    }

    #[test]
    fn test_configured_reset_is_used() {
        let config = GeneratorConfig {
            battery_reset: Some(BatteryReset {
                threshold: 99.99,
                target: 100.0,
            }),
            ..Default::default()
        };
        let mut strategy = build_strategy(&config);

        // First tick drains below 99.99 and resets straight away
        let outcome = strategy.advance();
        assert!(outcome.battery_reset);
        assert_eq!(outcome.snapshot.battery_level_percent, 100.0);
    }

    #[test]
    fn test_into_frame() {
        let outcome = TickOutcome {
            snapshot: VehicleSnapshot::new(5.0, 30.1, 27.2, 99.95),
            mode: Some(DriveMode::Comfort),
            mode_switched: true,
            battery_reset: false,
        };
        let frame = outcome.into_frame(42);
        assert_eq!(frame.tick, 42);
        assert_eq!(frame.mode, Some(DriveMode::Comfort));
        assert!(frame.mode_switched);
    }
}

//! Drive-mode strategy
//!
//! Each quantity moves toward the current mode's target at its own rate.
//! After `mode_duration` ticks the mode advances cyclically.

use contracts::{BatteryReset, DriveMode, VehicleSnapshot};

use crate::primitives::{move_toward, Bounds, Drain};
use crate::strategy::{GeneratorStrategy, TickOutcome};

const SPEED_STEP_KMH: f64 = 5.0;
const SPEED_BOUNDS: Bounds = Bounds::new(0.0, 160.0);

const OUTSIDE_STEP_C: f64 = 0.2;
const OUTSIDE_BOUNDS: Bounds = Bounds::new(-10.0, 45.0);

const CABIN_STEP_C: f64 = 0.3;
const CABIN_BOUNDS: Bounds = Bounds::new(15.0, 45.0);

const BATTERY_STEP: f64 = 0.5;
const BATTERY_BOUNDS: Bounds = Bounds::new(0.0, 100.0);
const DRAIN: Drain = Drain {
    moving: 0.02,
    idle: 0.005,
};

/// Full state of the drive-mode strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveModeState {
    pub snapshot: VehicleSnapshot,
    pub mode: DriveMode,
    /// Ticks spent in `mode` so far
    pub steps_in_mode: u32,
}

impl Default for DriveModeState {
    fn default() -> Self {
        Self {
            snapshot: VehicleSnapshot::new(0.0, 25.0, 24.0, 100.0),
            mode: DriveMode::Normal,
            steps_in_mode: 0,
        }
    }
}

/// Mode-profile telemetry generator
#[derive(Debug, Clone)]
pub struct DriveModeGenerator {
    state: DriveModeState,
    mode_duration: u32,
    battery_reset: BatteryReset,
}

impl DriveModeGenerator {
    pub const DEFAULT_MODE_DURATION: u32 = 200;

    pub fn new(mode_duration: u32, battery_reset: BatteryReset) -> Self {
        Self::with_state(DriveModeState::default(), mode_duration, battery_reset)
    }

    /// Start from an arbitrary state
    pub fn with_state(state: DriveModeState, mode_duration: u32, battery_reset: BatteryReset) -> Self {
        Self {
            state,
            mode_duration: mode_duration.max(1),
            battery_reset,
        }
    }

    pub fn state(&self) -> DriveModeState {
        self.state
    }

    pub fn mode_duration(&self) -> u32 {
        self.mode_duration
    }

    fn next_battery(&self, battery: f64, speed: f64, target: f64) -> (f64, bool) {
        let drained = battery - DRAIN.for_speed(speed);
        let moved = move_toward(drained, target, BATTERY_STEP);
        let (battery, reset) = self.battery_reset.apply(moved);
        (BATTERY_BOUNDS.apply(battery), reset)
    }

    /// Count the tick; returns true when the mode advanced
    fn count_step(&mut self) -> bool {
        self.state.steps_in_mode = self.state.steps_in_mode.saturating_add(1);
        if self.state.steps_in_mode >= self.mode_duration {
            self.state.mode = self.state.mode.next();
            self.state.steps_in_mode = 0;
            true
        } else {
            false
        }
    }
}

impl Default for DriveModeGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MODE_DURATION, BatteryReset::DRIVE_MODE)
    }
}

impl GeneratorStrategy for DriveModeGenerator {
    fn name(&self) -> &'static str {
        "drive_mode"
    }

    fn snapshot(&self) -> VehicleSnapshot {
        self.state.snapshot
    }

    fn mode(&self) -> Option<DriveMode> {
        Some(self.state.mode)
    }

    fn advance(&mut self) -> TickOutcome {
        let current = self.state.snapshot;
        let targets = self.state.mode.targets();

        let speed = SPEED_BOUNDS.apply(move_toward(
            current.speed_kmh,
            targets.speed_kmh,
            SPEED_STEP_KMH,
        ));
        let outside = OUTSIDE_BOUNDS.apply(move_toward(
            current.outside_temp_c,
            targets.outside_temp_c,
            OUTSIDE_STEP_C,
        ));
        let cabin = CABIN_BOUNDS.apply(move_toward(
            current.cabin_temp_c,
            targets.cabin_temp_c,
            CABIN_STEP_C,
        ));
        let (battery, battery_reset) = self.next_battery(
            current.battery_level_percent,
            speed,
            targets.battery_level_percent,
        );

        self.state.snapshot = VehicleSnapshot::new(speed, outside, cabin, battery);
        let mode_switched = self.count_step();

        TickOutcome {
            snapshot: self.state.snapshot,
            mode: Some(self.state.mode),
            mode_switched,
            battery_reset,
        }
    }
}

//! Oscillation strategy
//!
//! No drive modes: speed saws between the turn points, outside temperature
//! climbs and wraps, the cabin chases the outside temperature (faster when
//! heating than when cooling).

use contracts::{BatteryReset, VehicleSnapshot};

use crate::primitives::{move_toward, Bounds, Drain};
use crate::strategy::{GeneratorStrategy, TickOutcome};

const SPEED_STEP_KMH: f64 = 5.0;
/// Start decelerating once speed reaches this
const SPEED_UPPER_TURN_KMH: f64 = 120.0;
/// Start accelerating once speed falls to this
const SPEED_LOWER_TURN_KMH: f64 = 20.0;
const SPEED_BOUNDS: Bounds = Bounds::new(0.0, 140.0);

const OUTSIDE_STEP_C: f64 = 0.1;
/// Outside temperature climbs to `max` then wraps to `min`
const OUTSIDE_BOUNDS: Bounds = Bounds::new(25.0, 35.0);

const CABIN_HEAT_STEP_C: f64 = 0.2;
const CABIN_COOL_STEP_C: f64 = 0.1;
const CABIN_BOUNDS: Bounds = Bounds::new(18.0, 40.0);

const BATTERY_BOUNDS: Bounds = Bounds::new(0.0, 100.0);
const DRAIN: Drain = Drain {
    moving: 0.05,
    idle: 0.01,
};

/// Full state of the oscillation strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillationState {
    pub snapshot: VehicleSnapshot,
    pub accelerating: bool,
}

impl Default for OscillationState {
    fn default() -> Self {
        Self {
            snapshot: VehicleSnapshot::new(0.0, 30.0, 27.0, 100.0),
            accelerating: true,
        }
    }
}

/// Sawtooth telemetry generator
#[derive(Debug, Clone)]
pub struct OscillationGenerator {
    state: OscillationState,
    battery_reset: BatteryReset,
}

impl OscillationGenerator {
    pub fn new(battery_reset: BatteryReset) -> Self {
        Self::with_state(OscillationState::default(), battery_reset)
    }

    /// Start from an arbitrary state
    pub fn with_state(state: OscillationState, battery_reset: BatteryReset) -> Self {
        Self {
            state,
            battery_reset,
        }
    }

    pub fn state(&self) -> OscillationState {
        self.state
    }

    fn next_speed(&mut self, speed: f64) -> f64 {
        let target = if self.state.accelerating {
            SPEED_BOUNDS.max
        } else {
            SPEED_BOUNDS.min
        };
        let speed = move_toward(speed, target, SPEED_STEP_KMH);

        if self.state.accelerating && speed >= SPEED_UPPER_TURN_KMH {
            self.state.accelerating = false;
        } else if !self.state.accelerating && speed <= SPEED_LOWER_TURN_KMH {
            self.state.accelerating = true;
        }
        SPEED_BOUNDS.apply(speed)
    }

    fn next_outside(outside: f64) -> f64 {
        let outside = outside + OUTSIDE_STEP_C;
        if outside > OUTSIDE_BOUNDS.max {
            OUTSIDE_BOUNDS.min
        } else {
            OUTSIDE_BOUNDS.apply(outside)
        }
    }

    fn next_cabin(cabin: f64, outside: f64) -> f64 {
        let step = if cabin < outside {
            CABIN_HEAT_STEP_C
        } else {
            CABIN_COOL_STEP_C
        };
        CABIN_BOUNDS.apply(move_toward(cabin, outside, step))
    }
}

impl Default for OscillationGenerator {
    fn default() -> Self {
        Self::new(BatteryReset::OSCILLATION)
    }
}

impl GeneratorStrategy for OscillationGenerator {
    fn name(&self) -> &'static str {
        "oscillation"
    }

    fn snapshot(&self) -> VehicleSnapshot {
        self.state.snapshot
    }

    fn advance(&mut self) -> TickOutcome {
        let current = self.state.snapshot;

        let speed = self.next_speed(current.speed_kmh);
        let outside = Self::next_outside(current.outside_temp_c);
        let cabin = Self::next_cabin(current.cabin_temp_c, outside);

        let drained = current.battery_level_percent - DRAIN.for_speed(speed);
        let (battery, battery_reset) = self.battery_reset.apply(drained);
        let battery = BATTERY_BOUNDS.apply(battery);

        self.state.snapshot = VehicleSnapshot::new(speed, outside, cabin, battery);

        TickOutcome {
            snapshot: self.state.snapshot,
            mode: None,
            mode_switched: false,
            battery_reset,
        }
    }
}

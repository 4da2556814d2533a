//! TelemetryFrame - Generator -> Dispatcher message

use serde::{Deserialize, Serialize};

use crate::{DriveMode, VehicleSnapshot};

/// One completed tick, as pushed to the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    /// Tick number, starting at 1
    pub tick: u64,

    /// Snapshot published by this tick
    pub snapshot: VehicleSnapshot,

    /// Drive mode active after this tick (drive-mode strategy only)
    ///
    /// When `mode_switched` is set, the snapshot was still computed with the
    /// previous mode's targets; `mode` drives the next tick.
    pub mode: Option<DriveMode>,

    /// The tick ended by switching to `mode`
    pub mode_switched: bool,

    /// The battery fell below the reset threshold and was recharged
    pub battery_reset: bool,
}

impl TelemetryFrame {
    /// Frame carrying only a snapshot, no mode or reset events
    pub fn from_snapshot(tick: u64, snapshot: VehicleSnapshot) -> Self {
        Self {
            tick,
            snapshot,
            mode: None,
            mode_switched: false,
            battery_reset: false,
        }
    }
}

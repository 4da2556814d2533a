//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the simulator.
//! Business crates depend on this crate only, never on each other's internals.
//!
//! ## Time Model
//! - One tick is one generator update; `tick` counts from 1
//! - No wall-clock timestamps are carried, only the latest snapshot matters

mod blueprint;
mod drive_mode;
mod error;
mod frame;
mod sink;
mod snapshot;

pub use blueprint::*;
pub use drive_mode::{DriveMode, ModeTargets};
pub use error::*;
pub use frame::TelemetryFrame;
pub use sink::*;
pub use snapshot::{DriverTip, VehicleSnapshot};

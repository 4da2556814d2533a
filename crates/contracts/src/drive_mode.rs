//! DriveMode - named target profiles of the drive-mode generator

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target tuple a drive mode steers the vehicle toward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeTargets {
    pub speed_kmh: f64,
    pub outside_temp_c: f64,
    pub cabin_temp_c: f64,
    pub battery_level_percent: f64,
}

/// Drive mode, cycled Normal -> Comfort -> Safety -> Energy -> Normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveMode {
    /// Moderate speed, comfortable cabin, high battery
    #[default]
    Normal,
    /// Hot weather, hot cabin
    Comfort,
    /// High speed
    Safety,
    /// Draining battery
    Energy,
}

impl DriveMode {
    /// All modes in cycle order
    pub const ALL: [DriveMode; 4] = [Self::Normal, Self::Comfort, Self::Safety, Self::Energy];

    /// Position in the cycle (0..=3)
    pub fn index(self) -> usize {
        match self {
            Self::Normal => 0,
            Self::Comfort => 1,
            Self::Safety => 2,
            Self::Energy => 3,
        }
    }

    /// Mode at cycle position `index % 4`
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Next mode in cyclic order
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn targets(self) -> ModeTargets {
        match self {
            Self::Normal => ModeTargets {
                speed_kmh: 60.0,
                outside_temp_c: 25.0,
                cabin_temp_c: 24.0,
                battery_level_percent: 90.0,
            },
            Self::Comfort => ModeTargets {
                speed_kmh: 70.0,
                outside_temp_c: 33.0,
                cabin_temp_c: 34.0,
                battery_level_percent: 80.0,
            },
            Self::Safety => ModeTargets {
                speed_kmh: 140.0,
                outside_temp_c: 26.0,
                cabin_temp_c: 24.0,
                battery_level_percent: 70.0,
            },
            Self::Energy => ModeTargets {
                speed_kmh: 50.0,
                outside_temp_c: 25.0,
                cabin_temp_c: 24.0,
                battery_level_percent: 10.0,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Comfort => "comfort",
            Self::Safety => "safety",
            Self::Energy => "energy",
        }
    }
}

impl fmt::Display for DriveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

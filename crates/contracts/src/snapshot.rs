//! VehicleSnapshot - Generator output
//!
//! The complete, internally consistent set of telemetry fields at one tick.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ContractError;

/// Telemetry snapshot
///
/// Value type: readers always receive a copy, never a reference into the
/// publisher's live value. Field names are the wire names of `GET /signals`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    /// Vehicle speed (km/h), always >= 0
    pub speed_kmh: f64,

    /// Outside air temperature (°C)
    pub outside_temp_c: f64,

    /// Cabin air temperature (°C)
    pub cabin_temp_c: f64,

    /// State of charge (%), always in [0, 100]
    pub battery_level_percent: f64,
}

impl VehicleSnapshot {
    /// Create a snapshot from the four quantities
    pub fn new(
        speed_kmh: f64,
        outside_temp_c: f64,
        cabin_temp_c: f64,
        battery_level_percent: f64,
    ) -> Self {
        Self {
            speed_kmh,
            outside_temp_c,
            cabin_temp_c,
            battery_level_percent,
        }
    }

    /// True when no field is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.speed_kmh.is_finite()
            && self.outside_temp_c.is_finite()
            && self.cabin_temp_c.is_finite()
            && self.battery_level_percent.is_finite()
    }

    /// True when the hard limits hold: speed >= 0, battery in [0, 100]
    pub fn within_hard_limits(&self) -> bool {
        self.is_finite()
            && self.speed_kmh >= 0.0
            && (0.0..=100.0).contains(&self.battery_level_percent)
    }

    /// Serialize to the compact single-line JSON object
    pub fn to_json(&self) -> Result<String, ContractError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from the JSON object produced by [`VehicleSnapshot::to_json`]
    pub fn from_json(content: &str) -> Result<Self, ContractError> {
        Ok(serde_json::from_str(content)?)
    }
}

impl fmt::Display for VehicleSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "speed={:.1}km/h outside={:.1}°C cabin={:.1}°C battery={:.2}%",
            self.speed_kmh, self.outside_temp_c, self.cabin_temp_c, self.battery_level_percent
        )
    }
}

/// Advisory classification of a snapshot
///
/// Priority: safety > energy > comfort > normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverTip {
    /// Nothing to report
    Normal,
    /// Cabin too hot or too cold
    Comfort,
    /// Speed too high
    Safety,
    /// Battery low
    Energy,
}

impl DriverTip {
    /// Speed above which a safety tip is raised (km/h)
    pub const SAFETY_SPEED_KMH: f64 = 120.0;
    /// Battery below which an energy tip is raised (%)
    pub const ENERGY_BATTERY_PERCENT: f64 = 20.0;
    /// Comfortable cabin range (°C), inclusive
    pub const COMFORT_CABIN_C: (f64, f64) = (18.0, 30.0);

    /// Classify a snapshot
    pub fn classify(snapshot: &VehicleSnapshot) -> Self {
        let (cabin_min, cabin_max) = Self::COMFORT_CABIN_C;
        if snapshot.speed_kmh > Self::SAFETY_SPEED_KMH {
            Self::Safety
        } else if snapshot.battery_level_percent < Self::ENERGY_BATTERY_PERCENT {
            Self::Energy
        } else if snapshot.cabin_temp_c > cabin_max || snapshot.cabin_temp_c < cabin_min {
            Self::Comfort
        } else {
            Self::Normal
        }
    }

    /// Numeric class label (0 = normal, 1 = comfort, 2 = safety, 3 = energy)
    pub fn label(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Comfort => 1,
            Self::Safety => 2,
            Self::Energy => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Comfort => "comfort_tip",
            Self::Safety => "safety_tip",
            Self::Energy => "energy_tip",
        }
    }
}

impl fmt::Display for DriverTip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_names() {
        let snapshot = VehicleSnapshot::new(5.0, 30.1, 27.2, 99.95);
        let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 4);
        assert_eq!(object["speed_kmh"], 5.0);
        assert_eq!(object["outside_temp_c"], 30.1);
        assert_eq!(object["cabin_temp_c"], 27.2);
        assert_eq!(object["battery_level_percent"], 99.95);
    }

    #[test]
    fn test_json_round_trip() {
        let snapshot = VehicleSnapshot::new(117.5, -3.25, 21.7000001, 4.999);
        let parsed = VehicleSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();

        assert!((parsed.speed_kmh - snapshot.speed_kmh).abs() < 1e-9);
        assert!((parsed.outside_temp_c - snapshot.outside_temp_c).abs() < 1e-9);
        assert!((parsed.cabin_temp_c - snapshot.cabin_temp_c).abs() < 1e-9);
        assert!((parsed.battery_level_percent - snapshot.battery_level_percent).abs() < 1e-9);
    }

    #[test]
    fn test_default_is_within_limits() {
        let snapshot = VehicleSnapshot::default();
        assert!(snapshot.within_hard_limits());
        assert_eq!(snapshot.speed_kmh, 0.0);
    }

    #[test]
    fn test_hard_limits_reject_nan_and_out_of_range() {
        assert!(!VehicleSnapshot::new(f64::NAN, 0.0, 0.0, 50.0).within_hard_limits());
        assert!(!VehicleSnapshot::new(-1.0, 0.0, 0.0, 50.0).within_hard_limits());
        assert!(!VehicleSnapshot::new(10.0, 0.0, 0.0, 100.5).within_hard_limits());
    }

    #[test]
    fn test_driver_tip_priority() {
        // Speed wins over low battery and hot cabin
        let all_bad = VehicleSnapshot::new(130.0, 33.0, 34.0, 10.0);
        assert_eq!(DriverTip::classify(&all_bad), DriverTip::Safety);

        let low_battery_hot_cabin = VehicleSnapshot::new(50.0, 33.0, 34.0, 10.0);
        assert_eq!(
            DriverTip::classify(&low_battery_hot_cabin),
            DriverTip::Energy
        );

        let cold_cabin = VehicleSnapshot::new(50.0, -5.0, 16.0, 80.0);
        assert_eq!(DriverTip::classify(&cold_cabin), DriverTip::Comfort);

        let fine = VehicleSnapshot::new(60.0, 25.0, 24.0, 90.0);
        assert_eq!(DriverTip::classify(&fine), DriverTip::Normal);
    }

    #[test]
    fn test_driver_tip_boundaries_are_exclusive() {
        let at_limits = VehicleSnapshot::new(120.0, 25.0, 30.0, 20.0);
        assert_eq!(DriverTip::classify(&at_limits), DriverTip::Normal);
    }

    #[test]
    fn test_driver_tip_labels() {
        assert_eq!(DriverTip::Normal.label(), 0);
        assert_eq!(DriverTip::Comfort.label(), 1);
        assert_eq!(DriverTip::Safety.label(), 2);
        assert_eq!(DriverTip::Energy.label(), 3);
    }
}

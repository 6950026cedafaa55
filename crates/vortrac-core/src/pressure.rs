//! Surface pressure observations used by the pressure-deficit integration
//! (spec.md §4.5), grounded on
//! `original_source/tags/1.01-release/Pressure/AWIPS.cpp`'s fixed-column
//! METAR/AWIPS record shape.

use chrono::{DateTime, Utc};

/// One surface observation near the storm, used to anchor the gradient-wind
/// pressure integration.
#[derive(Debug, Clone, PartialEq)]
pub struct PressureObservation {
    pub station_id: String,
    pub time: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub sea_level_pressure_hpa: f64,
}

impl PressureObservation {
    pub fn new(
        station_id: impl Into<String>,
        time: DateTime<Utc>,
        lat: f64,
        lon: f64,
        sea_level_pressure_hpa: f64,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            time,
            lat,
            lon,
            sea_level_pressure_hpa,
        }
    }

    /// `true` if the observation's pressure is within the plausible range
    /// for a tropical-cyclone environment (spec.md §4.5 edge case: discard
    /// obviously corrupted reports rather than feeding them to the solver).
    pub fn is_plausible(&self) -> bool {
        (850.0..=1050.0).contains(&self.sea_level_pressure_hpa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_implausible_pressure() {
        let obs = PressureObservation::new("KMIA", Utc::now(), 25.8, -80.3, 30.0);
        assert!(!obs.is_plausible());
    }

    #[test]
    fn accepts_typical_pressure() {
        let obs = PressureObservation::new("KMIA", Utc::now(), 25.8, -80.3, 1005.3);
        assert!(obs.is_plausible());
    }
}

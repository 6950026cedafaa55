//! `VortexRecord`: one analysis cycle's chosen center and derived fields
//! (spec.md §4.4, §4.6).

use chrono::{DateTime, Utc};

/// The per-level center and intensity estimate chosen for one analysis
/// cycle, before pressure estimation is folded in.
#[derive(Debug, Clone)]
pub struct VortexRecord {
    pub time: DateTime<Utc>,
    pub radar_name: String,
    /// Chosen center per analyzed height level, in km relative to the
    /// gridded field's origin.
    pub centers_km: Vec<(f64, f64)>,
    /// Height of each entry in `centers_km`, in km.
    pub heights_km: Vec<f64>,
    /// Axisymmetric tangential wind (VTC0) at the chosen center, per level.
    pub max_vtc0_ms: Vec<f64>,
    /// Radius of maximum wind at the chosen center, per level, in km.
    pub rmw_km: Vec<f64>,
    /// Central pressure estimate, hPa, if a `PressureSolver` ran
    /// successfully this cycle.
    pub central_pressure_hpa: Option<f64>,
}

impl VortexRecord {
    pub fn new(time: DateTime<Utc>, radar_name: impl Into<String>) -> Self {
        Self {
            time,
            radar_name: radar_name.into(),
            centers_km: Vec::new(),
            heights_km: Vec::new(),
            max_vtc0_ms: Vec::new(),
            rmw_km: Vec::new(),
            central_pressure_hpa: None,
        }
    }

    /// The center at the lowest analyzed level, used as the next cycle's
    /// first-guess center (spec.md §4.5).
    pub fn lowest_level_center(&self) -> Option<(f64, f64)> {
        self.heights_km
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(idx, _)| self.centers_km[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowest_level_center_picks_min_height() {
        let mut v = VortexRecord::new(Utc::now(), "KAMX");
        v.heights_km = vec![3.0, 1.0, 2.0];
        v.centers_km = vec![(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)];
        assert_eq!(v.lowest_level_center(), Some((2.0, 2.0)));
    }

    #[test]
    fn lowest_level_center_none_when_empty() {
        let v = VortexRecord::new(Utc::now(), "KAMX");
        assert_eq!(v.lowest_level_center(), None);
    }
}

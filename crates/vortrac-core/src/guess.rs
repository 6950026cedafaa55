//! First-guess center tracking: ATCF best-track records and the running
//! guess track the analysis driver maintains between cycles (spec.md §4.6),
//! grounded on `original_source/trunk/Radar/RadarFactory.cpp`'s storm-track
//! bookkeeping.

use chrono::{DateTime, Utc};

/// One ATCF (Automated Tropical Cyclone Forecasting) best-track fix, as read
/// from a b-deck line.
#[derive(Debug, Clone, PartialEq)]
pub struct AtcfRecord {
    pub storm_id: String,
    pub time: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub max_wind_kt: f64,
    pub min_slp_hpa: Option<f64>,
}

/// The driver's running estimate of where to seed the next analysis cycle's
/// simplex search, updated from either an ATCF fix or the previous cycle's
/// chosen center (spec.md §4.6).
#[derive(Debug, Clone, Default)]
pub struct CenterGuessTrack {
    fixes: Vec<(DateTime<Utc>, f64, f64)>,
}

impl CenterGuessTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, time: DateTime<Utc>, lat: f64, lon: f64) {
        self.fixes.push((time, lat, lon));
        self.fixes.sort_by_key(|(t, _, _)| *t);
    }

    pub fn push_atcf(&mut self, record: &AtcfRecord) {
        self.push(record.time, record.lat, record.lon);
    }

    /// Most recent known fix, used as the next analysis cycle's first guess.
    pub fn latest(&self) -> Option<(DateTime<Utc>, f64, f64)> {
        self.fixes.last().copied()
    }

    /// Linear extrapolation of motion from the two most recent fixes,
    /// projected forward to `at`. Falls back to the latest fix if fewer than
    /// two are available (spec.md §4.6 edge case).
    pub fn extrapolate(&self, at: DateTime<Utc>) -> Option<(f64, f64)> {
        match self.fixes.len() {
            0 => None,
            1 => Some((self.fixes[0].1, self.fixes[0].2)),
            _ => {
                let (t0, lat0, lon0) = self.fixes[self.fixes.len() - 2];
                let (t1, lat1, lon1) = self.fixes[self.fixes.len() - 1];
                let dt_fix = (t1 - t0).num_seconds() as f64;
                if dt_fix <= 0.0 {
                    return Some((lat1, lon1));
                }
                let dt_target = (at - t1).num_seconds() as f64;
                let frac = dt_target / dt_fix;
                Some((lat1 + (lat1 - lat0) * frac, lon1 + (lon1 - lon0) * frac))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn extrapolate_with_single_fix_holds_position() {
        let mut track = CenterGuessTrack::new();
        let t0 = Utc::now();
        track.push(t0, 25.0, -80.0);
        assert_eq!(track.extrapolate(t0 + Duration::hours(1)), Some((25.0, -80.0)));
    }

    #[test]
    fn extrapolate_projects_constant_motion() {
        let mut track = CenterGuessTrack::new();
        let t0 = Utc::now();
        track.push(t0, 25.0, -80.0);
        track.push(t0 + Duration::hours(1), 25.2, -80.1);
        let (lat, lon) = track.extrapolate(t0 + Duration::hours(2)).unwrap();
        assert!((lat - 25.4).abs() < 1e-9);
        assert!((lon - (-80.2)).abs() < 1e-9);
    }
}

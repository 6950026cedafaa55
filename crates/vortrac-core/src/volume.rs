//! `RadarVolume`: an immutable single-radar-volume snapshot.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, Result};
use crate::ray::{Ray, Sweep};

/// Geodetic position of a radar site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarPosition {
    pub lat: f64,
    pub lon: f64,
    /// Altitude above mean sea level, in km.
    pub alt_km: f64,
}

/// One radar volume: an ordered list of sweeps, each indexing a contiguous
/// range of rays. Immutable after construction (spec.md §3).
#[derive(Debug, Clone)]
pub struct RadarVolume {
    radar_name: String,
    position: RadarPosition,
    time: DateTime<Utc>,
    sweeps: Vec<Sweep>,
    rays: Vec<Ray>,
}

impl RadarVolume {
    /// Build a volume, validating that sweeps are ordered by elevation
    /// (spec.md §3 invariant) and that every sweep's ray range is in bounds.
    pub fn new(
        radar_name: impl Into<String>,
        position: RadarPosition,
        time: DateTime<Utc>,
        sweeps: Vec<Sweep>,
        rays: Vec<Ray>,
    ) -> Result<Self> {
        for window in sweeps.windows(2) {
            let (prev, next) = (window[0], window[1]);
            if next.elevation_deg() < prev.elevation_deg() {
                return Err(CoreError::UnorderedSweeps {
                    prev: prev.elevation_deg(),
                    next: next.elevation_deg(),
                });
            }
        }
        for sweep in &sweeps {
            let range = sweep.ray_range();
            if *range.end() >= rays.len() {
                return Err(CoreError::IndexOutOfRange {
                    index: *range.end(),
                    len: rays.len(),
                });
            }
        }
        Ok(Self {
            radar_name: radar_name.into(),
            position,
            time,
            sweeps,
            rays,
        })
    }

    pub fn radar_name(&self) -> &str {
        &self.radar_name
    }

    pub fn position(&self) -> RadarPosition {
        self.position
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn sweeps(&self) -> &[Sweep] {
        &self.sweeps
    }

    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    /// Iterate over every ray across every sweep, in storage order.
    pub fn all_rays(&self) -> impl Iterator<Item = &Ray> {
        self.rays.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ray::GateArray;

    fn ray(el: f64, az: f64) -> Ray {
        Ray::new(
            el,
            az,
            GateArray::empty(),
            GateArray::empty(),
            GateArray::empty(),
        )
    }

    #[test]
    fn rejects_unordered_sweeps() {
        let rays = vec![ray(0.5, 0.0), ray(1.5, 0.0)];
        let sweeps = vec![
            Sweep::new(1.5, 26.0, 21, 0, 0),
            Sweep::new(0.5, 26.0, 21, 1, 1),
        ];
        let err = RadarVolume::new(
            "KAMX",
            RadarPosition {
                lat: 25.0,
                lon: -80.0,
                alt_km: 0.01,
            },
            Utc::now(),
            sweeps,
            rays,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::UnorderedSweeps { .. }));
    }

    #[test]
    fn accepts_ordered_sweeps() {
        let rays = vec![ray(0.5, 0.0), ray(1.5, 0.0)];
        let sweeps = vec![
            Sweep::new(0.5, 26.0, 21, 0, 0),
            Sweep::new(1.5, 26.0, 21, 1, 1),
        ];
        let volume = RadarVolume::new(
            "KAMX",
            RadarPosition {
                lat: 25.0,
                lon: -80.0,
                alt_km: 0.01,
            },
            Utc::now(),
            sweeps,
            rays,
        )
        .unwrap();
        assert_eq!(volume.sweeps().len(), 2);
    }
}

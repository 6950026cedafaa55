//! Nelder-Mead search result types (spec.md §4.3), grounded on
//! `original_source/tags/1.0-alpha/Threads/SimplexThread.cpp`'s
//! `simplexResult`/`archiveCenters` bookkeeping.

/// Per-point classification, mirroring spec.md §3's vocabulary for a single
/// seed's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointStatus {
    /// The seed's simplex converged within tolerance.
    Converged,
    /// The seed's simplex ran out of iterations without converging, or its
    /// VTC0 fell outside the plausible range.
    Diverged,
    /// The seed never found a usable point: it wandered out of the CAPPI or
    /// every ring fit it tried failed.
    InsufficientData,
}

/// A candidate center in the simplex search's (x, y) plane, in km relative
/// to the gridded field's origin, paired with the objective value (VTC0)
/// it produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplexPoint {
    pub x_km: f64,
    pub y_km: f64,
    pub vtc0: f64,
    pub status: PointStatus,
}

/// One seed's raw result, before the mean/trim reduction. Kept alongside the
/// trimmed `accepted_centers` so a caller can inspect what every seed in the
/// grid actually did, not just the survivors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplexSeedResult {
    pub start_x_km: f64,
    pub start_y_km: f64,
    pub point: SimplexPoint,
}

/// Outcome of one simplex search at a given level/ring, mirroring the
/// original's center-quality classification plus spec.md §4.3's
/// `MaxIterReached` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimplexStatus {
    /// The search converged and the resulting cluster of points passed the
    /// standard-deviation trim (spec.md §4.3).
    Converged,
    /// The search converged but too few points survived the trim to trust
    /// the centroid.
    InsufficientConvergence,
    /// The initial simplex walked outside the CAPPI before converging.
    OutOfCappi,
    /// Every seed exhausted its iteration budget without converging.
    MaxIterReached,
}

/// Record of one simplex search at a single (level, radius) pair, ready to
/// be handed to the center chooser.
#[derive(Debug, Clone)]
pub struct SimplexRecord {
    pub height_km: f64,
    pub radius_km: f64,
    pub status: SimplexStatus,
    /// Converged seed centers that survived the one-standard-deviation trim.
    pub accepted_centers: Vec<SimplexPoint>,
    /// Every seed's raw outcome, trimmed or not, for diagnostics.
    pub seed_results: Vec<SimplexSeedResult>,
    /// Centroid of `accepted_centers`, if any survived.
    pub mean_x_km: Option<f64>,
    pub mean_y_km: Option<f64>,
    /// Standard deviation of the accepted centers' positions, km.
    pub std_dev_km: Option<f64>,
}

impl SimplexRecord {
    pub fn empty(height_km: f64, radius_km: f64, status: SimplexStatus) -> Self {
        Self {
            height_km,
            radius_km,
            status,
            accepted_centers: Vec::new(),
            seed_results: Vec::new(),
            mean_x_km: None,
            mean_y_km: None,
            std_dev_km: None,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.status == SimplexStatus::Converged && self.mean_x_km.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_is_not_usable() {
        let record = SimplexRecord::empty(1.0, 20.0, SimplexStatus::OutOfCappi);
        assert!(!record.is_usable());
        assert!(record.seed_results.is_empty());
    }
}

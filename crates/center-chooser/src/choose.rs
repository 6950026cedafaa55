//! Picks a single center per analysis cycle from a batch of per-(level,
//! radius) simplex results, balancing search strength (VTC0), cluster
//! agreement, and continuity with the prior cycle's center (spec.md §4.4).

use vortrac_core::{SimplexRecord, SimplexStatus};

use crate::error::{ChooserError, Result};

/// Weights for the five terms of the center-selection score (spec.md §4.4):
/// `wStd*(1-stdDevVertex/maxStd) + wCount*(count/P) + wVT*(VT/maxVT) +
/// wPeak*peakScore + wPersistence*continuity(level,ring)`.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub w_std: f64,
    pub w_count: f64,
    pub w_vt: f64,
    pub w_peak: f64,
    pub w_persistence: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            w_std: 1.0,
            w_count: 1.0,
            w_vt: 1.0,
            w_peak: 1.0,
            w_persistence: 1.0,
        }
    }
}

/// Distance, in km, over which the continuity term decays to roughly a
/// third of its peak value. Keeps `continuity` a bounded, positive term
/// rather than an unbounded penalty.
const CONTINUITY_SCALE_KM: f64 = 10.0;

/// The center chosen for one analysis cycle, plus the level/radius pair
/// that produced it.
#[derive(Debug, Clone, Copy)]
pub struct ChosenCenter {
    pub x_km: f64,
    pub y_km: f64,
    pub height_km: f64,
    pub radius_km: f64,
    pub vtc0_ms: f64,
}

fn vt_of(record: &SimplexRecord) -> f64 {
    record
        .accepted_centers
        .iter()
        .map(|p| p.vtc0)
        .fold(f64::MIN, f64::max)
}

fn continuity(mean_x: f64, mean_y: f64, prior_center: Option<(f64, f64)>) -> f64 {
    match prior_center {
        Some((px, py)) => {
            let dx = mean_x - px;
            let dy = mean_y - py;
            let dist = (dx * dx + dy * dy).sqrt();
            (-dist / CONTINUITY_SCALE_KM).exp()
        }
        None => 1.0,
    }
}

/// `true` if `record`'s VT is a local maximum in radius among the other
/// usable records at the same height level (spec.md §4.4: peakScore
/// "reward[s] rings where VT(ring) is a local maximum in radius").
fn is_radial_peak(record: &SimplexRecord, usable: &[&SimplexRecord]) -> bool {
    let mut same_level: Vec<&&SimplexRecord> = usable
        .iter()
        .filter(|r| r.height_km == record.height_km)
        .collect();
    same_level.sort_by(|a, b| a.radius_km.partial_cmp(&b.radius_km).unwrap());

    let Some(pos) = same_level.iter().position(|r| r.radius_km == record.radius_km) else {
        return true;
    };
    let vt = vt_of(record);
    let lower_ok = pos == 0 || vt_of(same_level[pos - 1]) <= vt;
    let upper_ok = pos + 1 == same_level.len() || vt_of(same_level[pos + 1]) <= vt;
    lower_ok && upper_ok
}

fn score(
    record: &SimplexRecord,
    usable: &[&SimplexRecord],
    max_std_km: f64,
    max_vt_ms: f64,
    prior_center: Option<(f64, f64)>,
    weights: &ScoreWeights,
) -> f64 {
    let mean_x = record.mean_x_km.unwrap();
    let mean_y = record.mean_y_km.unwrap();
    let std_dev = record.std_dev_km.unwrap_or(0.0);
    let vt = vt_of(record);
    let count = record.accepted_centers.len() as f64;
    let total_seeds = record.seed_results.len().max(1) as f64;

    let std_term = if max_std_km > 0.0 { 1.0 - std_dev / max_std_km } else { 1.0 };
    let count_term = count / total_seeds;
    let vt_term = if max_vt_ms > 0.0 { vt / max_vt_ms } else { 0.0 };
    let peak_term = if is_radial_peak(record, usable) { 1.0 } else { 0.0 };
    let persistence_term = continuity(mean_x, mean_y, prior_center);

    weights.w_std * std_term
        + weights.w_count * count_term
        + weights.w_vt * vt_term
        + weights.w_peak * peak_term
        + weights.w_persistence * persistence_term
}

/// Choose the best usable record among `records` for one analysis cycle.
pub fn choose_center(
    records: &[SimplexRecord],
    prior_center: Option<(f64, f64)>,
    weights: &ScoreWeights,
) -> Result<ChosenCenter> {
    let usable: Vec<&SimplexRecord> = records
        .iter()
        .filter(|r| r.status == SimplexStatus::Converged && r.is_usable())
        .collect();

    if usable.is_empty() {
        return Err(ChooserError::NoUsableRecords);
    }

    let max_std_km = usable
        .iter()
        .map(|r| r.std_dev_km.unwrap_or(0.0))
        .fold(0.0_f64, f64::max);
    let max_vt_ms = usable.iter().map(|r| vt_of(r)).fold(0.0_f64, f64::max);

    let best = usable
        .iter()
        .copied()
        .max_by(|a, b| {
            score(a, &usable, max_std_km, max_vt_ms, prior_center, weights)
                .partial_cmp(&score(b, &usable, max_std_km, max_vt_ms, prior_center, weights))
                .unwrap()
        })
        .ok_or(ChooserError::NoUsableRecords)?;

    Ok(ChosenCenter {
        x_km: best.mean_x_km.unwrap(),
        y_km: best.mean_y_km.unwrap(),
        height_km: best.height_km,
        radius_km: best.radius_km,
        vtc0_ms: vt_of(best),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vortrac_core::{PointStatus, SimplexPoint, SimplexSeedResult};

    fn converged(height_km: f64, radius_km: f64, x: f64, y: f64, vtc0: f64) -> SimplexRecord {
        let point = SimplexPoint {
            x_km: x,
            y_km: y,
            vtc0,
            status: PointStatus::Converged,
        };
        SimplexRecord {
            height_km,
            radius_km,
            status: SimplexStatus::Converged,
            accepted_centers: vec![point],
            seed_results: vec![SimplexSeedResult {
                start_x_km: x,
                start_y_km: y,
                point,
            }],
            mean_x_km: Some(x),
            mean_y_km: Some(y),
            std_dev_km: Some(0.1),
        }
    }

    #[test]
    fn prefers_stronger_vortex_without_prior() {
        let records = vec![
            converged(1.0, 20.0, 0.0, 0.0, 30.0),
            converged(1.0, 30.0, 5.0, 0.0, 50.0),
        ];
        let chosen = choose_center(&records, None, &ScoreWeights::default()).unwrap();
        assert!((chosen.x_km - 5.0).abs() < 1e-9);
    }

    #[test]
    fn continuity_can_override_a_slightly_stronger_far_candidate() {
        let records = vec![
            converged(1.0, 20.0, 0.0, 0.0, 30.0),
            converged(1.0, 30.0, 50.0, 0.0, 31.0),
        ];
        let weights = ScoreWeights {
            w_persistence: 20.0,
            ..ScoreWeights::default()
        };
        let chosen = choose_center(&records, Some((0.0, 0.0)), &weights).unwrap();
        assert!((chosen.x_km - 0.0).abs() < 1e-9);
    }

    #[test]
    fn errors_when_nothing_converged() {
        let records = vec![SimplexRecord::empty(1.0, 20.0, SimplexStatus::OutOfCappi)];
        assert!(matches!(
            choose_center(&records, None, &ScoreWeights::default()),
            Err(ChooserError::NoUsableRecords)
        ));
    }

    #[test]
    fn peak_score_favors_a_radial_local_maximum() {
        let records = vec![
            converged(1.0, 10.0, 0.0, 0.0, 20.0),
            converged(1.0, 20.0, 1.0, 0.0, 40.0),
            converged(1.0, 30.0, 2.0, 0.0, 25.0),
        ];
        let weights = ScoreWeights {
            w_peak: 10.0,
            w_vt: 0.0,
            w_std: 0.0,
            w_count: 0.0,
            w_persistence: 0.0,
        };
        let chosen = choose_center(&records, None, &weights).unwrap();
        assert!((chosen.radius_km - 20.0).abs() < 1e-9);
    }
}

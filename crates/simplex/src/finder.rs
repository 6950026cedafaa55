//! `SimplexCenterFinder`: runs the amoeba search from a grid of seeds and
//! reduces the converged results to a single candidate center, following
//! `original_source`'s `archiveCenters` reduction (mean/stddev over
//! plausible converged points, then a one-standard-deviation trim and
//! recompute).

use rayon::prelude::*;
use tracing::{debug, trace};
use vortrac_core::{PointStatus, SimplexPoint, SimplexRecord, SimplexSeedResult, SimplexStatus};

use crate::amoeba::{search, AmoebaOutcome, ObjectiveOutcome};
use crate::seeds::{initial_simplex, seed_grid};

/// Tuning knobs for one simplex search (spec.md §4.3).
#[derive(Debug, Clone, Copy)]
pub struct SimplexConfig {
    /// Number of seeds laid out in the square grid; must be a perfect
    /// square (e.g. 9, 16, 25).
    pub num_seeds: usize,
    /// Spacing between adjacent seeds, km.
    pub seed_spacing_km: f64,
    /// Edge length of each seed's initial equilateral simplex, km.
    pub initial_edge_km: f64,
    /// Nelder-Mead convergence tolerance (spec.md §4.3).
    pub epsilon: f64,
    /// Converged centers are only kept if their VTC0 falls in
    /// `(0, max_plausible_vt_ms)` (original source filters `0 < VT < 100`).
    pub max_plausible_vt_ms: f64,
    /// Per-seed iteration budget before giving up (spec.md §4.3: "Terminate
    /// at maxIterations with a logged warning").
    pub max_iterations: usize,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        Self {
            num_seeds: 25,
            seed_spacing_km: 0.5,
            initial_edge_km: 0.25,
            epsilon: 1e-4,
            max_plausible_vt_ms: 100.0,
            max_iterations: 500,
        }
    }
}

fn mean_and_std(points: &[SimplexPoint]) -> ((f64, f64), f64) {
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x_km).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.y_km).sum::<f64>() / n;
    let variance = points
        .iter()
        .map(|p| {
            let dx = p.x_km - mean_x;
            let dy = p.y_km - mean_y;
            dx * dx + dy * dy
        })
        .sum::<f64>()
        / n;
    ((mean_x, mean_y), variance.sqrt())
}

fn classify(outcome: AmoebaOutcome, max_plausible_vt_ms: f64) -> SimplexPoint {
    match outcome {
        AmoebaOutcome::Converged { x, y, value } if value > 0.0 && value < max_plausible_vt_ms => SimplexPoint {
            x_km: x,
            y_km: y,
            vtc0: value,
            status: PointStatus::Converged,
        },
        AmoebaOutcome::Converged { x, y, value } => SimplexPoint {
            x_km: x,
            y_km: y,
            vtc0: value,
            status: PointStatus::Diverged,
        },
        AmoebaOutcome::MaxIterReached { x, y, value } => SimplexPoint {
            x_km: x,
            y_km: y,
            vtc0: value,
            status: PointStatus::Diverged,
        },
        AmoebaOutcome::OutOfCappi | AmoebaOutcome::RingFitFailed => SimplexPoint {
            x_km: 0.0,
            y_km: 0.0,
            vtc0: 0.0,
            status: PointStatus::InsufficientData,
        },
    }
}

/// Run the simplex search for one (height, radius) pair.
///
/// `objective` evaluates the GBVTD-fit VTC0 at a candidate center; it must
/// be safe to call concurrently (seeds are searched in parallel via
/// rayon).
pub fn find_center(
    objective: impl Fn(f64, f64) -> ObjectiveOutcome + Sync,
    first_guess: (f64, f64),
    config: &SimplexConfig,
    height_km: f64,
    radius_km: f64,
) -> SimplexRecord {
    let seeds = match seed_grid(first_guess.0, first_guess.1, config.num_seeds, config.seed_spacing_km) {
        Ok(seeds) => seeds,
        Err(_) => return SimplexRecord::empty(height_km, radius_km, SimplexStatus::InsufficientConvergence),
    };

    let seed_results: Vec<SimplexSeedResult> = seeds
        .par_iter()
        .map(|&(sx, sy)| {
            let vertices = initial_simplex(sx, sy, config.initial_edge_km);
            let outcome = search(vertices, config.epsilon, config.max_iterations, &objective);
            SimplexSeedResult {
                start_x_km: sx,
                start_y_km: sy,
                point: classify(outcome, config.max_plausible_vt_ms),
            }
        })
        .collect();

    let all_insufficient = seed_results
        .iter()
        .all(|r| r.point.status == PointStatus::InsufficientData);
    if all_insufficient {
        debug!(height_km, radius_km, "every seed wandered out of the CAPPI or hit a failed ring fit");
        let mut record = SimplexRecord::empty(height_km, radius_km, SimplexStatus::OutOfCappi);
        record.seed_results = seed_results;
        return record;
    }

    let all_diverged = seed_results.iter().all(|r| r.point.status == PointStatus::Diverged);
    if all_diverged {
        let mut record = SimplexRecord::empty(height_km, radius_km, SimplexStatus::MaxIterReached);
        record.seed_results = seed_results;
        return record;
    }

    let plausible: Vec<SimplexPoint> = seed_results
        .iter()
        .filter(|r| r.point.status == PointStatus::Converged)
        .map(|r| r.point)
        .collect();

    if plausible.len() < 2 {
        trace!(height_km, radius_km, found = plausible.len(), "too few plausible seeds converged");
        let mut record = SimplexRecord::empty(height_km, radius_km, SimplexStatus::InsufficientConvergence);
        record.seed_results = seed_results;
        return record;
    }

    let ((mean_x, mean_y), std_dev) = mean_and_std(&plausible);
    let trimmed: Vec<SimplexPoint> = plausible
        .iter()
        .copied()
        .filter(|p| {
            let dx = p.x_km - mean_x;
            let dy = p.y_km - mean_y;
            (dx * dx + dy * dy).sqrt() <= std_dev || std_dev == 0.0
        })
        .collect();

    if trimmed.is_empty() {
        let mut record = SimplexRecord::empty(height_km, radius_km, SimplexStatus::InsufficientConvergence);
        record.seed_results = seed_results;
        return record;
    }

    let ((final_x, final_y), final_std) = mean_and_std(&trimmed);

    SimplexRecord {
        height_km,
        radius_km,
        status: SimplexStatus::Converged,
        accepted_centers: trimmed,
        seed_results,
        mean_x_km: Some(final_x),
        mean_y_km: Some(final_y),
        std_dev_km: Some(final_std),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_a_single_peaked_objective() {
        let objective = |x: f64, y: f64| ObjectiveOutcome::Value(40.0 - ((x - 2.0).powi(2) + (y - 1.0).powi(2)) * 0.1);
        let config = SimplexConfig {
            num_seeds: 9,
            seed_spacing_km: 0.5,
            initial_edge_km: 0.2,
            epsilon: 1e-5,
            max_plausible_vt_ms: 100.0,
            max_iterations: 500,
        };
        let record = find_center(objective, (2.0, 1.0), &config, 1.0, 20.0);
        assert!(record.is_usable());
        assert!((record.mean_x_km.unwrap() - 2.0).abs() < 0.5);
        assert!((record.mean_y_km.unwrap() - 1.0).abs() < 0.5);
        assert_eq!(record.seed_results.len(), 9);
    }

    #[test]
    fn reports_out_of_cappi_when_objective_always_out_of_cappi() {
        let config = SimplexConfig::default();
        let record = find_center(|_, _| ObjectiveOutcome::OutOfCappi, (0.0, 0.0), &config, 1.0, 20.0);
        assert_eq!(record.status, SimplexStatus::OutOfCappi);
    }

    #[test]
    fn reports_max_iter_reached_when_every_seed_exhausts_its_budget() {
        let config = SimplexConfig {
            max_iterations: 1,
            ..SimplexConfig::default()
        };
        let objective = |_: f64, _: f64| ObjectiveOutcome::Value(1.0);
        let record = find_center(objective, (0.0, 0.0), &config, 1.0, 20.0);
        assert_eq!(record.status, SimplexStatus::MaxIterReached);
    }
}

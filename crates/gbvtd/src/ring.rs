//! Fits a [`GbvtdCoefficients`] harmonic decomposition to one ring's
//! (azimuth, radial velocity) samples.

use vortrac_core::{ClosureAssumption, GbvtdCoefficients, RingSample};

use crate::error::{GbvtdError, Result};
use crate::geometry::{psi_angle, radar_bearing_from_center, radar_to_center_distance};
use crate::linalg::{gauss_jordan_solve, normal_equations};

/// Largest tangential wavenumber this solver will ever fit (VTC0/VTS0
/// through VTC2/VTS2).
const MAX_SUPPORTED_WAVENUMBER: usize = 2;

/// Largest tolerated contiguous azimuthal gap, in degrees, for the highest
/// requested wavenumber; lower wavenumbers tolerate a looser, scaled
/// threshold (see [`wavenumber_gap_threshold`]).
pub const DEFAULT_MAX_GAP_DEG: f64 = 90.0;

fn largest_gap_deg(sorted_azimuths: &[f64]) -> f64 {
    if sorted_azimuths.len() < 2 {
        return 360.0;
    }
    let mut max_gap = 0.0;
    for window in sorted_azimuths.windows(2) {
        let gap = window[1] - window[0];
        if gap > max_gap {
            max_gap = gap;
        }
    }
    let wraparound = 360.0 - sorted_azimuths[sorted_azimuths.len() - 1] + sorted_azimuths[0];
    max_gap.max(wraparound)
}

/// Per-wavenumber azimuthal-gap threshold, derived from the single
/// configured `max_gap_deg` for this ring radius (spec.md §6 models
/// `maxdatagap` per radius; this scales it down across wavenumbers rather
/// than requiring a separate threshold per wavenumber in configuration).
/// The requested wavenumber gets exactly `max_gap_deg`; each wavenumber
/// below it tolerates 50% more, so wavenumber 0 is always the most
/// forgiving.
fn wavenumber_gap_threshold(max_gap_deg: f64, requested_max_wavenumber: usize, wavenumber: usize) -> f64 {
    let steps_below_max = (requested_max_wavenumber - wavenumber) as f64;
    max_gap_deg * (1.0 + 0.5 * steps_below_max)
}

/// Highest wavenumber ≤ `requested_max_wavenumber` the largest azimuthal gap
/// permits, or `None` if even wavenumber 0 is disallowed (spec.md §4.2:
/// "Determine the largest gap in ψ; if it exceeds the threshold for any
/// wavenumber ≤ N, that and higher wavenumbers are disallowed").
fn effective_max_wavenumber(gap_deg: f64, requested_max_wavenumber: usize, max_gap_deg: f64) -> Option<usize> {
    let requested_max_wavenumber = requested_max_wavenumber.min(MAX_SUPPORTED_WAVENUMBER);
    let mut allowed = None;
    for wavenumber in 0..=requested_max_wavenumber {
        let threshold = wavenumber_gap_threshold(max_gap_deg, requested_max_wavenumber, wavenumber);
        if gap_deg <= threshold {
            allowed = Some(wavenumber);
        } else {
            break;
        }
    }
    allowed
}

fn residual_std_dev(design: &[Vec<f64>], observed: &[f64], solution: &[f64]) -> f64 {
    let n = observed.len() as f64;
    if n == 0.0 {
        return 0.0;
    }
    let sum_sq: f64 = design
        .iter()
        .zip(observed.iter())
        .map(|(row, &obs)| {
            let predicted: f64 = row.iter().zip(solution.iter()).map(|(a, b)| a * b).sum();
            (obs - predicted).powi(2)
        })
        .sum();
    (sum_sq / n).sqrt()
}

/// Fit harmonic coefficients to `samples` taken around a ring of
/// `ring_radius_km` centered at `(center_x_km, center_y_km)`, given the
/// radar's position in the same km-space.
///
/// `max_wavenumber` is the requested tangential wavenumber ceiling (spec.md
/// §6 `center.maxwavenumber`); `max_gap_deg` is the gap threshold configured
/// for this ring's radius (`center.maxdatagap`). The ring's largest
/// azimuthal gap may force a lower wavenumber than requested — see
/// [`effective_max_wavenumber`] — in which case the unfit higher-wavenumber
/// coefficients are reported as zero.
pub fn fit_ring(
    samples: &[RingSample],
    radar_x_km: f64,
    radar_y_km: f64,
    center_x_km: f64,
    center_y_km: f64,
    ring_radius_km: f64,
    closure: ClosureAssumption,
    max_wavenumber: usize,
    max_gap_deg: f64,
) -> Result<GbvtdCoefficients> {
    let mut valid: Vec<&RingSample> = samples.iter().filter(|s| s.sample.is_valid()).collect();
    valid.sort_by(|a, b| a.azimuth_deg.partial_cmp(&b.azimuth_deg).unwrap());

    let azimuths: Vec<f64> = valid.iter().map(|s| s.azimuth_deg).collect();
    let gap_deg = largest_gap_deg(&azimuths);

    let allowed_wavenumber = effective_max_wavenumber(gap_deg, max_wavenumber, max_gap_deg).ok_or_else(|| {
        GbvtdError::InsufficientRingData {
            gap_deg,
            max_allowed_deg: wavenumber_gap_threshold(max_gap_deg, max_wavenumber.min(MAX_SUPPORTED_WAVENUMBER), 0),
        }
    })?;

    // spec.md §4.2: "Fails with InsufficientRingData when fewer than 2N+1
    // valid samples survive", N being the wavenumber actually admitted.
    let needed = 2 * allowed_wavenumber + 1;
    if valid.len() < needed {
        return Err(GbvtdError::InsufficientSamples { found: valid.len(), needed });
    }

    let rt = radar_to_center_distance(radar_x_km, radar_y_km, center_x_km, center_y_km);
    let radar_bearing = radar_bearing_from_center(radar_x_km, radar_y_km, center_x_km, center_y_km);

    let fit_radial_wavenumber1 = allowed_wavenumber >= 1 && matches!(closure, ClosureAssumption::Gbvtd);
    let fixed_radial_wavenumber1 = match closure {
        ClosureAssumption::Fixed(v) => Some(v),
        _ => None,
    };

    let mut design = Vec::with_capacity(valid.len());
    let mut observed = Vec::with_capacity(valid.len());
    for s in &valid {
        let beta = s.azimuth_deg.to_radians() - radar_bearing;
        let psi = psi_angle(rt, ring_radius_km, beta);
        let (cos_psi, sin_psi) = (psi.cos(), psi.sin());

        let mut row = vec![cos_psi];
        if allowed_wavenumber >= 1 {
            row.push(cos_psi * beta.cos());
            row.push(cos_psi * beta.sin());
        }
        if allowed_wavenumber >= 2 {
            row.push(cos_psi * (2.0 * beta).cos());
            row.push(cos_psi * (2.0 * beta).sin());
        }
        row.push(sin_psi);

        let mut target = s.sample.value().unwrap() as f64;
        if let Some(fixed) = fixed_radial_wavenumber1 {
            target -= sin_psi * beta.cos() * fixed;
        }
        if fit_radial_wavenumber1 {
            row.push(sin_psi * beta.cos());
            row.push(sin_psi * beta.sin());
        }
        design.push(row);
        observed.push(target);
    }

    let (ata, atb) = normal_equations(&design, &observed);
    let solution = gauss_jordan_solve(ata, atb)?;

    let mut idx = 0;
    let vtc0 = solution[idx];
    idx += 1;
    let (vtc1, vts1) = if allowed_wavenumber >= 1 {
        let pair = (solution[idx], solution[idx + 1]);
        idx += 2;
        pair
    } else {
        (0.0, 0.0)
    };
    let (vtc2, vts2) = if allowed_wavenumber >= 2 {
        let pair = (solution[idx], solution[idx + 1]);
        idx += 2;
        pair
    } else {
        (0.0, 0.0)
    };
    let vrc0 = solution[idx];
    idx += 1;
    let (vrc1, vrs1) = if fit_radial_wavenumber1 {
        let pair = (solution[idx], solution[idx + 1]);
        idx += 2;
        pair
    } else {
        (fixed_radial_wavenumber1.unwrap_or(0.0), 0.0)
    };
    debug_assert_eq!(idx, solution.len());

    let residual_std_ms = residual_std_dev(&design, &observed, &solution);

    Ok(GbvtdCoefficients {
        vtc0,
        vtc1,
        vts1,
        vtc2,
        vts2,
        vrc0,
        vrc1,
        vrs1,
        vm: rt,
        num_samples: valid.len(),
        max_gap_deg: gap_deg,
        residual_std_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vortrac_core::Sample;

    fn synthetic_samples(vtc0: f64, n: usize) -> Vec<RingSample> {
        let rt = 100.0;
        let radius = 20.0;
        (0..n)
            .map(|idx| {
                let az_deg = idx as f64 * 360.0 / n as f64;
                let beta = az_deg.to_radians();
                let psi = psi_angle(rt, radius, beta);
                let vr = vtc0 * psi.cos();
                RingSample {
                    azimuth_deg: az_deg,
                    sample: Sample::new(vr as f32),
                }
            })
            .collect()
    }

    /// Samples over a narrow arc, leaving a gap of `gap_deg` degrees.
    fn arc_samples(vtc0: f64, arc_deg: f64, step_deg: f64) -> Vec<RingSample> {
        let rt = 100.0;
        let radius = 20.0;
        let mut az_deg = 0.0;
        let mut samples = Vec::new();
        while az_deg <= arc_deg + 1e-9 {
            let beta = az_deg.to_radians();
            let psi = psi_angle(rt, radius, beta);
            let vr = vtc0 * psi.cos();
            samples.push(RingSample {
                azimuth_deg: az_deg,
                sample: Sample::new(vr as f32),
            });
            az_deg += step_deg;
        }
        samples
    }

    #[test]
    fn recovers_axisymmetric_tangential_wind() {
        let samples = synthetic_samples(40.0, 72);
        let coeffs = fit_ring(&samples, 100.0, 0.0, 0.0, 0.0, 20.0, ClosureAssumption::Gbvtd, 2, DEFAULT_MAX_GAP_DEG).unwrap();
        assert!((coeffs.vtc0 - 40.0).abs() < 1.0);
        assert!(coeffs.residual_std_ms < 1.0);
    }

    #[test]
    fn rejects_too_few_samples() {
        let samples = synthetic_samples(40.0, 3);
        let err = fit_ring(&samples, 100.0, 0.0, 0.0, 0.0, 20.0, ClosureAssumption::Gbvtd, 2, DEFAULT_MAX_GAP_DEG).unwrap_err();
        assert!(matches!(err, GbvtdError::InsufficientSamples { .. }));
    }

    #[test]
    fn original_hvvp_closure_uses_six_unknowns() {
        let samples = synthetic_samples(40.0, 72);
        let coeffs =
            fit_ring(&samples, 100.0, 0.0, 0.0, 0.0, 20.0, ClosureAssumption::OriginalHVVP, 2, DEFAULT_MAX_GAP_DEG).unwrap();
        assert_eq!(coeffs.vrc1, 0.0);
        assert_eq!(coeffs.vrs1, 0.0);
    }

    #[test]
    fn large_gap_reduces_the_fitted_wavenumber() {
        // A 210° arc leaves a 150° gap: too wide for wavenumber 2 (threshold
        // 90°) or wavenumber 1 (threshold 135°), but within wavenumber 0's
        // threshold (180°).
        let samples = arc_samples(40.0, 210.0, 10.0);
        let coeffs = fit_ring(&samples, 100.0, 0.0, 0.0, 0.0, 20.0, ClosureAssumption::Gbvtd, 2, DEFAULT_MAX_GAP_DEG).unwrap();
        assert_eq!(coeffs.vtc1, 0.0);
        assert_eq!(coeffs.vts1, 0.0);
        assert_eq!(coeffs.vtc2, 0.0);
        assert_eq!(coeffs.vts2, 0.0);
    }

    #[test]
    fn gap_too_large_for_any_wavenumber_is_rejected() {
        // A 60° arc leaves a 300° gap, beyond even wavenumber 0's loosest
        // threshold (180°).
        let samples = arc_samples(40.0, 60.0, 10.0);
        let err = fit_ring(&samples, 100.0, 0.0, 0.0, 0.0, 20.0, ClosureAssumption::Gbvtd, 2, DEFAULT_MAX_GAP_DEG).unwrap_err();
        assert!(matches!(err, GbvtdError::InsufficientRingData { .. }));
    }
}

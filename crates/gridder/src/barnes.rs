//! Two-pass Barnes objective analysis.
//!
//! Grounded on `original_source/trunk/DataObjects/Cartesian.cpp`'s
//! `BarnesInterpolation`: a Gaussian-weighted pass over nearby observations
//! produces a first-guess grid, then a second pass interpolates the
//! residuals between the observations and the first-guess grid back onto
//! the grid to sharpen features the broad first pass smoothed away.

/// One observation contributing to the analysis: a 3-D position in km
/// (relative to the grid's origin) and a scalar value.
#[derive(Debug, Clone, Copy)]
pub struct Observation {
    pub x_km: f64,
    pub y_km: f64,
    pub z_km: f64,
    pub value: f64,
}

/// Barnes falloff/cutoff parameters, derived from grid spacing the same way
/// `original_source` derives them: `falloff = 5.052 * (4 * gridsp / pi)^2`,
/// with a cutoff radius at `sqrt(20 * falloff)` beyond which an
/// observation's weight is treated as zero.
#[derive(Debug, Clone, Copy)]
pub struct BarnesParams {
    pub falloff: f64,
    pub cutoff_radius_km: f64,
    /// Second-pass smoothing factor: the second pass uses `falloff *
    /// smoother` as its own falloff. `original_source` used 0.3 for
    /// reflectivity's correction pass and 1.0 (no extra smoothing) for
    /// kinematic fields.
    pub smoother: f64,
}

impl BarnesParams {
    /// Build parameters from an average horizontal grid spacing, in km.
    pub fn from_grid_spacing(grid_spacing_km: f64, smoother: f64) -> Self {
        let falloff = 5.052 * (4.0 * grid_spacing_km / std::f64::consts::PI).powi(2);
        let cutoff_radius_km = (20.0 * falloff).sqrt();
        Self {
            falloff,
            cutoff_radius_km,
            smoother,
        }
    }

    fn weight(&self, dist_sq: f64, falloff: f64) -> f64 {
        (-dist_sq / falloff).exp()
    }
}

/// A single weighted pass of Barnes interpolation at one target point.
/// Returns `None` if no observation fell within the cutoff radius.
fn barnes_at_point(
    observations: &[Observation],
    target: (f64, f64, f64),
    params: &BarnesParams,
    falloff: f64,
) -> Option<f64> {
    let (tx, ty, tz) = target;
    let cutoff_sq = params.cutoff_radius_km * params.cutoff_radius_km;
    let mut weight_sum = 0.0;
    let mut value_sum = 0.0;
    for obs in observations {
        let dx = obs.x_km - tx;
        let dy = obs.y_km - ty;
        let dz = obs.z_km - tz;
        let dist_sq = dx * dx + dy * dy + dz * dz;
        if dist_sq > cutoff_sq {
            continue;
        }
        let w = params.weight(dist_sq, falloff);
        weight_sum += w;
        value_sum += w * obs.value;
    }
    if weight_sum <= 0.0 {
        None
    } else {
        Some(value_sum / weight_sum)
    }
}

/// First pass: Barnes-weighted average of `observations` at `target`.
pub fn first_pass(observations: &[Observation], target: (f64, f64, f64), params: &BarnesParams) -> Option<f64> {
    barnes_at_point(observations, target, params, params.falloff)
}

/// Residual of one observation against the first-pass grid's value at that
/// same location, used to build the second pass's correction field.
pub fn residual(observation: &Observation, first_pass_value: f64) -> Observation {
    Observation {
        x_km: observation.x_km,
        y_km: observation.y_km,
        z_km: observation.z_km,
        value: observation.value - first_pass_value,
    }
}

/// Second pass: Barnes-weighted average of the residual observations at
/// `target`, using the narrower `falloff * smoother` kernel.
pub fn second_pass(residuals: &[Observation], target: (f64, f64, f64), params: &BarnesParams) -> f64 {
    barnes_at_point(residuals, target, params, params.falloff * params.smoother).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_scale_with_spacing() {
        let tight = BarnesParams::from_grid_spacing(1.0, 1.0);
        let loose = BarnesParams::from_grid_spacing(2.0, 1.0);
        assert!(loose.falloff > tight.falloff);
        assert!(loose.cutoff_radius_km > tight.cutoff_radius_km);
    }

    #[test]
    fn first_pass_reproduces_constant_field() {
        let params = BarnesParams::from_grid_spacing(1.0, 1.0);
        let observations: Vec<Observation> = (-3..=3)
            .flat_map(|i| {
                (-3..=3).map(move |j| Observation {
                    x_km: i as f64,
                    y_km: j as f64,
                    z_km: 0.0,
                    value: 5.0,
                })
            })
            .collect();
        let v = first_pass(&observations, (0.0, 0.0, 0.0), &params).unwrap();
        assert!((v - 5.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_target_returns_none() {
        let params = BarnesParams::from_grid_spacing(1.0, 1.0);
        let observations = vec![Observation {
            x_km: 0.0,
            y_km: 0.0,
            z_km: 0.0,
            value: 5.0,
        }];
        assert!(first_pass(&observations, (1000.0, 1000.0, 1000.0), &params).is_none());
    }
}

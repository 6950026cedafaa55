//! Central pressure estimation via trapezoidal integration of the gradient
//! wind balance, anchored to a surface pressure observation at the profile's
//! outer radius (spec.md §4.5).

use crate::error::{ChooserError, Result};

/// Earth's rotation rate, rad/s.
const EARTH_OMEGA: f64 = 7.2921e-5;

fn coriolis_parameter(lat_deg: f64) -> f64 {
    2.0 * EARTH_OMEGA * lat_deg.to_radians().sin()
}

/// `dP/dr` at one profile point under gradient-wind balance: centrifugal
/// plus Coriolis acceleration times air density.
fn pressure_gradient(radius_m: f64, v_ms: f64, f: f64, rho: f64) -> f64 {
    rho * (v_ms * v_ms / radius_m + f.abs() * v_ms)
}

/// Integrate a tangential-wind profile (sorted by ascending radius, km and
/// m/s) inward from its outer radius to estimate central pressure, hPa,
/// given the observed pressure at the outer radius.
///
/// The innermost segment (0 to the first profile radius) is closed by
/// assuming solid-body rotation, i.e. the integrand grows linearly from
/// zero at the center — an approximation `original_source` makes implicitly
/// by starting its pressure integration at the innermost analyzed ring.
pub fn integrate_central_pressure(
    profile_km_ms: &[(f64, f64)],
    outer_pressure_hpa: f64,
    lat_deg: f64,
    rho: f64,
) -> Result<f64> {
    if profile_km_ms.is_empty() {
        return Err(ChooserError::EmptyProfile);
    }
    let f = coriolis_parameter(lat_deg);

    let mut points: Vec<(f64, f64)> = vec![(0.0, 0.0)];
    points.extend(profile_km_ms.iter().map(|&(r_km, v)| (r_km * 1000.0, v)));

    let mut deficit_pa = 0.0;
    for window in points.windows(2) {
        let (r0, v0) = window[0];
        let (r1, v1) = window[1];
        let g0 = if r0 <= 0.0 { 0.0 } else { pressure_gradient(r0, v0, f, rho) };
        let g1 = pressure_gradient(r1, v1, f, rho);
        let dr = r1 - r0;
        deficit_pa += 0.5 * (g0 + g1) * dr;
    }

    Ok(outer_pressure_hpa - deficit_pa / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stronger_vortex_yields_lower_central_pressure() {
        let weak = vec![(10.0, 10.0), (40.0, 5.0)];
        let strong = vec![(10.0, 50.0), (40.0, 20.0)];
        let p_weak = integrate_central_pressure(&weak, 1010.0, 25.0, 1.1).unwrap();
        let p_strong = integrate_central_pressure(&strong, 1010.0, 25.0, 1.1).unwrap();
        assert!(p_strong < p_weak);
    }

    #[test]
    fn empty_profile_is_an_error() {
        assert!(integrate_central_pressure(&[], 1010.0, 25.0, 1.1).is_err());
    }
}

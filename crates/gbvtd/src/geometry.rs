//! Radar-to-ring viewing geometry: the ψ angle between the local radial
//! (radar beam) direction and the ring's tangential direction at a given
//! ground-relative azimuth, per Lee, Jou, Chang & Marks (1999)'s GBVTD
//! formulation.

/// Distance (km) from the radar to the circulation center.
pub fn radar_to_center_distance(radar_x_km: f64, radar_y_km: f64, center_x_km: f64, center_y_km: f64) -> f64 {
    let dx = radar_x_km - center_x_km;
    let dy = radar_y_km - center_y_km;
    (dx * dx + dy * dy).sqrt()
}

/// Ground-relative bearing (radians, meteorological convention measured at
/// the center) from the center toward the radar.
pub fn radar_bearing_from_center(radar_x_km: f64, radar_y_km: f64, center_x_km: f64, center_y_km: f64) -> f64 {
    let dx = radar_x_km - center_x_km;
    let dy = radar_y_km - center_y_km;
    dx.atan2(dy)
}

/// ψ: the angle, at a ring point, between the line to the circulation
/// center and the line to the radar. `beta_rad` is the ground-relative
/// azimuth of the ring point measured from the center, relative to the
/// radar bearing (i.e. `beta = 0` means the point lies on the
/// center-radar baseline, on the near side).
///
/// Derived from the law of sines in the radar/center/point triangle: with
/// `rt` the radar-center distance and `r` the ring radius,
/// `sin(psi) = rt * sin(beta) / d`, where `d` is the radar-to-point range
/// recovered from the law of cosines.
pub fn psi_angle(rt_km: f64, ring_radius_km: f64, beta_rad: f64) -> f64 {
    let d = (rt_km * rt_km + ring_radius_km * ring_radius_km
        - 2.0 * rt_km * ring_radius_km * beta_rad.cos())
    .sqrt();
    if d <= 0.0 {
        return 0.0;
    }
    (rt_km * beta_rad.sin() / d).asin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn psi_is_zero_on_the_baseline() {
        let psi = psi_angle(100.0, 20.0, 0.0);
        assert!(psi.abs() < 1e-9);
    }

    #[test]
    fn psi_grows_with_beta_near_quarter_circle() {
        let psi_small = psi_angle(100.0, 20.0, 0.1);
        let psi_large = psi_angle(100.0, 20.0, FRAC_PI_2);
        assert!(psi_large.abs() > psi_small.abs());
    }
}

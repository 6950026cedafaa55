//! Synthetic radar volume generators built from an independently-derived
//! analytic vortex model (not ported from `original_source`'s analytic
//! storm code, whose sign conventions are unreliable — see the open
//! question this choice resolves).
//!
//! The model is a Rankine combined vortex: tangential wind rises linearly
//! to `vmax` at the radius of maximum wind, then decays as a power law
//! beyond it. A uniform translation can be superimposed. Radial velocity at
//! a point is the projection of the total (tangential + translation) wind
//! vector onto the radar-to-point line of sight.

use chrono::{DateTime, Utc};
use vortrac_core::{GateArray, RadarPosition, RadarVolume, Ray, Sweep};

/// Parameters for a Rankine combined vortex.
#[derive(Debug, Clone, Copy)]
pub struct VortexModel {
    pub center_x_km: f64,
    pub center_y_km: f64,
    pub rmw_km: f64,
    pub vmax_ms: f64,
    /// Power-law decay exponent outside the RMW (typically 0.5-0.7).
    pub decay_alpha: f64,
    /// Uniform storm translation, m/s, (east, north).
    pub translation_ms: (f64, f64),
}

impl VortexModel {
    /// Tangential wind speed at radius `r_km` from the center.
    pub fn tangential_wind(&self, r_km: f64) -> f64 {
        if r_km <= 0.0 {
            0.0
        } else if r_km <= self.rmw_km {
            self.vmax_ms * (r_km / self.rmw_km)
        } else {
            self.vmax_ms * (self.rmw_km / r_km).powf(self.decay_alpha)
        }
    }

    /// Total wind vector (east, north) m/s at a ground point, tangential
    /// component plus the uniform translation.
    pub fn wind_vector(&self, x_km: f64, y_km: f64) -> (f64, f64) {
        let dx = x_km - self.center_x_km;
        let dy = y_km - self.center_y_km;
        let r = (dx * dx + dy * dy).sqrt();
        if r < 1e-6 {
            return self.translation_ms;
        }
        let vt = self.tangential_wind(r);
        // Cyclonic (counterclockwise in a north-up, east-right frame):
        // tangential unit vector is the radial unit vector rotated +90°.
        let (ux, uy) = (dx / r, dy / r);
        let (tx, ty) = (-uy, ux);
        (vt * tx + self.translation_ms.0, vt * ty + self.translation_ms.1)
    }

    /// Radial velocity (m/s, positive away from the radar) a radar at
    /// `(radar_x_km, radar_y_km)` would measure at ground point
    /// `(x_km, y_km)`.
    pub fn radial_velocity(&self, radar_x_km: f64, radar_y_km: f64, x_km: f64, y_km: f64) -> f64 {
        let (wx, wy) = self.wind_vector(x_km, y_km);
        let dx = x_km - radar_x_km;
        let dy = y_km - radar_y_km;
        let range = (dx * dx + dy * dy).sqrt();
        if range < 1e-6 {
            return 0.0;
        }
        (wx * dx + wy * dy) / range
    }
}

/// Build a single-sweep synthetic radar volume sampling `model`'s radial
/// velocity field at `elevation_deg`, with uniform reflectivity.
pub fn synthetic_volume(
    radar_name: &str,
    radar_position: RadarPosition,
    time: DateTime<Utc>,
    model: &VortexModel,
    elevation_deg: f64,
    max_range_km: f64,
    gate_spacing_m: f64,
    reflectivity_dbz: f32,
) -> RadarVolume {
    let num_gates = (max_range_km * 1000.0 / gate_spacing_m) as usize;
    let mut rays = Vec::with_capacity(360);
    for az in 0..360 {
        let az_rad = (az as f64).to_radians();
        let elevation_cos = elevation_deg.to_radians().cos();
        let mut velocities = Vec::with_capacity(num_gates);
        let mut reflectivities = Vec::with_capacity(num_gates);
        for gate in 0..num_gates {
            let slant_range_km = (gate as f64 * gate_spacing_m) / 1000.0;
            let ground_range_km = slant_range_km * elevation_cos;
            let x_km = ground_range_km * az_rad.sin();
            let y_km = ground_range_km * az_rad.cos();
            let vr = model.radial_velocity(0.0, 0.0, x_km, y_km);
            velocities.push(vr as f32);
            reflectivities.push(reflectivity_dbz);
        }
        let velocity_gates = GateArray::new(0.0, gate_spacing_m, velocities);
        let reflectivity_gates = GateArray::new(0.0, gate_spacing_m, reflectivities);
        rays.push(Ray::new(
            elevation_deg,
            az as f64,
            reflectivity_gates,
            velocity_gates,
            GateArray::empty(),
        ));
    }
    let sweep = Sweep::new(elevation_deg, 26.0, 21, 0, rays.len() - 1);
    RadarVolume::new(radar_name, radar_position, time, vec![sweep], rays).expect("synthetic volume is well-formed")
}

/// An all-sentinel volume: every velocity and reflectivity gate is missing.
/// Used by the null-volume scenario (spec.md §8, S3).
pub fn null_volume(radar_name: &str, radar_position: RadarPosition, time: DateTime<Utc>) -> RadarVolume {
    let gates = GateArray::new(0.0, 250.0, vec![-999.0; 400]);
    let empty = GateArray::empty();
    let rays: Vec<Ray> = (0..360)
        .map(|az| Ray::new(0.5, az as f64, gates.clone(), gates.clone(), empty.clone()))
        .collect();
    let sweep = Sweep::new(0.5, 26.0, 21, 0, rays.len() - 1);
    RadarVolume::new(radar_name, radar_position, time, vec![sweep], rays).expect("null volume is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tangential_wind_peaks_at_rmw() {
        let model = VortexModel {
            center_x_km: 0.0,
            center_y_km: 0.0,
            rmw_km: 20.0,
            vmax_ms: 50.0,
            decay_alpha: 0.5,
            translation_ms: (0.0, 0.0),
        };
        assert!((model.tangential_wind(20.0) - 50.0).abs() < 1e-9);
        assert!(model.tangential_wind(10.0) < 50.0);
        assert!(model.tangential_wind(40.0) < 50.0);
    }

    #[test]
    fn radial_velocity_is_zero_at_the_storm_center_with_no_translation() {
        let model = VortexModel {
            center_x_km: 0.0,
            center_y_km: 0.0,
            rmw_km: 20.0,
            vmax_ms: 50.0,
            decay_alpha: 0.5,
            translation_ms: (0.0, 0.0),
        };
        assert!((model.radial_velocity(-100.0, 0.0, 0.0, 0.0)).abs() < 1e-9);
    }

    #[test]
    fn synthetic_volume_has_one_sweep_per_elevation() {
        let volume = synthetic_volume(
            "KAMX",
            RadarPosition {
                lat: 25.0,
                lon: -80.0,
                alt_km: 0.01,
            },
            Utc::now(),
            &VortexModel {
                center_x_km: 30.0,
                center_y_km: 0.0,
                rmw_km: 20.0,
                vmax_ms: 40.0,
                decay_alpha: 0.5,
                translation_ms: (2.0, 0.0),
            },
            0.5,
            100.0,
            250.0,
            20.0,
        );
        assert_eq!(volume.sweeps().len(), 1);
        assert_eq!(volume.rays().len(), 360);
    }
}

//! Scenario fixtures for the end-to-end pipeline tests (spec.md §8,
//! scenarios S1-S6).
//!
//! Each `scenario_*` function builds the inputs a test needs; the test
//! itself drives the pipeline crates and checks the expected outcome, so
//! these stay plain data builders rather than assertions.

use chrono::{DateTime, TimeZone, Utc};
use vortrac_core::RadarPosition;

use crate::generators::{null_volume, synthetic_volume, VortexModel};

/// `KAMX`'s real position, used across every scenario so radar-to-center
/// geometry is representative rather than degenerate.
pub fn kamx_position() -> RadarPosition {
    RadarPosition {
        lat: 25.611,
        lon: -80.413,
        alt_km: 0.004,
    }
}

fn scenario_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2005, 8, 25, 6, 8, 0).unwrap()
}

/// S1: single-ring, zero environmental wind, VTC0=30 m/s at r=20 km,
/// center at the origin.
pub fn scenario_s1_single_ring() -> vortrac_core::RadarVolume {
    let model = VortexModel {
        center_x_km: 0.0,
        center_y_km: 0.0,
        rmw_km: 20.0,
        vmax_ms: 30.0,
        decay_alpha: 0.5,
        translation_ms: (0.0, 0.0),
    };
    synthetic_volume(
        "KAMX",
        kamx_position(),
        scenario_time(),
        &model,
        0.5,
        100.0,
        250.0,
        25.0,
    )
}

/// S2: as S1, with a 10 m/s environmental wind from 180° (i.e. blowing
/// toward the north) superimposed as a uniform translation.
pub fn scenario_s2_with_environmental_wind() -> vortrac_core::RadarVolume {
    let model = VortexModel {
        center_x_km: 0.0,
        center_y_km: 0.0,
        rmw_km: 20.0,
        vmax_ms: 30.0,
        decay_alpha: 0.5,
        translation_ms: (0.0, 10.0),
    };
    synthetic_volume(
        "KAMX",
        kamx_position(),
        scenario_time(),
        &model,
        0.5,
        100.0,
        250.0,
        25.0,
    )
}

/// S3: a null volume, every reflectivity and velocity gate missing.
pub fn scenario_s3_null_volume() -> vortrac_core::RadarVolume {
    null_volume("KAMX", kamx_position(), scenario_time())
}

/// S4: two consecutive volumes six minutes apart, identical synthetic
/// storms shifted by (2 km, 0).
pub fn scenario_s4_shifted_storm_pair() -> (vortrac_core::RadarVolume, vortrac_core::RadarVolume) {
    let first_time = scenario_time();
    let second_time = first_time + chrono::Duration::minutes(6);

    let first_model = VortexModel {
        center_x_km: 0.0,
        center_y_km: 0.0,
        rmw_km: 20.0,
        vmax_ms: 35.0,
        decay_alpha: 0.5,
        translation_ms: (0.0, 0.0),
    };
    let second_model = VortexModel {
        center_x_km: 2.0,
        center_y_km: 0.0,
        ..first_model
    };

    let first = synthetic_volume("KAMX", kamx_position(), first_time, &first_model, 0.5, 100.0, 250.0, 25.0);
    let second = synthetic_volume("KAMX", kamx_position(), second_time, &second_model, 0.5, 100.0, 250.0, 25.0);
    (first, second)
}

/// S5: a discoverable filename and the enqueue window it should (and
/// should not) fall inside.
pub struct FilenameWindowCase {
    pub filename: &'static str,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub expect_enqueued: bool,
}

pub fn scenario_s5_filename_window_cases() -> Vec<FilenameWindowCase> {
    let in_window_start = Utc.with_ymd_and_hms(2005, 8, 25, 6, 0, 0).unwrap();
    let in_window_end = Utc.with_ymd_and_hms(2005, 8, 25, 7, 0, 0).unwrap();
    vec![
        FilenameWindowCase {
            filename: "KAMX_20050825_0608.nc",
            window_start: in_window_start,
            window_end: in_window_end,
            expect_enqueued: true,
        },
        FilenameWindowCase {
            filename: "KAMX_20050825_0608.nc",
            window_start: Utc.with_ymd_and_hms(2005, 8, 25, 8, 0, 0).unwrap(),
            window_end: Utc.with_ymd_and_hms(2005, 8, 25, 9, 0, 0).unwrap(),
            expect_enqueued: false,
        },
    ]
}

/// S6: the analytic wavenumber-0 tangential wind profile used for the
/// pressure-deficit numeric check, VTC0(r) = 30*exp(-((r-20)/10)^2) m/s.
pub fn scenario_s6_vtc0_profile(radii_km: &[f64]) -> Vec<(f64, f64)> {
    radii_km
        .iter()
        .map(|&r| {
            let vt = 30.0 * (-((r - 20.0) / 10.0).powi(2)).exp();
            (r, vt)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_volume_has_full_azimuth_coverage() {
        let volume = scenario_s1_single_ring();
        assert_eq!(volume.rays().len(), 360);
    }

    #[test]
    fn s4_pair_is_six_minutes_apart() {
        let (first, second) = scenario_s4_shifted_storm_pair();
        assert_eq!((second.time() - first.time()).num_minutes(), 6);
    }

    #[test]
    fn s6_profile_peaks_at_twenty_km() {
        let profile = scenario_s6_vtc0_profile(&[10.0, 20.0, 30.0]);
        let (_, vt_at_rmw) = profile[1];
        assert!((vt_at_rmw - 30.0).abs() < 1e-9);
        assert!(profile[0].1 < vt_at_rmw);
        assert!(profile[2].1 < vt_at_rmw);
    }
}

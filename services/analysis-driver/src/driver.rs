//! `AnalysisDriver`: the eight-step per-volume orchestration (spec.md §4.6).
//!
//! Grounded on `original_source/trunk/Threads/workThread.h`'s `runOnce`-style
//! decomposition (grid, search, choose, fit, solve, publish) and
//! `PollThread.h`'s center-guess bookkeeping between cycles. This module
//! owns the only mutable state that spans cycles: the running
//! [`CenterGuessTrack`] and the prior cycle's per-level chosen centers used
//! for GBVTD continuity scoring.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, instrument, warn};
use vortrac_core::{
    location_from_offset, relative_location_km, AtcfRecord, CenterGuessTrack, ClosureAssumption, FieldName,
    GriddedField, PressureObservation, RadarPosition, RadarVolume, SimplexRecord, VortexRecord,
};

use gridder::grid_volume;
use ingestion::config::AnalysisConfig;

use crate::grid_geometry::{build_grid_spec, smoother_config};
use crate::ring_sampling::ring_samples_at;
use crate::search::{closure_assumption, max_gap_deg, max_wavenumber, search_lattice, simplex_config};

/// Azimuth spacing used when sampling rings for the GBVTD fit, matching
/// `original_source`'s one-degree ring resolution.
const AZIMUTH_STEP_DEG: f64 = 1.0;

/// Fallback central pressure (hPa) used when no plausible surface
/// observation is available within the configured time window (spec.md
/// §4.5 edge case: "or a climatological envelope value if none available").
const CLIMATOLOGICAL_OUTER_PRESSURE_HPA: f64 = 1010.0;

/// Everything one `run_cycle` call produces: the published record plus the
/// per-(level,radius) search records that must be persisted alongside it.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub vortex_record: VortexRecord,
    pub simplex_records: Vec<SimplexRecord>,
    /// `true` if the cycle stopped early because `abort` was set; the
    /// caller should treat the returned records as a partial result, not a
    /// finished analysis (spec.md §5 cancellation semantics).
    pub cancelled: bool,
}

/// The driver's cross-cycle state and configuration.
pub struct AnalysisDriver {
    config: AnalysisConfig,
    radar_position: RadarPosition,
    guess_track: vortrac_core::CenterGuessTrack,
    /// Prior cycle's chosen center per level, keyed by height rounded to the
    /// nearest meter so float comparison across cycles is exact. Used for
    /// the center chooser's continuity penalty (spec.md §4.4: "continuity is
    /// measured against the previous volume's chosen (level, ring)").
    prior_level_centers: BTreeMap<i64, (f64, f64)>,
}

fn height_key(height_km: f64) -> i64 {
    (height_km * 1000.0).round() as i64
}

/// Center-chooser weights from the optional `choosecenter` config section,
/// falling back to the defaults when the cycle's document doesn't set one.
fn score_weights(config: &AnalysisConfig) -> center_chooser::ScoreWeights {
    match &config.choosecenter {
        Some(c) => center_chooser::ScoreWeights {
            w_std: c.w_std,
            w_count: c.w_count,
            w_vt: c.w_vt,
            w_peak: c.w_peak,
            w_persistence: c.w_persistence,
        },
        None => center_chooser::ScoreWeights::default(),
    }
}

impl AnalysisDriver {
    pub fn new(config: AnalysisConfig) -> Self {
        let radar_position = RadarPosition {
            lat: config.radar.lat,
            lon: config.radar.lon,
            alt_km: config.radar.alt / 1000.0,
        };
        Self {
            config,
            radar_position,
            guess_track: CenterGuessTrack::new(),
            prior_level_centers: BTreeMap::new(),
        }
    }

    /// Seed the guess track from an ATCF best-track fix, ahead of the first
    /// volume (spec.md §4.6 step 1).
    pub fn seed_from_atcf(&mut self, record: &AtcfRecord) {
        self.guess_track.push_atcf(record);
    }

    fn best_guess_km(&self, at: chrono::DateTime<chrono::Utc>) -> (f64, f64) {
        match self.guess_track.extrapolate(at) {
            Some((lat, lon)) => relative_location_km(self.radar_position.lat, self.radar_position.lon, lat, lon),
            // No ATCF seed and no prior cycle yet: start the search centered
            // on the radar itself (spec.md §4.6 leaves the very first guess
            // unspecified when no external seed is configured).
            None => (0.0, 0.0),
        }
    }

    fn ring_objective<'a>(
        field: &'a GriddedField,
        height_km: f64,
        radius_km: f64,
        gap_deg: f64,
        closure: ClosureAssumption,
        max_wavenumber: usize,
    ) -> impl Fn(f64, f64) -> simplex::ObjectiveOutcome + Sync + 'a {
        move |x: f64, y: f64| {
            if field.is_out_of_cappi(x, y, height_km) {
                return simplex::ObjectiveOutcome::OutOfCappi;
            }
            let samples = ring_samples_at(field, FieldName::Velocity, x, y, height_km, radius_km, AZIMUTH_STEP_DEG);
            match gbvtd::fit_ring(&samples, 0.0, 0.0, x, y, radius_km, closure, max_wavenumber, gap_deg) {
                Ok(coeffs) => simplex::ObjectiveOutcome::Value(coeffs.vtc0),
                Err(_) => simplex::ObjectiveOutcome::RingFitFailed,
            }
        }
    }

    /// Run the full eight-step cycle for one volume.
    #[instrument(skip(self, volume, pressure_obs, abort), fields(radar = volume.radar_name(), time = %volume.time()))]
    pub fn run_cycle(&mut self, volume: &RadarVolume, pressure_obs: &[PressureObservation], abort: &AtomicBool) -> CycleOutcome {
        // Step 1: best-guess center.
        let (guess_x, guess_y) = self.best_guess_km(volume.time());

        // Step 2: grid the volume.
        let spec = build_grid_spec(&self.config.cappi, self.config.center.bottomlevel, guess_x, guess_y);
        let field = match grid_volume(volume, &spec, &smoother_config()) {
            Ok(field) => field,
            Err(err) => {
                warn!(error = %err, "gridder failed this volume, publishing a null record");
                return CycleOutcome {
                    vortex_record: self.null_record(volume, guess_x, guess_y),
                    simplex_records: Vec::new(),
                    cancelled: false,
                };
            }
        };

        let closure = closure_assumption(&self.config.center);

        // Step 3: simplex search over every configured (level, radius).
        let mut simplex_records = Vec::new();
        let mut cancelled = false;
        for cell in search_lattice(&self.config.center) {
            if abort.load(Ordering::Relaxed) {
                info!("cancellation observed at the (level, ring) boundary, unwinding");
                cancelled = true;
                break;
            }
            let gap_deg = max_gap_deg(&self.config.center, cell.radius_km);
            let objective = Self::ring_objective(
                &field,
                cell.height_km,
                cell.radius_km,
                gap_deg,
                closure,
                max_wavenumber(&self.config.center),
            );
            let record = simplex::find_center(
                objective,
                (guess_x, guess_y),
                &simplex_config(&self.config.center),
                cell.height_km,
                cell.radius_km,
            );
            // Step 4: persist every simplex record, regardless of outcome
            // (spec.md §7: SimplexList exists for restart continuity).
            simplex_records.push(record);
        }

        if cancelled {
            return CycleOutcome {
                vortex_record: self.null_record(volume, guess_x, guess_y),
                simplex_records,
                cancelled: true,
            };
        }

        // Step 5: choose a center per level.
        let mut levels: Vec<f64> = simplex_records.iter().map(|r| r.height_km).collect();
        levels.sort_by(|a, b| a.partial_cmp(b).unwrap());
        levels.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

        let mut record = VortexRecord::new(volume.time(), volume.radar_name());
        let mut chosen_by_level: BTreeMap<i64, center_chooser::ChosenCenter> = BTreeMap::new();
        let weights = score_weights(&self.config);

        for height_km in levels {
            let at_level: Vec<SimplexRecord> = simplex_records
                .iter()
                .filter(|r| (r.height_km - height_km).abs() < 1e-9)
                .cloned()
                .collect();
            let prior = self.prior_level_centers.get(&height_key(height_km)).copied();
            match center_chooser::choose_center(&at_level, prior, &weights) {
                Ok(chosen) => {
                    record.heights_km.push(chosen.height_km);
                    record.centers_km.push((chosen.x_km, chosen.y_km));
                    record.max_vtc0_ms.push(chosen.vtc0_ms);
                    record.rmw_km.push(chosen.radius_km);
                    chosen_by_level.insert(height_key(height_km), chosen);
                }
                Err(_) => {
                    warn!(height_km, "no center found at this level");
                }
            }
        }

        if chosen_by_level.is_empty() {
            info!("no center found at any level, publishing a null record");
            let null = self.null_record(volume, guess_x, guess_y);
            return CycleOutcome {
                vortex_record: null,
                simplex_records,
                cancelled: false,
            };
        }

        self.prior_level_centers = chosen_by_level
            .iter()
            .map(|(&k, c)| (k, (c.x_km, c.y_km)))
            .collect();

        // Step 6: full wind profile at the reference level (the lowest-fit
        // band boundary when `choosecenter` is configured, otherwise the
        // lowest chosen level).
        let reference_level = self
            .config
            .choosecenter
            .as_ref()
            .map(|c| c.lower_fit_level)
            .unwrap_or(self.config.center.bottomlevel);
        let reference_center = chosen_by_level
            .values()
            .min_by(|a, b| (a.height_km - reference_level).abs().partial_cmp(&(b.height_km - reference_level).abs()).unwrap())
            .copied()
            .unwrap();

        let mut profile = Vec::new();
        let mut radius_km = self.config.center.innerradius;
        while radius_km <= self.config.center.outerradius + 1e-9 {
            let samples = ring_samples_at(
                &field,
                FieldName::Velocity,
                reference_center.x_km,
                reference_center.y_km,
                reference_center.height_km,
                radius_km,
                AZIMUTH_STEP_DEG,
            );
            let gap_deg = max_gap_deg(&self.config.center, radius_km);
            if let Ok(coeffs) = gbvtd::fit_ring(
                &samples,
                0.0,
                0.0,
                reference_center.x_km,
                reference_center.y_km,
                radius_km,
                closure,
                max_wavenumber(&self.config.center),
                gap_deg,
            ) {
                profile.push((radius_km, coeffs.vtc0));
            }
            radius_km += self.config.center.ringwidth;
        }

        // Step 7: pressure solver.
        let (center_lat, center_lon) =
            location_from_offset(self.radar_position.lat, self.radar_position.lon, reference_center.x_km, reference_center.y_km);
        let outer_pressure = nearest_pressure_hpa(pressure_obs, volume.time(), self.config.pressure.time_window_s, center_lat, center_lon)
            .unwrap_or(CLIMATOLOGICAL_OUTER_PRESSURE_HPA);
        record.central_pressure_hpa = if profile.is_empty() {
            None
        } else {
            center_chooser::integrate_central_pressure(&profile, outer_pressure, center_lat, self.config.pressure.rho).ok()
        };

        // Feed this cycle's own result back into the guess track so the next
        // cycle's step 1 extrapolates from it rather than the ATCF seed
        // (spec.md §4.6: "best-guess center ... or extrapolated from the
        // previous VortexRecord").
        if let Some((cx, cy)) = record.lowest_level_center() {
            let (lat, lon) = location_from_offset(self.radar_position.lat, self.radar_position.lon, cx, cy);
            self.guess_track.push(volume.time(), lat, lon);
        }

        // Step 8 (publish) is the caller's responsibility; `run_cycle`
        // hands back the finished record for the publish task to persist.
        CycleOutcome {
            vortex_record: record,
            simplex_records,
            cancelled: false,
        }
    }

    fn null_record(&self, volume: &RadarVolume, guess_x: f64, guess_y: f64) -> VortexRecord {
        let mut record = VortexRecord::new(volume.time(), volume.radar_name());
        record.heights_km.push(self.config.center.bottomlevel);
        record.centers_km.push((guess_x, guess_y));
        record.max_vtc0_ms.push(0.0);
        record.rmw_km.push(0.0);
        record
    }
}

/// Nearest-in-time, plausible surface pressure observation within
/// `time_window_s` of `at`, preferring the station closest to
/// `(center_lat, center_lon)` among those that qualify.
fn nearest_pressure_hpa(
    observations: &[PressureObservation],
    at: chrono::DateTime<chrono::Utc>,
    time_window_s: i64,
    center_lat: f64,
    center_lon: f64,
) -> Option<f64> {
    observations
        .iter()
        .filter(|obs| obs.is_plausible())
        .filter(|obs| (obs.time - at).num_seconds().abs() <= time_window_s)
        .min_by(|a, b| {
            let da = relative_location_km(center_lat, center_lon, a.lat, a.lon);
            let db = relative_location_km(center_lat, center_lon, b.lat, b.lon);
            let dist_a = (da.0 * da.0 + da.1 * da.1).sqrt();
            let dist_b = (db.0 * db.0 + db.1 * db.1).sqrt();
            dist_a.partial_cmp(&dist_b).unwrap()
        })
        .map(|obs| obs.sea_level_pressure_hpa)
}

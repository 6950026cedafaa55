//! Translates the YAML `center` section into the lattice of (height,
//! radius) pairs the simplex stage searches, and the `simplex::SimplexConfig`
//! knobs that drive each individual search (spec.md §4.3, §6).

use ingestion::config::CenterConfig;
use simplex::SimplexConfig;
use vortrac_core::ClosureAssumption;

/// One (height, radius) ring to search during a cycle.
#[derive(Debug, Clone, Copy)]
pub struct SearchCell {
    pub height_km: f64,
    pub radius_km: f64,
}

/// Every height/radius combination the `center` config asks the driver to
/// search this cycle, height-major so the driver can group simplex records
/// by level once the inner loop finishes.
pub fn search_lattice(config: &CenterConfig) -> Vec<SearchCell> {
    let mut cells = Vec::new();
    let mut height_km = config.bottomlevel;
    while height_km <= config.toplevel + 1e-9 {
        let mut radius_km = config.innerradius;
        while radius_km <= config.outerradius + 1e-9 {
            cells.push(SearchCell { height_km, radius_km });
            radius_km += config.ringwidth;
        }
        height_km += 1.0;
    }
    cells
}

/// `SimplexConfig` derived from the `center` section. `original_source` used
/// a square grid of `numpoints` seeds spanning `boxdiameter`; the spacing
/// between seeds falls out of those two numbers directly.
pub fn simplex_config(config: &CenterConfig) -> SimplexConfig {
    let side = (config.numpoints as f64).sqrt().round().max(1.0);
    SimplexConfig {
        num_seeds: config.numpoints,
        seed_spacing_km: config.boxdiameter / side,
        initial_edge_km: config.influenceradius,
        epsilon: config.convergence,
        max_plausible_vt_ms: 100.0,
        max_iterations: config.maxiterations,
    }
}

/// The largest tolerated azimuthal gap for a given ring radius, from the
/// `center.maxdatagap` map (keyed by radius in km as a string, matching the
/// YAML document's own key style); falls back to
/// [`gbvtd::DEFAULT_MAX_GAP_DEG`] when the map has no entry for this radius.
pub fn max_gap_deg(config: &CenterConfig, radius_km: f64) -> f64 {
    config
        .maxdatagap
        .get(&format!("{radius_km}"))
        .copied()
        .unwrap_or(gbvtd::DEFAULT_MAX_GAP_DEG)
}

/// Closure assumption used for every ring fit. `maxwavenumber` in the
/// `center` section instead governs the adaptive tangential-wavenumber
/// reduction inside `gbvtd::fit_ring` (spec.md §4.2), so every ring solves
/// for radial wind wavenumber-1 directly.
pub fn closure_assumption(_config: &CenterConfig) -> ClosureAssumption {
    ClosureAssumption::Gbvtd
}

/// Ceiling on tangential/radial wavenumber the adaptive `fit_ring` reduction
/// may fit, from the `center.maxwavenumber` config key.
pub fn max_wavenumber(config: &CenterConfig) -> usize {
    config.maxwavenumber
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> CenterConfig {
        CenterConfig {
            bottomlevel: 1.0,
            toplevel: 3.0,
            innerradius: 10.0,
            outerradius: 30.0,
            ringwidth: 10.0,
            boxdiameter: 6.0,
            numpoints: 25,
            influenceradius: 0.5,
            convergence: 1e-4,
            maxiterations: 200,
            maxwavenumber: 1,
            maxdatagap: HashMap::new(),
        }
    }

    #[test]
    fn lattice_covers_every_level_and_radius() {
        let cells = search_lattice(&config());
        assert_eq!(cells.len(), 3 * 3);
        assert!(cells.iter().any(|c| (c.height_km - 1.0).abs() < 1e-9 && (c.radius_km - 10.0).abs() < 1e-9));
        assert!(cells.iter().any(|c| (c.height_km - 3.0).abs() < 1e-9 && (c.radius_km - 30.0).abs() < 1e-9));
    }

    #[test]
    fn simplex_config_derives_spacing_from_box_and_points() {
        let cfg = simplex_config(&config());
        assert_eq!(cfg.num_seeds, 25);
        assert!((cfg.seed_spacing_km - 1.2).abs() < 1e-9);
    }

    #[test]
    fn missing_gap_entry_falls_back_to_default() {
        assert!((max_gap_deg(&config(), 10.0) - gbvtd::DEFAULT_MAX_GAP_DEG).abs() < 1e-9);
    }
}

//! Builds a [`gridder::GridSpec`] for one analysis cycle, centered on the
//! cycle's best-guess storm location rather than the radar.
//!
//! `gridder::observations_for` places every ray observation in a single,
//! fixed Cartesian frame with the radar at the origin (spec.md §4.1); this
//! module only chooses which window of that frame a cycle's CAPPI covers, by
//! picking a [`vortrac_core::GridOrigin`] offset so the guessed center lands
//! near the middle of the grid.

use gridder::{GridSpec, SmootherConfig};
use ingestion::config::CappiConfig;
use vortrac_core::{GridDims, GridOrigin, GridSpacing};

/// Build the CAPPI grid spec for a cycle whose best-guess center (relative
/// to the radar, km) is `(guess_x_km, guess_y_km)`.
pub fn build_grid_spec(cappi: &CappiConfig, bottom_level_km: f64, guess_x_km: f64, guess_y_km: f64) -> GridSpec {
    let dims = GridDims {
        i_dim: cappi.xdim,
        j_dim: cappi.ydim,
        k_dim: cappi.zdim,
    };
    let spacing = GridSpacing {
        i_sp: cappi.xgridsp,
        j_sp: cappi.ygridsp,
        k_sp: cappi.zgridsp,
    };
    let origin = GridOrigin {
        xmin: guess_x_km - (dims.i_dim as f64 / 2.0) * spacing.i_sp,
        ymin: guess_y_km - (dims.j_dim as f64 / 2.0) * spacing.j_sp,
        zmin: bottom_level_km,
    };
    GridSpec { dims, spacing, origin }
}

/// Smoother weights the driver applies to every cycle; matches
/// `SmootherConfig::default()`, kept as a named function so a future config
/// key can override it without changing call sites.
pub fn smoother_config() -> SmootherConfig {
    SmootherConfig::default()
}

//! Seed-grid placement for the simplex search.
//!
//! Grounded on `original_source/tags/1.0-alpha/Threads/SimplexThread.cpp`,
//! which lays `numPoints` seeds out in a square of side `sqrt(numPoints)`
//! centered on the first guess, then builds an equilateral initial simplex
//! around each seed using unit offsets at 90°, 210° and 330°
//! (`sqr32 = sin(60°) = 0.866025`).

use crate::error::{Result, SimplexError};

/// sin(60°), the standard Nelder-Mead equilateral-triangle offset constant
/// used by the original solver to build each seed's initial simplex.
pub const SQRT3_OVER_2: f64 = 0.866_025_403_784_438_6;

/// Center points of a `side x side` square seed grid, spaced `spacing_km`
/// apart and centered on `(center_x_km, center_y_km)`.
pub fn seed_grid(center_x_km: f64, center_y_km: f64, num_points: usize, spacing_km: f64) -> Result<Vec<(f64, f64)>> {
    let side = (num_points as f64).sqrt();
    if side.fract().abs() > 1e-9 {
        return Err(SimplexError::SeedCountNotSquare(num_points));
    }
    let side = side.round() as usize;
    let half = (side as f64 - 1.0) / 2.0;
    let mut seeds = Vec::with_capacity(num_points);
    for row in 0..side {
        for col in 0..side {
            let x = center_x_km + (col as f64 - half) * spacing_km;
            let y = center_y_km + (row as f64 - half) * spacing_km;
            seeds.push((x, y));
        }
    }
    Ok(seeds)
}

/// Initial equilateral-triangle simplex vertices around a seed point, at
/// unit radius `edge_km`, offset at 90°, 210° and 330° (matching the
/// original's vertex placement).
pub fn initial_simplex(seed_x_km: f64, seed_y_km: f64, edge_km: f64) -> [(f64, f64); 3] {
    let angles_deg = [90.0_f64, 210.0, 330.0];
    let mut vertices = [(0.0, 0.0); 3];
    for (idx, angle) in angles_deg.iter().enumerate() {
        let rad = angle.to_radians();
        vertices[idx] = (
            seed_x_km + edge_km * rad.cos(),
            seed_y_km + edge_km * rad.sin(),
        );
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_grid_rejects_non_square_counts() {
        assert!(seed_grid(0.0, 0.0, 10, 1.0).is_err());
    }

    #[test]
    fn seed_grid_centers_on_requested_point() {
        let seeds = seed_grid(5.0, 5.0, 9, 2.0).unwrap();
        assert_eq!(seeds.len(), 9);
        assert!(seeds.contains(&(5.0, 5.0)));
    }

    #[test]
    fn initial_simplex_has_three_distinct_vertices() {
        let verts = initial_simplex(0.0, 0.0, 1.0);
        assert_ne!(verts[0], verts[1]);
        assert_ne!(verts[1], verts[2]);
    }
}

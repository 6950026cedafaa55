//! `GriddedField`: a regular 3-D Cartesian scalar field with polar-sampling
//! services around a movable reference point (spec.md §3, §4.1).

use crate::error::{CoreError, Result};
use crate::sentinel::{Sample, SENTINEL};

/// The three named planes a `GriddedField` carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Reflectivity,
    Velocity,
    SpectralWidth,
}

impl FieldName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Reflectivity => "reflectivity",
            FieldName::Velocity => "velocity",
            FieldName::SpectralWidth => "spectralWidth",
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "reflectivity" => Ok(FieldName::Reflectivity),
            "velocity" => Ok(FieldName::Velocity),
            "spectralWidth" => Ok(FieldName::SpectralWidth),
            other => Err(CoreError::UnknownField(other.to_string())),
        }
    }
}

/// Dimensions of a `GriddedField`.
#[derive(Debug, Clone, Copy)]
pub struct GridDims {
    pub i_dim: usize,
    pub j_dim: usize,
    pub k_dim: usize,
}

impl GridDims {
    pub fn len(&self) -> usize {
        self.i_dim * self.j_dim * self.k_dim
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Grid spacing, in km, along each axis.
#[derive(Debug, Clone, Copy)]
pub struct GridSpacing {
    pub i_sp: f64,
    pub j_sp: f64,
    pub k_sp: f64,
}

/// Min corner of the grid, in km relative to the earth-fixed reference used
/// to build it.
#[derive(Debug, Clone, Copy)]
pub struct GridOrigin {
    pub xmin: f64,
    pub ymin: f64,
    pub zmin: f64,
}

/// One (azimuth, value) sample taken around a ring at fixed radius/height.
#[derive(Debug, Clone, Copy)]
pub struct RingSample {
    /// Meteorological azimuth, degrees clockwise from north, measured from
    /// the ring's *reference point* (the candidate vortex center), not the
    /// radar.
    pub azimuth_deg: f64,
    pub sample: Sample,
}

/// A regular 3-D Cartesian field produced by the gridder, plus a movable
/// reference point used by the simplex/GBVTD stages' polar queries.
#[derive(Debug, Clone)]
pub struct GriddedField {
    dims: GridDims,
    spacing: GridSpacing,
    origin: GridOrigin,
    reflectivity: Vec<f32>,
    velocity: Vec<f32>,
    spectral_width: Vec<f32>,
    /// (x, y, z) in km, relative to the same origin as `origin`.
    reference_point: Option<(f64, f64, f64)>,
}

impl GriddedField {
    pub fn new(dims: GridDims, spacing: GridSpacing, origin: GridOrigin) -> Self {
        let n = dims.len();
        Self {
            dims,
            spacing,
            origin,
            reflectivity: vec![SENTINEL; n],
            velocity: vec![SENTINEL; n],
            spectral_width: vec![SENTINEL; n],
            reference_point: None,
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn spacing(&self) -> GridSpacing {
        self.spacing
    }

    pub fn origin(&self) -> GridOrigin {
        self.origin
    }

    fn plane(&self, field: FieldName) -> &[f32] {
        match field {
            FieldName::Reflectivity => &self.reflectivity,
            FieldName::Velocity => &self.velocity,
            FieldName::SpectralWidth => &self.spectral_width,
        }
    }

    fn plane_mut(&mut self, field: FieldName) -> &mut [f32] {
        match field {
            FieldName::Reflectivity => &mut self.reflectivity,
            FieldName::Velocity => &mut self.velocity,
            FieldName::SpectralWidth => &mut self.spectral_width,
        }
    }

    fn flat_index(&self, i: usize, j: usize, k: usize) -> usize {
        (k * self.dims.j_dim + j) * self.dims.i_dim + i
    }

    pub fn get(&self, field: FieldName, i: usize, j: usize, k: usize) -> Sample {
        Sample::new(self.plane(field)[self.flat_index(i, j, k)])
    }

    pub fn set(&mut self, field: FieldName, i: usize, j: usize, k: usize, value: f32) {
        let idx = self.flat_index(i, j, k);
        self.plane_mut(field)[idx] = value;
    }

    /// Fraction of sentinel cells in a plane (used by testable property 1,
    /// spec.md §8).
    pub fn sentinel_fraction(&self, field: FieldName) -> f64 {
        let plane = self.plane(field);
        if plane.is_empty() {
            return 1.0;
        }
        let missing = plane.iter().filter(|&&v| v == SENTINEL).count();
        missing as f64 / plane.len() as f64
    }

    /// Convert a km-space (x, y, z) point into fractional grid indices.
    pub fn fractional_index(&self, x_km: f64, y_km: f64, z_km: f64) -> (f64, f64, f64) {
        (
            (x_km - self.origin.xmin) / self.spacing.i_sp,
            (y_km - self.origin.ymin) / self.spacing.j_sp,
            (z_km - self.origin.zmin) / self.spacing.k_sp,
        )
    }

    /// `true` if the fractional index lies within the grid's extent.
    pub fn in_bounds(&self, fi: f64, fj: f64, fk: f64) -> bool {
        fi >= 0.0
            && fj >= 0.0
            && fk >= 0.0
            && fi <= (self.dims.i_dim - 1) as f64
            && fj <= (self.dims.j_dim - 1) as f64
            && fk <= (self.dims.k_dim - 1) as f64
    }

    /// Trilinear interpolation at a km-space point, clamping reads at the
    /// grid boundary (spec.md §4.1 edge policy). Returns `None` if every
    /// contributing corner is sentinel.
    pub fn trilinear(&self, field: FieldName, x_km: f64, y_km: f64, z_km: f64) -> Option<f32> {
        let (fi, fj, fk) = self.fractional_index(x_km, y_km, z_km);
        if !self.in_bounds(fi, fj, fk) {
            return None;
        }
        let i0 = fi.floor() as usize;
        let j0 = fj.floor() as usize;
        let k0 = fk.floor() as usize;
        let i1 = (i0 + 1).min(self.dims.i_dim - 1);
        let j1 = (j0 + 1).min(self.dims.j_dim - 1);
        let k1 = (k0 + 1).min(self.dims.k_dim - 1);
        let dx = fi - i0 as f64;
        let dy = fj - j0 as f64;
        let dz = fk - k0 as f64;

        let mut total_weight = 0.0;
        let mut total = 0.0;
        for (ii, wi) in [(i0, 1.0 - dx), (i1, dx)] {
            for (jj, wj) in [(j0, 1.0 - dy), (j1, dy)] {
                for (kk, wk) in [(k0, 1.0 - dz), (k1, dz)] {
                    let v = self.get(field, ii, jj, kk);
                    if let Some(value) = v.value() {
                        let w = wi * wj * wk;
                        total += w * value as f64;
                        total_weight += w;
                    }
                }
            }
        }
        if total_weight <= 0.0 {
            None
        } else {
            Some((total / total_weight) as f32)
        }
    }

    pub fn reference_point(&self) -> Option<(f64, f64, f64)> {
        self.reference_point
    }

    pub fn set_reference_point(&mut self, x_km: f64, y_km: f64, z_km: f64) {
        self.reference_point = Some((x_km, y_km, z_km));
    }

    /// Sample a ring of radius `radius_km` around the current reference
    /// point at height `height_km`, at `azimuth_step_deg` spacing (spec.md
    /// §4.2 expects an ordered (azimuth, radial-velocity) list). Azimuth is
    /// meteorological degrees from the *reference point*, matching the
    /// angle GBVTD measures ψ from.
    pub fn sample_ring(
        &self,
        field: FieldName,
        radius_km: f64,
        height_km: f64,
        azimuth_step_deg: f64,
    ) -> Vec<RingSample> {
        let Some((cx, cy, _)) = self.reference_point else {
            return Vec::new();
        };
        let mut samples = Vec::new();
        let mut az = 0.0;
        while az < 360.0 {
            let theta = az.to_radians();
            // Meteorological: x = r*sin(theta), y = r*cos(theta).
            let x = cx + radius_km * theta.sin();
            let y = cy + radius_km * theta.cos();
            let value = self
                .trilinear(field, x, y, height_km)
                .map(Sample::new)
                .unwrap_or(Sample::missing());
            samples.push(RingSample {
                azimuth_deg: az,
                sample: value,
            });
            az += azimuth_step_deg;
        }
        samples
    }

    /// Out-of-CAPPI check used by the simplex finder's state machine: `true`
    /// if the given km-space point's fractional grid index is out of range.
    pub fn is_out_of_cappi(&self, x_km: f64, y_km: f64, z_km: f64) -> bool {
        let (fi, fj, fk) = self.fractional_index(x_km, y_km, z_km);
        !self.in_bounds(fi, fj, fk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> GriddedField {
        let dims = GridDims {
            i_dim: 3,
            j_dim: 3,
            k_dim: 2,
        };
        let spacing = GridSpacing {
            i_sp: 1.0,
            j_sp: 1.0,
            k_sp: 1.0,
        };
        let origin = GridOrigin {
            xmin: 0.0,
            ymin: 0.0,
            zmin: 0.0,
        };
        let mut g = GriddedField::new(dims, spacing, origin);
        for k in 0..2 {
            for j in 0..3 {
                for i in 0..3 {
                    g.set(FieldName::Velocity, i, j, k, (i + j) as f32);
                }
            }
        }
        g
    }

    #[test]
    fn trilinear_matches_grid_points() {
        let g = small_grid();
        let v = g.trilinear(FieldName::Velocity, 1.0, 1.0, 0.0).unwrap();
        assert!((v - 2.0).abs() < 1e-6);
    }

    #[test]
    fn trilinear_none_outside_grid() {
        let g = small_grid();
        assert!(g.trilinear(FieldName::Velocity, 10.0, 10.0, 0.0).is_none());
    }

    #[test]
    fn sentinel_fraction_starts_at_one_for_untouched_plane() {
        let g = small_grid();
        assert_eq!(g.sentinel_fraction(FieldName::Reflectivity), 1.0);
    }

    #[test]
    fn sample_ring_without_reference_point_is_empty() {
        let g = small_grid();
        let samples = g.sample_ring(FieldName::Velocity, 1.0, 0.0, 10.0);
        assert!(samples.is_empty());
    }
}

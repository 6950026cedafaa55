//! A dense f64 scratch plane used for the Barnes first pass and its
//! trilinear-interpolated residual correction, kept separate from
//! [`vortrac_core::GriddedField`] since it is full precision and not yet
//! sentinel-coded.

use vortrac_core::{GridDims, GridOrigin, GridSpacing};

pub struct DensePlane {
    dims: GridDims,
    values: Vec<Option<f64>>,
}

impl DensePlane {
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            values: vec![None; dims.len()],
        }
    }

    fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (k * self.dims.j_dim + j) * self.dims.i_dim + i
    }

    pub fn set(&mut self, i: usize, j: usize, k: usize, value: f64) {
        let idx = self.index(i, j, k);
        self.values[idx] = Some(value);
    }

    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<f64> {
        self.values[self.index(i, j, k)]
    }

    /// Trilinear interpolation at a km-space point, treating unset cells as
    /// absent rather than contributing zero weight.
    pub fn trilinear(
        &self,
        spacing: GridSpacing,
        origin: GridOrigin,
        x_km: f64,
        y_km: f64,
        z_km: f64,
    ) -> Option<f64> {
        let fi = (x_km - origin.xmin) / spacing.i_sp;
        let fj = (y_km - origin.ymin) / spacing.j_sp;
        let fk = (z_km - origin.zmin) / spacing.k_sp;
        if fi < 0.0
            || fj < 0.0
            || fk < 0.0
            || fi > (self.dims.i_dim - 1) as f64
            || fj > (self.dims.j_dim - 1) as f64
            || fk > (self.dims.k_dim - 1) as f64
        {
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

        let mut weight_sum = 0.0;
        let mut total = 0.0;
        for (ii, wi) in [(i0, 1.0 - dx), (i1, dx)] {
            for (jj, wj) in [(j0, 1.0 - dy), (j1, dy)] {
                for (kk, wk) in [(k0, 1.0 - dz), (k1, dz)] {
                    if let Some(value) = self.get(ii, jj, kk) {
                        let w = wi * wj * wk;
                        total += w * value;
                        weight_sum += w;
                    }
                }
            }
        }
        (weight_sum > 0.0).then_some(total / weight_sum)
    }
}

//! Grids a [`vortrac_core::RadarVolume`] onto a [`vortrac_core::GriddedField`]
//! using two-pass Barnes objective analysis.

pub mod barnes;
pub mod error;
mod plane;

use tracing::{debug, instrument};
use vortrac_core::{geo, FieldName, GridDims, GridOrigin, GriddedField, GridSpacing, RadarVolume};

use barnes::{BarnesParams, Observation};
pub use error::{GridderError, Result};
use plane::DensePlane;

/// Geometry of the target Cartesian grid.
#[derive(Debug, Clone, Copy)]
pub struct GridSpec {
    pub dims: GridDims,
    pub spacing: GridSpacing,
    pub origin: GridOrigin,
}

impl GridSpec {
    /// `true` if this spec has at least one cell along every axis.
    pub fn is_valid(&self) -> bool {
        !self.dims.is_empty()
    }
}

/// Second-pass smoothing factor applied to each field, mirroring
/// `original_source`'s heavier smoothing of reflectivity relative to the
/// kinematic fields.
#[derive(Debug, Clone, Copy)]
pub struct SmootherConfig {
    pub reflectivity: f64,
    pub velocity: f64,
    pub spectral_width: f64,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            reflectivity: 0.3,
            velocity: 1.0,
            spectral_width: 1.0,
        }
    }
}

fn observations_for(volume: &RadarVolume, field: FieldName) -> Vec<Observation> {
    let mut observations = Vec::new();
    for ray in volume.all_rays() {
        let gates = match field {
            FieldName::Reflectivity => ray.reflectivity(),
            FieldName::Velocity => ray.velocity(),
            FieldName::SpectralWidth => ray.spectral_width(),
        };
        let az_rad = ray.azimuth_deg().to_radians();
        for gate in 0..gates.num_gates() {
            let sample = gates.sample(gate);
            let Some(value) = sample.value() else {
                continue;
            };
            let slant_range_km = gates.range_m(gate) / 1000.0;
            let ground_range_km = slant_range_km * ray.elevation_deg().to_radians().cos();
            let x_km = ground_range_km * az_rad.sin();
            let y_km = ground_range_km * az_rad.cos();
            let z_km = geo::beam_height_km(slant_range_km, ray.elevation_deg()) + volume.position().alt_km;
            observations.push(Observation {
                x_km,
                y_km,
                z_km,
                value: value as f64,
            });
        }
    }
    observations
}

fn barnes_plane(
    observations: &[Observation],
    spec: &GridSpec,
    smoother: f64,
) -> DensePlane {
    let avg_spacing = (spec.spacing.i_sp + spec.spacing.j_sp) / 2.0;
    let params = BarnesParams::from_grid_spacing(avg_spacing, smoother);

    let mut first = DensePlane::new(spec.dims);
    for k in 0..spec.dims.k_dim {
        let z = spec.origin.zmin + k as f64 * spec.spacing.k_sp;
        for j in 0..spec.dims.j_dim {
            let y = spec.origin.ymin + j as f64 * spec.spacing.j_sp;
            for i in 0..spec.dims.i_dim {
                let x = spec.origin.xmin + i as f64 * spec.spacing.i_sp;
                if let Some(value) = barnes::first_pass(observations, (x, y, z), &params) {
                    first.set(i, j, k, value);
                }
            }
        }
    }

    let residuals: Vec<Observation> = observations
        .iter()
        .filter_map(|obs| {
            let estimate = first.trilinear(spec.spacing, spec.origin, obs.x_km, obs.y_km, obs.z_km)?;
            Some(barnes::residual(obs, estimate))
        })
        .collect();

    let mut corrected = DensePlane::new(spec.dims);
    for k in 0..spec.dims.k_dim {
        let z = spec.origin.zmin + k as f64 * spec.spacing.k_sp;
        for j in 0..spec.dims.j_dim {
            let y = spec.origin.ymin + j as f64 * spec.spacing.j_sp;
            for i in 0..spec.dims.i_dim {
                let x = spec.origin.xmin + i as f64 * spec.spacing.i_sp;
                if let Some(base) = first.get(i, j, k) {
                    let correction = barnes::second_pass(&residuals, (x, y, z), &params);
                    corrected.set(i, j, k, base + correction);
                }
            }
        }
    }
    corrected
}

/// Grid a radar volume onto a Cartesian [`GriddedField`] spanning `spec`,
/// running the two-pass Barnes analysis independently for each of the three
/// fields.
#[instrument(skip(volume), fields(radar = volume.radar_name()))]
pub fn grid_volume(volume: &RadarVolume, spec: &GridSpec, smoothers: &SmootherConfig) -> Result<GriddedField> {
    if !spec.is_valid() {
        return Err(GridderError::EmptyGrid {
            i_dim: spec.dims.i_dim,
            j_dim: spec.dims.j_dim,
            k_dim: spec.dims.k_dim,
        });
    }

    let mut field = GriddedField::new(spec.dims, spec.spacing, spec.origin);

    for (name, smoother) in [
        (FieldName::Reflectivity, smoothers.reflectivity),
        (FieldName::Velocity, smoothers.velocity),
        (FieldName::SpectralWidth, smoothers.spectral_width),
    ] {
        let observations = observations_for(volume, name);
        if observations.is_empty() {
            debug!(field = name.as_str(), "no observations, leaving field sentinel-filled");
            continue;
        }
        let plane = barnes_plane(&observations, spec, smoother);
        for k in 0..spec.dims.k_dim {
            for j in 0..spec.dims.j_dim {
                for i in 0..spec.dims.i_dim {
                    if let Some(value) = plane.get(i, j, k) {
                        field.set(name, i, j, k, value as f32);
                    }
                }
            }
        }
    }

    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vortrac_core::{GateArray, RadarPosition, Ray, Sweep};

    fn single_ray_volume() -> RadarVolume {
        let gates = GateArray::new(0.0, 250.0, vec![10.0; 40]);
        let empty = GateArray::empty();
        let rays: Vec<Ray> = (0..360)
            .map(|az| Ray::new(0.5, az as f64, gates.clone(), gates.clone(), empty.clone()))
            .collect();
        let sweeps = vec![Sweep::new(0.5, 26.0, 21, 0, rays.len() - 1)];
        RadarVolume::new(
            "KAMX",
            RadarPosition {
                lat: 25.0,
                lon: -80.0,
                alt_km: 0.01,
            },
            Utc::now(),
            sweeps,
            rays,
        )
        .unwrap()
    }

    #[test]
    fn grids_a_uniform_field_to_a_constant() {
        let volume = single_ray_volume();
        let spec = GridSpec {
            dims: GridDims {
                i_dim: 5,
                j_dim: 5,
                k_dim: 2,
            },
            spacing: GridSpacing {
                i_sp: 1.0,
                j_sp: 1.0,
                k_sp: 1.0,
            },
            origin: GridOrigin {
                xmin: -2.0,
                ymin: -2.0,
                zmin: 0.0,
            },
        };
        let field = grid_volume(&volume, &spec, &SmootherConfig::default()).unwrap();
        let center = field.get(FieldName::Reflectivity, 2, 2, 0);
        assert!(center.is_valid());
        assert!((center.value().unwrap() - 10.0).abs() < 1.0);
    }

    #[test]
    fn rejects_empty_grid_spec() {
        let volume = single_ray_volume();
        let spec = GridSpec {
            dims: GridDims {
                i_dim: 0,
                j_dim: 1,
                k_dim: 1,
            },
            spacing: GridSpacing {
                i_sp: 1.0,
                j_sp: 1.0,
                k_sp: 1.0,
            },
            origin: GridOrigin {
                xmin: 0.0,
                ymin: 0.0,
                zmin: 0.0,
            },
        };
        assert!(grid_volume(&volume, &spec, &SmootherConfig::default()).is_err());
    }
}

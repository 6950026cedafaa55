//! Read-only ring sampling.
//!
//! [`vortrac_core::GriddedField::sample_ring`] reads azimuths around the
//! field's single stored reference point, which the simplex search's
//! parallel seeds cannot share: each seed evaluates the objective at its own
//! candidate center concurrently with the others (spec.md §5: "the gridded
//! field for the current volume is read-only ... and may be shared across
//! parallel seed workers"). This module reimplements the same ring geometry
//! against an explicit candidate center instead of the field's mutable
//! reference point, so it can be called from inside a `rayon` closure
//! without synchronization.

use vortrac_core::{FieldName, GriddedField, RingSample, Sample};

/// Sample a ring of `radius_km` around `(center_x_km, center_y_km)` at
/// `height_km`, at `azimuth_step_deg` spacing. Meteorological azimuth
/// (degrees clockwise from north), matching [`GriddedField::sample_ring`].
pub fn ring_samples_at(
    field: &GriddedField,
    field_name: FieldName,
    center_x_km: f64,
    center_y_km: f64,
    height_km: f64,
    radius_km: f64,
    azimuth_step_deg: f64,
) -> Vec<RingSample> {
    let mut samples = Vec::new();
    let mut az = 0.0;
    while az < 360.0 {
        let theta = az.to_radians();
        let x = center_x_km + radius_km * theta.sin();
        let y = center_y_km + radius_km * theta.cos();
        let value = field
            .trilinear(field_name, x, y, height_km)
            .map(Sample::new)
            .unwrap_or_else(Sample::missing);
        samples.push(RingSample { azimuth_deg: az, sample: value });
        az += azimuth_step_deg;
    }
    samples
}

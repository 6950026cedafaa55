//! `Ray` and `Sweep`: the immutable building blocks of a `RadarVolume`.

use crate::sentinel::Sample;

/// One gate-indexed field along a ray (reflectivity, or velocity +
/// spectral width, which share first-gate range and spacing per
/// `original_source/trunk/DataObjects/Cartesian.cpp`'s `getFirst_vel_gate`/
/// `getVel_gatesp` accessors).
#[derive(Debug, Clone)]
pub struct GateArray {
    /// Range to the first gate, in meters.
    pub first_gate_m: f64,
    /// Spacing between gates, in meters.
    pub gate_spacing_m: f64,
    values: Vec<f32>,
}

impl GateArray {
    pub fn new(first_gate_m: f64, gate_spacing_m: f64, values: Vec<f32>) -> Self {
        Self {
            first_gate_m,
            gate_spacing_m,
            values,
        }
    }

    pub fn empty() -> Self {
        Self {
            first_gate_m: 0.0,
            gate_spacing_m: 0.0,
            values: Vec::new(),
        }
    }

    pub fn num_gates(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sample(&self, gate: usize) -> Sample {
        Sample::new(self.values[gate])
    }

    /// Range to a gate index, in meters.
    pub fn range_m(&self, gate: usize) -> f64 {
        self.first_gate_m + gate as f64 * self.gate_spacing_m
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// A single radial of radar samples.
///
/// Read-only after construction, per spec.md §3.
#[derive(Debug, Clone)]
pub struct Ray {
    elevation_deg: f64,
    /// Meteorological azimuth: degrees clockwise from north.
    azimuth_deg: f64,
    reflectivity: GateArray,
    velocity: GateArray,
    spectral_width: GateArray,
}

impl Ray {
    pub fn new(
        elevation_deg: f64,
        azimuth_deg: f64,
        reflectivity: GateArray,
        velocity: GateArray,
        spectral_width: GateArray,
    ) -> Self {
        Self {
            elevation_deg,
            azimuth_deg,
            reflectivity,
            velocity,
            spectral_width,
        }
    }

    pub fn elevation_deg(&self) -> f64 {
        self.elevation_deg
    }

    pub fn azimuth_deg(&self) -> f64 {
        self.azimuth_deg
    }

    pub fn reflectivity(&self) -> &GateArray {
        &self.reflectivity
    }

    pub fn velocity(&self) -> &GateArray {
        &self.velocity
    }

    pub fn spectral_width(&self) -> &GateArray {
        &self.spectral_width
    }
}

/// A sweep: one elevation scan's contiguous range of rays within a volume.
#[derive(Debug, Clone, Copy)]
pub struct Sweep {
    elevation_deg: f64,
    nyquist_velocity_ms: f64,
    vcp: u32,
    first_ray: usize,
    last_ray: usize,
}

impl Sweep {
    pub fn new(
        elevation_deg: f64,
        nyquist_velocity_ms: f64,
        vcp: u32,
        first_ray: usize,
        last_ray: usize,
    ) -> Self {
        Self {
            elevation_deg,
            nyquist_velocity_ms,
            vcp,
            first_ray,
            last_ray,
        }
    }

    pub fn elevation_deg(&self) -> f64 {
        self.elevation_deg
    }

    pub fn nyquist_velocity_ms(&self) -> f64 {
        self.nyquist_velocity_ms
    }

    pub fn vcp(&self) -> u32 {
        self.vcp
    }

    pub fn ray_range(&self) -> std::ops::RangeInclusive<usize> {
        self.first_ray..=self.last_ray
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_array_range_uses_spacing() {
        let g = GateArray::new(1000.0, 250.0, vec![1.0, 2.0, -999.0]);
        assert_eq!(g.range_m(0), 1000.0);
        assert_eq!(g.range_m(2), 1500.0);
        assert!(!g.sample(2).is_valid());
    }
}

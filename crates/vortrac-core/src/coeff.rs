//! GBVTD harmonic coefficients and closure assumptions (spec.md §4.2).

/// How the wavenumber-1 radial wind is closed when the data coverage is too
/// thin to solve for it directly. Mirrors the three closure modes available
/// in `original_source`'s GBVTD solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureAssumption {
    /// Radial wind is assumed purely axisymmetric (VR1 = 0).
    OriginalHVVP,
    /// Radial wind wavenumber-1 component is solved for directly.
    Gbvtd,
    /// Radial wind wavenumber-1 is fixed to an externally supplied value
    /// (e.g. from a prior ring or an environmental estimate).
    Fixed(f64),
}

impl Default for ClosureAssumption {
    fn default() -> Self {
        ClosureAssumption::Gbvtd
    }
}

/// Harmonic coefficients fit to one ring's radial-velocity distribution:
/// tangential wind wavenumbers 0-2 (cosine/sine pairs) plus the mean and
/// wavenumber-1 radial wind.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GbvtdCoefficients {
    /// Wavenumber-0 (axisymmetric) tangential wind, m/s.
    pub vtc0: f64,
    /// Wavenumber-1 tangential wind, cosine and sine components.
    pub vtc1: f64,
    pub vts1: f64,
    /// Wavenumber-2 tangential wind, cosine and sine components.
    pub vtc2: f64,
    pub vts2: f64,
    /// Mean radial wind.
    pub vrc0: f64,
    /// Wavenumber-1 radial wind, cosine and sine components.
    pub vrc1: f64,
    pub vrs1: f64,
    /// Mean translation-corrected wind (wavenumber-0 term shared between
    /// tangential and radial fits), used by the closure assumptions.
    pub vm: f64,
    /// Number of azimuth samples the fit was built from.
    pub num_samples: usize,
    /// Largest contiguous azimuthal data gap, in degrees (spec.md §4.2 edge
    /// case: rings with gaps exceeding the configured threshold are
    /// rejected before reaching the simplex stage).
    pub max_gap_deg: f64,
    /// Residual standard deviation of the fit (`Ax - b` evaluated at the
    /// solved coefficients), m/s. Spec.md §4.2: GBVTDRing "Return[s] the
    /// coefficient set, a residual standard deviation, and an
    /// insufficient-data flag."
    pub residual_std_ms: f64,
}

impl GbvtdCoefficients {
    /// `true` if this ring's fit has enough azimuthal data to trust VTC0 as a
    /// search objective value (spec.md §4.2 data-sufficiency gate).
    pub fn is_sufficient(&self, min_samples: usize, max_gap_deg: f64) -> bool {
        self.num_samples >= min_samples && self.max_gap_deg <= max_gap_deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_closure_is_gbvtd() {
        assert_eq!(ClosureAssumption::default(), ClosureAssumption::Gbvtd);
    }

    #[test]
    fn sufficiency_gate_rejects_large_gaps() {
        let coeffs = GbvtdCoefficients {
            num_samples: 40,
            max_gap_deg: 95.0,
            ..Default::default()
        };
        assert!(!coeffs.is_sufficient(20, 90.0));
        assert!(coeffs.is_sufficient(20, 100.0));
    }
}

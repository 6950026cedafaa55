//! Error types for the GBVTD solver.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GbvtdError {
    #[error("ring has too few valid azimuth samples ({found}, need at least {needed})")]
    InsufficientSamples { found: usize, needed: usize },

    #[error("linear system was singular while solving for harmonic coefficients")]
    SingularSystem,

    /// The largest azimuthal gap in ψ disallows even wavenumber 0 (spec.md
    /// §4.2: "Fails with InsufficientRingData ... when the largest azimuthal
    /// gap disallows wavenumber 0").
    #[error("ring's largest azimuthal gap ({gap_deg:.1}°) exceeds the {max_allowed_deg:.1}° threshold for wavenumber 0")]
    InsufficientRingData { gap_deg: f64, max_allowed_deg: f64 },
}

pub type Result<T> = std::result::Result<T, GbvtdError>;

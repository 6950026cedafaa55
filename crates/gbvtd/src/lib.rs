//! Ground-Based Velocity Track Display (GBVTD) harmonic wind retrieval.
//!
//! Decomposes single-Doppler radial velocity samples around a ring into
//! axisymmetric and asymmetric tangential/radial wind components, following
//! Lee, Jou, Chang & Marks (1999).

pub mod error;
pub mod geometry;
pub mod linalg;
pub mod ring;

pub use error::{GbvtdError, Result};
pub use ring::{fit_ring, DEFAULT_MAX_GAP_DEG};

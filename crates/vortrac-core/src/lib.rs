//! Core data model for single-Doppler tropical cyclone vortex analysis.
//!
//! `vortrac-core` defines the immutable radar-volume types, the gridded
//! Cartesian field produced from them, the GBVTD harmonic coefficients and
//! simplex search results, and the vortex/pressure/guess-track records the
//! rest of the workspace's crates operate on.

pub mod coeff;
pub mod error;
pub mod geo;
pub mod grid;
pub mod guess;
pub mod pressure;
pub mod ray;
pub mod sentinel;
pub mod simplex_types;
pub mod vortex;
pub mod volume;

pub use coeff::{ClosureAssumption, GbvtdCoefficients};
pub use error::{CoreError, Result};
pub use geo::{beam_height_km, location_from_offset, relative_location_km, EARTH_RADIUS_KM};
pub use grid::{FieldName, GridDims, GridOrigin, GriddedField, GridSpacing, RingSample};
pub use guess::{AtcfRecord, CenterGuessTrack};
pub use pressure::PressureObservation;
pub use ray::{GateArray, Ray, Sweep};
pub use sentinel::{Sample, SENTINEL};
pub use simplex_types::{PointStatus, SimplexPoint, SimplexRecord, SimplexSeedResult, SimplexStatus};
pub use vortex::VortexRecord;
pub use volume::{RadarPosition, RadarVolume};

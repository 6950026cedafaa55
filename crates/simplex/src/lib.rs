//! Nelder-Mead simplex search for the vortex center that maximizes
//! axisymmetric tangential wind (VTC0), evaluated from a caller-supplied
//! GBVTD objective function.

pub mod amoeba;
pub mod error;
pub mod finder;
pub mod seeds;

pub use amoeba::{AmoebaOutcome, ObjectiveOutcome};
pub use error::{Result, SimplexError};
pub use finder::{find_center, SimplexConfig};

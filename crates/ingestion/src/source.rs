//! Seam between file discovery and an actual radar-format decoder.
//!
//! Decoding NEXRAD Level II/III or Dorade bytes into a
//! [`vortrac_core::RadarVolume`] is delegated to an external library
//! (spec.md §4 Non-goals: "parsing any concrete radar file format"); this
//! trait is the narrow interface the analysis driver depends on instead of a
//! concrete decoder, so tests can supply a synthetic or golden-file-backed
//! implementation without linking one in.

use std::path::Path;

use vortrac_core::RadarVolume;

use crate::error::Result;

/// Loads a [`RadarVolume`] from a discovered file path.
pub trait RadarFileSource: Send + Sync {
    fn load_volume(&self, path: &Path) -> Result<RadarVolume>;
}

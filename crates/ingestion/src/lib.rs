//! Radar file discovery, filename parsing, and configuration loading.
//!
//! This crate sits at the system boundary: it turns a directory of radar
//! volume files and a YAML configuration document into the inputs the
//! analysis driver's core pipeline needs, and never touches the GBVTD/
//! simplex math itself.

pub mod atcf_reader;
pub mod config;
pub mod error;
pub mod filename;
pub mod poller;
pub mod pressure_reader;
pub mod source;

pub use config::{load_config, load_config_file, AnalysisConfig};
pub use error::{IngestionError, Result};
pub use filename::{parse_filename, ParsedFilename};
pub use poller::{is_quiescent, DirectoryPoller, DiscoveredVolume};
pub use source::RadarFileSource;

//! Error types shared by the core data model.

use thiserror::Error;

/// Errors that can occur while constructing or querying core data types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A ray or sweep index was out of range.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A field name was not one of the recognized plane names.
    #[error("unknown grid field: {0}")]
    UnknownField(String),

    /// Sweeps were not supplied in non-decreasing elevation order.
    #[error("sweeps must be ordered by elevation, got {prev} before {next}")]
    UnorderedSweeps { prev: f64, next: f64 },
}

pub type Result<T> = std::result::Result<T, CoreError>;

//! Error types for XML persistence.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to open output file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize XML element: {0}")]
    Serialize(#[from] quick_xml::DeError),
}

pub type Result<T> = std::result::Result<T, StorageError>;

//! Error types for center choice and pressure estimation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChooserError {
    #[error("no simplex records were usable for this cycle")]
    NoUsableRecords,

    #[error("wind profile is empty, cannot integrate pressure")]
    EmptyProfile,
}

pub type Result<T> = std::result::Result<T, ChooserError>;

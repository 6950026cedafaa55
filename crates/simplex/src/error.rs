//! Error types for the simplex center search.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimplexError {
    #[error("seed count {0} must be a perfect square")]
    SeedCountNotSquare(usize),
}

pub type Result<T> = std::result::Result<T, SimplexError>;

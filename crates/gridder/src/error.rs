//! Error types for the gridding stage.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridderError {
    #[error("grid spec produced an empty dimension: {i_dim}x{j_dim}x{k_dim}")]
    EmptyGrid {
        i_dim: usize,
        j_dim: usize,
        k_dim: usize,
    },

    #[error("radar volume contributed no usable samples for field {0}")]
    NoSamples(String),
}

pub type Result<T> = std::result::Result<T, GridderError>;

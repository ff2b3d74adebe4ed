//! Error types for the Lyra2 core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Lyra2Error {
    #[error("Failed to allocate {bytes} bytes of working memory")]
    Allocation { bytes: usize },

    #[error("Invalid matrix shape {rows}x{cols}: need at least 2 rows and 1 column")]
    InvalidShape { rows: u16, cols: u16 },

    #[error("Input needs {needed} staging bytes but the matrix only holds {capacity}")]
    InputTooLong { needed: usize, capacity: usize },
}

//! Error types for the simulation core and the save-file adapter.

use thiserror::Error;

/// Errors raised by grid construction, cell access and decoding.
///
/// All of these are precondition violations of the caller; nothing is
/// retried or repaired internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Grid created with a zero (or overflowing) extent
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Coordinate outside the grid extent
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// Encoded data or save record that cannot be applied
    #[error("malformed data: {0}")]
    MalformedData(String),
}

/// Errors raised while reading or writing save files.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Grid(#[from] GridError),
}

//! Error types for the stencil driver.

use thiserror::Error;

/// Result type alias for driver operations.
pub type Result<T> = std::result::Result<T, StencilError>;

/// Errors that can occur while setting up or driving a filter path.
///
/// The accelerator handshake itself has no error variant on purpose: the
/// engine either answers or the poll loop blocks. Everything here belongs
/// to the seams around it.
#[derive(Debug, Error)]
pub enum StencilError {
    /// I/O error while opening the register window.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// Mapping the register window failed.
    #[error("Failed to map register window: {reason}")]
    MapFailed {
        /// Reason for failure
        reason: String,
    },

    /// Source and destination grids have different side lengths.
    #[error("Grid size mismatch: source {src} cells/side, destination {dst}")]
    SizeMismatch {
        /// Source side length
        src: usize,
        /// Destination side length
        dst: usize,
    },

    /// A buffer's base address does not fit the engine's 32-bit pointer
    /// registers.
    #[error("Buffer at {addr:#x} is outside the engine's 32-bit address reach")]
    AddressOverflow {
        /// Host address of the buffer
        addr: usize,
    },
}

impl StencilError {
    /// Create a map failed error.
    pub fn map_failed(reason: impl Into<String>) -> Self {
        Self::MapFailed {
            reason: reason.into(),
        }
    }
}

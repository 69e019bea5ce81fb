//! Top-level server error definitions.

use thiserror::Error;

/// Errors that can abort the server process
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind or serve on the listen address
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

//! UseCase layer error definitions.

use thiserror::Error;

use crate::domain::ValueObjectError;

/// Errors a join request can fail with.
///
/// These never reach the wire as protocol-level failure messages; a rejected
/// join is logged and ignored, leaving registry state untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// The display name or room id failed validation
    #[error("invalid join request: {0}")]
    Validation(#[from] ValueObjectError),

    /// The connection already joined a room; rejoining without
    /// disconnecting is not a supported transition
    #[error("connection '{0}' already joined a room")]
    AlreadyJoined(String),
}

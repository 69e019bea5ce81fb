//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Display name is empty or whitespace-only after trimming
    #[error("Username cannot be empty or whitespace-only")]
    UsernameEmpty,

    /// Display name too long error
    #[error("Username cannot exceed {max} characters (got {actual})")]
    UsernameTooLong { max: usize, actual: usize },

    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId too long error
    #[error("RoomId cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },
}

/// Errors related to Connection Registry state transitions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A connection attempted to join while already registered.
    /// Rejoining without disconnecting is not a supported transition;
    /// the existing registration is left untouched.
    #[error("connection '{0}' is already registered")]
    AlreadyRegistered(String),
}

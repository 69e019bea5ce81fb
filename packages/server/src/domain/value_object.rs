//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// The well-known room a connection joins when no room is requested.
pub const DEFAULT_ROOM: &str = "default";

/// Connection identifier value object.
///
/// Opaque, unique per live network session, assigned by the transport when a
/// WebSocket connection is accepted. A reconnect gets a fresh id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Assign a fresh connection identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a ConnectionId from an existing identifier string.
    ///
    /// # Returns
    ///
    /// A Result containing the ConnectionId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name value object.
///
/// Free text, not unique across a room. Leading/trailing whitespace is
/// trimmed on construction; a name that is empty after trimming is rejected,
/// so an empty display name is unrepresentable past this boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Maximum display name length in characters.
    pub const MAX_LEN: usize = 64;

    /// Create a new Username, trimming surrounding whitespace.
    ///
    /// # Returns
    ///
    /// A Result containing the Username or an error if validation fails
    pub fn new(name: &str) -> Result<Self, ValueObjectError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::UsernameEmpty);
        }
        let len = trimmed.chars().count();
        if len > Self::MAX_LEN {
            return Err(ValueObjectError::UsernameTooLong {
                max: Self::MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier value object.
///
/// A plain string key. Rooms are created lazily on first join and deleted
/// when their member set becomes empty, so a RoomId carries no lifecycle of
/// its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// Maximum room identifier length in characters.
    pub const MAX_LEN: usize = 100;

    /// Create a new RoomId.
    ///
    /// # Returns
    ///
    /// A Result containing the RoomId or an error if validation fails
    pub fn new(id: &str) -> Result<Self, ValueObjectError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::RoomIdEmpty);
        }
        let len = trimmed.chars().count();
        if len > Self::MAX_LEN {
            return Err(ValueObjectError::RoomIdTooLong {
                max: Self::MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Resolve an optional requested room to a RoomId.
    ///
    /// Absent, empty, or whitespace-only requests fall back to the
    /// well-known default room.
    pub fn resolve(requested: Option<&str>) -> Result<Self, ValueObjectError> {
        match requested {
            Some(room) if !room.trim().is_empty() => Self::new(room),
            _ => Ok(Self::default()),
        }
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self(DEFAULT_ROOM.to_string())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Core domain models for the presence protocol.

use serde::{Deserialize, Serialize};

use super::value_object::{ConnectionId, RoomId, Username};

/// What the registry knows about one live connection: its display name and
/// the room it belongs to. Populated by a join request, destroyed on
/// disconnect; there is no separate "leave" transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Display name chosen at join time
    pub username: Username,
    /// Room the connection belongs to
    pub room: RoomId,
}

impl Membership {
    /// Create a new membership record
    pub fn new(username: Username, room: RoomId) -> Self {
        Self { username, room }
    }
}

/// One entry of a room membership snapshot, as handed to a newly joined
/// client in the `init` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMember {
    /// Connection identifier of the member
    pub id: ConnectionId,
    /// Display name of the member
    pub username: Username,
}

impl RoomMember {
    /// Create a new room member entry
    pub fn new(id: ConnectionId, username: Username) -> Self {
        Self { id, username }
    }
}

/// Summary of one live room, for the HTTP observability surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    /// Room identifier
    pub id: RoomId,
    /// Current member count; always at least 1, empty rooms are deleted
    pub size: usize,
}

//! WebSocket message DTOs for the presence protocol.
//!
//! Every frame on the wire is a tagged JSON envelope:
//! `{"type": "<event>", "data": <payload>}` with camelCase payload fields
//! (`socketId`, `username`, `isTyping`, ...).

use serde::{Deserialize, Serialize};

use crate::domain::{ConnectionId, RoomMember, Username};

/// Events a client may send to the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    /// Join a room. Accepted once per connection, before anything else.
    Join(JoinPayload),
    /// Say something to the whole room.
    ChatMessage { message: String },
    /// Typing indicator on/off.
    Typing(bool),
}

/// Inbound `join` payload.
///
/// The canonical form is an object; a bare string is a deprecated shorthand
/// for `{username, room: default}` kept for backward compatibility. The
/// loose shape is an input-parsing concern only — it is normalized into a
/// [`JoinRequest`] before it reaches the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum JoinPayload {
    /// `{"username": "...", "room": "..."}`
    Full {
        username: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room: Option<String>,
    },
    /// Bare string shorthand: username only, implicit default room.
    Shorthand(String),
}

impl JoinPayload {
    /// Normalize either accepted shape into one typed request.
    pub fn normalize(self) -> JoinRequest {
        match self {
            Self::Full { username, room } => JoinRequest { username, room },
            Self::Shorthand(username) => JoinRequest {
                username,
                room: None,
            },
        }
    }
}

/// Normalized join request, the only shape the rest of the server sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub username: String,
    pub room: Option<String>,
}

/// One peer entry of the `init` snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeerInfo {
    pub socket_id: String,
    pub username: String,
}

impl From<RoomMember> for PeerInfo {
    fn from(member: RoomMember) -> Self {
        Self {
            socket_id: member.id.into_string(),
            username: member.username.into_string(),
        }
    }
}

/// Events the server fans out to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// Transport handshake: tells the client the id it was assigned.
    Connected { socket_id: String },
    /// Membership snapshot sent to a newly joined client only.
    Init { users: Vec<PeerInfo> },
    /// Someone joined the room (not sent to the joiner itself).
    UserJoined {
        socket_id: String,
        username: String,
        message: String,
    },
    /// Someone left the room (sent to the remaining members).
    UserLeft {
        socket_id: String,
        username: String,
        message: String,
    },
    /// New room size, sent to the whole room after join/disconnect.
    UserCount(usize),
    /// Chat line, sent to the whole room including the sender.
    ChatMessage {
        socket_id: String,
        username: String,
        message: String,
        timestamp: String,
    },
    /// Typing indicator of one member (not echoed to that member).
    Typing {
        socket_id: String,
        username: String,
        is_typing: bool,
    },
}

impl ServerEvent {
    /// Build the handshake event for a freshly assigned connection id.
    pub fn connected(id: &ConnectionId) -> Self {
        Self::Connected {
            socket_id: id.as_str().to_string(),
        }
    }

    /// Build the `init` snapshot from registry members.
    pub fn init(members: Vec<RoomMember>) -> Self {
        Self::Init {
            users: members.into_iter().map(PeerInfo::from).collect(),
        }
    }

    /// Build a `user_joined` notification with its human-readable sentence.
    pub fn user_joined(id: &ConnectionId, username: &Username) -> Self {
        Self::UserJoined {
            socket_id: id.as_str().to_string(),
            username: username.as_str().to_string(),
            message: format!("{username} joined the chat"),
        }
    }

    /// Build a `user_left` notification with its human-readable sentence.
    pub fn user_left(id: &ConnectionId, username: &Username) -> Self {
        Self::UserLeft {
            socket_id: id.as_str().to_string(),
            username: username.as_str().to_string(),
            message: format!("{username} left the chat"),
        }
    }

    /// Build a broadcast chat line; `timestamp` is generated at send time.
    pub fn chat_message(
        id: &ConnectionId,
        username: &Username,
        message: String,
        timestamp: String,
    ) -> Self {
        Self::ChatMessage {
            socket_id: id.as_str().to_string(),
            username: username.as_str().to_string(),
            message,
            timestamp,
        }
    }

    /// Build a typing indicator notification.
    pub fn typing(id: &ConnectionId, username: &Username, is_typing: bool) -> Self {
        Self::Typing {
            socket_id: id.as_str().to_string(),
            username: username.as_str().to_string(),
            is_typing,
        }
    }

    /// Serialize to the wire representation.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("ServerEvent serialization cannot fail")
    }
}

//! Client Presence Cache.
//!
//! Mirrors the server's view of the local user's room, rebuilt purely from
//! server events. Screen positions and avatar colors are client-owned
//! cosmetics: assigned randomly per peer, never synchronized to other
//! clients or the server.

use std::collections::HashMap;

use rand::Rng;

use piazza_server::infrastructure::dto::websocket::ServerEvent;

/// Canvas bounds avatars are scattered over.
pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 600;

/// Avatar palette, one color picked at random per peer.
pub const AVATAR_COLORS: [&str; 8] = [
    "purple", "blue", "green", "red", "yellow", "orange", "pink", "cyan",
];

/// Client-owned screen position of one avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    fn random() -> Self {
        let mut rng = rand::rng();
        Self {
            x: rng.random_range(0..CANVAS_WIDTH),
            y: rng.random_range(0..CANVAS_HEIGHT),
        }
    }
}

fn random_color() -> &'static str {
    let mut rng = rand::rng();
    AVATAR_COLORS[rng.random_range(0..AVATAR_COLORS.len())]
}

/// One known peer (or the local user).
#[derive(Debug, Clone)]
pub struct Peer {
    pub username: String,
    pub is_typing: bool,
    pub position: Position,
    pub color: &'static str,
}

impl Peer {
    fn new(username: String) -> Self {
        Self {
            username,
            is_typing: false,
            position: Position::random(),
            color: random_color(),
        }
    }
}

/// What the UI should do in response to one applied server event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheUpdate {
    /// The `init` snapshot was applied; the cache now holds `peer_count`
    /// peers plus the local user.
    Seeded { peer_count: usize },
    /// A peer appeared; `note` is the server's human-readable sentence.
    PeerJoined { socket_id: String, note: String },
    /// A peer went away.
    PeerLeft { socket_id: String, note: String },
    /// Transient speech content to surface above an avatar.
    SpeechBubble {
        socket_id: String,
        username: String,
        message: String,
        timestamp: String,
    },
    /// The aggregate "who is typing" line changed; `None` clears it.
    TypingChanged { summary: Option<String> },
    /// New room size as reported by the server.
    UserCount(usize),
}

/// Local mirror of room presence, keyed by socket id.
#[derive(Debug, Default)]
pub struct PresenceCache {
    username: String,
    local_id: Option<String>,
    peers: HashMap<String, Peer>,
}

impl PresenceCache {
    /// Create an empty cache for a user about to join.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            local_id: None,
            peers: HashMap::new(),
        }
    }

    /// The transport-assigned id of the local user, once known.
    pub fn local_id(&self) -> Option<&str> {
        self.local_id.as_deref()
    }

    /// All known avatars, the local user included.
    pub fn peers(&self) -> &HashMap<String, Peer> {
        &self.peers
    }

    /// Apply one server event, returning what (if anything) changed.
    ///
    /// Events referencing unknown peers are dropped: they only arise from
    /// benign delivery races and the next broadcast self-heals the view.
    pub fn apply(&mut self, event: ServerEvent) -> Option<CacheUpdate> {
        match event {
            ServerEvent::Connected { socket_id } => {
                self.local_id = Some(socket_id);
                None
            }
            ServerEvent::Init { users } => {
                let peer_count = users.len();
                for user in users {
                    // Guard against the snapshot somehow listing ourselves.
                    if self.local_id.as_deref() == Some(user.socket_id.as_str()) {
                        continue;
                    }
                    self.peers
                        .insert(user.socket_id, Peer::new(user.username));
                }
                if let Some(local_id) = &self.local_id {
                    self.peers
                        .insert(local_id.clone(), Peer::new(self.username.clone()));
                }
                Some(CacheUpdate::Seeded { peer_count })
            }
            ServerEvent::UserJoined {
                socket_id,
                username,
                message,
            } => {
                // Duplicate delivery guard: keep the existing entry.
                if self.peers.contains_key(&socket_id) {
                    return None;
                }
                self.peers.insert(socket_id.clone(), Peer::new(username));
                Some(CacheUpdate::PeerJoined {
                    socket_id,
                    note: message,
                })
            }
            ServerEvent::UserLeft {
                socket_id, message, ..
            } => {
                self.peers.remove(&socket_id)?;
                Some(CacheUpdate::PeerLeft {
                    socket_id,
                    note: message,
                })
            }
            ServerEvent::ChatMessage {
                socket_id,
                username,
                message,
                timestamp,
            } => {
                if !self.peers.contains_key(&socket_id)
                    && self.local_id.as_deref() != Some(socket_id.as_str())
                {
                    return None;
                }
                Some(CacheUpdate::SpeechBubble {
                    socket_id,
                    username,
                    message,
                    timestamp,
                })
            }
            ServerEvent::Typing {
                socket_id,
                is_typing,
                ..
            } => {
                let peer = self.peers.get_mut(&socket_id)?;
                peer.is_typing = is_typing;
                Some(CacheUpdate::TypingChanged {
                    summary: self.typing_summary(),
                })
            }
            ServerEvent::UserCount(count) => Some(CacheUpdate::UserCount(count)),
        }
    }

    /// Aggregate "who is typing" line, recomputed from the full cache.
    /// The local user never appears in their own indicator.
    pub fn typing_summary(&self) -> Option<String> {
        let mut typists: Vec<&str> = self
            .peers
            .iter()
            .filter(|(id, peer)| peer.is_typing && self.local_id.as_deref() != Some(id.as_str()))
            .map(|(_, peer)| peer.username.as_str())
            .collect();

        match typists.len() {
            0 => None,
            1 => Some(format!("{} is typing...", typists.pop().unwrap())),
            n => Some(format!("{n} people are typing...")),
        }
    }
}

//! Connection Registry trait.
//!
//! The registry is the authoritative record of who is connected and which
//! room they belong to. It is defined here as a trait so the usecase layer
//! depends on the domain abstraction, not on the in-memory implementation
//! (dependency inversion); tests can instantiate independent registries or
//! mock the seam entirely.

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use super::{
    entity::{Membership, RoomMember, RoomSummary},
    error::RegistryError,
    value_object::{ConnectionId, RoomId, Username},
};

/// Authoritative presence state: connection -> membership, room -> members.
///
/// The registry only mutates state; broadcasting the consequences of a
/// mutation is the caller's job. Every operation is atomic with respect to
/// the others, which is what keeps the two maps consistent: a room entry
/// exists if and only if its member set is non-empty.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Register a connection under `room`, creating the room lazily.
    ///
    /// The `sender` is the connection's outbound enqueue channel, kept so
    /// fan-out can address room members without a second lookup table.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::AlreadyRegistered` if the connection already
    /// joined; the existing registration is left untouched.
    async fn register(
        &self,
        id: ConnectionId,
        username: Username,
        room: RoomId,
        sender: UnboundedSender<String>,
    ) -> Result<(), RegistryError>;

    /// Remove a connection, deleting its room when the member set becomes
    /// empty. Returns the prior membership, or `None` if the connection was
    /// unknown — a no-op, not an error, since disconnect may race cleanup.
    async fn unregister(&self, id: &ConnectionId) -> Option<Membership>;

    /// Look up the membership of a connection, `None` if unregistered.
    async fn membership(&self, id: &ConnectionId) -> Option<Membership>;

    /// Snapshot of `room`'s members except `excluding`, in no particular
    /// order. Empty for unknown rooms.
    async fn list_room_members(
        &self,
        room: &RoomId,
        excluding: Option<ConnectionId>,
    ) -> Vec<RoomMember>;

    /// Current member count of `room`, 0 for unknown rooms.
    async fn room_size(&self, room: &RoomId) -> usize;

    /// Outbound channels of `room`'s members except `excluding`, for
    /// fire-and-forget fan-out. Empty for unknown rooms.
    async fn room_senders(
        &self,
        room: &RoomId,
        excluding: Option<ConnectionId>,
    ) -> Vec<(ConnectionId, UnboundedSender<String>)>;

    /// Summaries of all live rooms.
    async fn list_rooms(&self) -> Vec<RoomSummary>;
}

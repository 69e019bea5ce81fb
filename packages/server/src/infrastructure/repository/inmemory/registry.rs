//! In-memory Connection Registry implementation.
//!
//! HashMaps behind a single mutex serve as the store. Holding one lock for
//! the whole of each operation is what makes every registry mutation atomic:
//! the `connections` map and the per-room member sets can never be observed
//! out of sync, so a room entry exists exactly as long as it has members.
//! Nothing survives a restart; persistence is an explicit non-goal.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::domain::{
    ConnectionId, ConnectionRegistry, Membership, RegistryError, RoomId, RoomMember, RoomSummary,
    Username,
};

/// One registered connection: its membership plus its outbound channel.
struct RegisteredConnection {
    membership: Membership,
    sender: UnboundedSender<String>,
}

#[derive(Default)]
struct RegistryState {
    connections: HashMap<ConnectionId, RegisteredConnection>,
    rooms: HashMap<RoomId, HashSet<ConnectionId>>,
}

/// In-memory `ConnectionRegistry` implementation.
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    state: Mutex<RegistryState>,
}

impl InMemoryConnectionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(
        &self,
        id: ConnectionId,
        username: Username,
        room: RoomId,
        sender: UnboundedSender<String>,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.lock().await;
        if state.connections.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id.into_string()));
        }

        state.rooms.entry(room.clone()).or_default().insert(id.clone());
        state.connections.insert(
            id,
            RegisteredConnection {
                membership: Membership::new(username, room),
                sender,
            },
        );
        Ok(())
    }

    async fn unregister(&self, id: &ConnectionId) -> Option<Membership> {
        let mut state = self.state.lock().await;
        let removed = state.connections.remove(id)?;

        if let Some(members) = state.rooms.get_mut(&removed.membership.room) {
            members.remove(id);
            if members.is_empty() {
                state.rooms.remove(&removed.membership.room);
            }
        }

        Some(removed.membership)
    }

    async fn membership(&self, id: &ConnectionId) -> Option<Membership> {
        let state = self.state.lock().await;
        state
            .connections
            .get(id)
            .map(|conn| conn.membership.clone())
    }

    async fn list_room_members(
        &self,
        room: &RoomId,
        excluding: Option<ConnectionId>,
    ) -> Vec<RoomMember> {
        let state = self.state.lock().await;
        let Some(members) = state.rooms.get(room) else {
            return Vec::new();
        };

        members
            .iter()
            .filter(|&id| excluding.as_ref() != Some(id))
            .filter_map(|id| {
                state
                    .connections
                    .get(id)
                    .map(|conn| RoomMember::new(id.clone(), conn.membership.username.clone()))
            })
            .collect()
    }

    async fn room_size(&self, room: &RoomId) -> usize {
        let state = self.state.lock().await;
        state.rooms.get(room).map_or(0, HashSet::len)
    }

    async fn room_senders(
        &self,
        room: &RoomId,
        excluding: Option<ConnectionId>,
    ) -> Vec<(ConnectionId, UnboundedSender<String>)> {
        let state = self.state.lock().await;
        let Some(members) = state.rooms.get(room) else {
            return Vec::new();
        };

        members
            .iter()
            .filter(|&id| excluding.as_ref() != Some(id))
            .filter_map(|id| {
                state
                    .connections
                    .get(id)
                    .map(|conn| (id.clone(), conn.sender.clone()))
            })
            .collect()
    }

    async fn list_rooms(&self) -> Vec<RoomSummary> {
        let state = self.state.lock().await;
        state
            .rooms
            .iter()
            .map(|(id, members)| RoomSummary {
                id: id.clone(),
                size: members.len(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn name(name: &str) -> Username {
        Username::new(name).unwrap()
    }

    fn room(id: &str) -> RoomId {
        RoomId::new(id).unwrap()
    }

    async fn register(registry: &InMemoryConnectionRegistry, id: &str, username: &str, rm: &str) {
        let (tx, _rx) = mpsc::unbounded_channel();
        registry
            .register(conn(id), name(username), room(rm), tx)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_register_creates_room_lazily() {
        // given (precondition): an empty registry, no rooms tracked
        let registry = InMemoryConnectionRegistry::new();
        assert_eq!(registry.room_size(&room("lobby")).await, 0);

        // when (operation): the first member joins "lobby"
        register(&registry, "c1", "Ann", "lobby").await;

        // then (expected result): the room now exists with one member
        assert_eq!(registry.room_size(&room("lobby")).await, 1);
        let membership = registry.membership(&conn("c1")).await.unwrap();
        assert_eq!(membership.username.as_str(), "Ann");
        assert_eq!(membership.room.as_str(), "lobby");
    }

    #[tokio::test]
    async fn test_register_twice_is_rejected() {
        // given (precondition): c1 is already registered in "lobby"
        let registry = InMemoryConnectionRegistry::new();
        register(&registry, "c1", "Ann", "lobby").await;

        // when (operation): the same connection joins again without
        // disconnecting (not a supported transition)
        let (tx, _rx) = mpsc::unbounded_channel();
        let result = registry
            .register(conn("c1"), name("Eve"), room("other"), tx)
            .await;

        // then (expected result): rejected, the original state untouched
        assert_eq!(
            result.unwrap_err(),
            RegistryError::AlreadyRegistered("c1".to_string())
        );
        let membership = registry.membership(&conn("c1")).await.unwrap();
        assert_eq!(membership.username.as_str(), "Ann");
        assert_eq!(membership.room.as_str(), "lobby");
        assert_eq!(registry.room_size(&room("other")).await, 0);
    }

    #[tokio::test]
    async fn test_unregister_removes_from_both_maps() {
        // given (precondition): two members in "lobby"
        let registry = InMemoryConnectionRegistry::new();
        register(&registry, "c1", "Ann", "lobby").await;
        register(&registry, "c2", "Bob", "lobby").await;

        // when (operation): c1 disconnects
        let membership = registry.unregister(&conn("c1")).await;

        // then (expected result): membership returned, room keeps c2 only
        let membership = membership.unwrap();
        assert_eq!(membership.username.as_str(), "Ann");
        assert!(registry.membership(&conn("c1")).await.is_none());
        assert_eq!(registry.room_size(&room("lobby")).await, 1);
        let remaining = registry.list_room_members(&room("lobby"), None).await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, conn("c2"));
    }

    #[tokio::test]
    async fn test_unregister_last_member_deletes_room() {
        // given (precondition): "lobby" has a single member
        let registry = InMemoryConnectionRegistry::new();
        register(&registry, "c1", "Ann", "lobby").await;

        // when (operation): that member disconnects
        registry.unregister(&conn("c1")).await;

        // then (expected result): no room persists with an empty member set
        assert_eq!(registry.room_size(&room("lobby")).await, 0);
        assert!(registry.list_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_unregister_unknown_connection_is_noop() {
        // given (precondition): disconnect may race cleanup, so an unknown
        // id must not be an error
        let registry = InMemoryConnectionRegistry::new();
        register(&registry, "c1", "Ann", "lobby").await;

        // when (operation): unregister twice
        let first = registry.unregister(&conn("c1")).await;
        let second = registry.unregister(&conn("c1")).await;

        // then (expected result): first removes, second is a silent no-op
        assert!(first.is_some());
        assert!(second.is_none());
        assert!(registry.list_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_room_members_excludes_requested_id() {
        // given (precondition): three members in "lobby"
        let registry = InMemoryConnectionRegistry::new();
        register(&registry, "c1", "Ann", "lobby").await;
        register(&registry, "c2", "Bob", "lobby").await;
        register(&registry, "c3", "Cat", "lobby").await;

        // when (operation): snapshot for the newly joined c3
        let members = registry
            .list_room_members(&room("lobby"), Some(conn("c3")))
            .await;

        // then (expected result): everyone but c3
        assert_eq!(members.len(), 2);
        assert!(members.iter().any(|m| m.id == conn("c1")));
        assert!(members.iter().any(|m| m.id == conn("c2")));
        assert!(!members.iter().any(|m| m.id == conn("c3")));
    }

    #[tokio::test]
    async fn test_list_room_members_unknown_room_is_empty() {
        // given (precondition):
        let registry = InMemoryConnectionRegistry::new();

        // when (operation): a room no one ever joined
        let members = registry.list_room_members(&room("ghost"), None).await;

        // then (expected result): empty, not an error
        assert!(members.is_empty());
    }

    #[tokio::test]
    async fn test_rooms_are_independent_partitions() {
        // given (precondition): members spread over two rooms
        let registry = InMemoryConnectionRegistry::new();
        register(&registry, "c1", "Ann", "lobby").await;
        register(&registry, "c2", "Bob", "lobby").await;
        register(&registry, "c3", "Cat", "attic").await;

        // when (operation):
        let lobby_senders = registry.room_senders(&room("lobby"), None).await;
        let attic_senders = registry.room_senders(&room("attic"), None).await;

        // then (expected result): fan-out never crosses rooms
        assert_eq!(lobby_senders.len(), 2);
        assert_eq!(attic_senders.len(), 1);
        assert_eq!(attic_senders[0].0, conn("c3"));
    }

    #[tokio::test]
    async fn test_room_senders_excludes_sender() {
        // given (precondition):
        let registry = InMemoryConnectionRegistry::new();
        register(&registry, "c1", "Ann", "lobby").await;
        register(&registry, "c2", "Bob", "lobby").await;

        // when (operation): targets for an event that skips its originator
        let senders = registry
            .room_senders(&room("lobby"), Some(conn("c1")))
            .await;

        // then (expected result):
        assert_eq!(senders.len(), 1);
        assert_eq!(senders[0].0, conn("c2"));
    }

    #[tokio::test]
    async fn test_no_empty_rooms_after_any_join_disconnect_sequence() {
        // given (precondition): an arbitrary interleaving of joins and
        // disconnects over two rooms
        let registry = InMemoryConnectionRegistry::new();
        register(&registry, "c1", "Ann", "lobby").await;
        register(&registry, "c2", "Bob", "attic").await;
        registry.unregister(&conn("c2")).await;
        register(&registry, "c3", "Cat", "lobby").await;
        registry.unregister(&conn("c1")).await;
        registry.unregister(&conn("c3")).await;
        register(&registry, "c4", "Dan", "attic").await;

        // then (expected result): every tracked room has at least one member
        let rooms = registry.list_rooms().await;
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id.as_str(), "attic");
        assert!(rooms.iter().all(|r| r.size > 0));
    }

    #[tokio::test]
    async fn test_room_size_matches_member_list() {
        // given (precondition):
        let registry = InMemoryConnectionRegistry::new();
        register(&registry, "c1", "Ann", "lobby").await;
        register(&registry, "c2", "Bob", "lobby").await;

        // then (expected result): the count and the snapshot agree
        assert_eq!(
            registry.room_size(&room("lobby")).await,
            registry.list_room_members(&room("lobby"), None).await.len()
        );
    }
}

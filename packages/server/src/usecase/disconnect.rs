//! UseCase: handle a transport disconnect.
//!
//! Disconnect is the only way a connection leaves its room; there is no
//! separate "leave" request. The connection is unregistered and, if its room
//! still has members afterwards, those members are handed back for
//! notification. When the room became empty there is no one left to receive
//! anything and the room entry itself is gone.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::domain::{ConnectionId, ConnectionRegistry, Membership};

/// Result of a disconnect that removed a registered connection.
#[derive(Debug)]
pub struct DisconnectOutcome {
    /// The membership the connection held before removal
    pub membership: Membership,
    /// Remaining room members; empty when the room was deleted
    pub remaining: Vec<(ConnectionId, UnboundedSender<String>)>,
}

/// Disconnect usecase
pub struct DisconnectUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl DisconnectUseCase {
    /// Create a new DisconnectUseCase
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Unregister the connection.
    ///
    /// Returns `None` when the connection was never registered (it
    /// disconnected before joining, or cleanup already ran) — a no-op.
    pub async fn execute(&self, conn_id: &ConnectionId) -> Option<DisconnectOutcome> {
        let membership = self.registry.unregister(conn_id).await?;
        let remaining = self.registry.room_senders(&membership.room, None).await;
        Some(DisconnectOutcome {
            membership,
            remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RoomId, Username},
        infrastructure::repository::InMemoryConnectionRegistry,
    };
    use tokio::sync::mpsc;

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    async fn join(registry: &Arc<InMemoryConnectionRegistry>, id: &str, username: &str, room: &str) {
        let (tx, _rx) = mpsc::unbounded_channel();
        registry
            .register(
                conn(id),
                Username::new(username).unwrap(),
                RoomId::new(room).unwrap(),
                tx,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_disconnect_notifies_remaining_members() {
        // given (precondition): Ann and Bob in "lobby"
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        join(&registry, "c1", "Ann", "lobby").await;
        join(&registry, "c2", "Bob", "lobby").await;
        let usecase = DisconnectUseCase::new(registry.clone());

        // when (operation): Ann disconnects
        let outcome = usecase.execute(&conn("c1")).await.unwrap();

        // then (expected result): Bob remains and is the one to notify;
        // the remaining count is the post-removal room size
        assert_eq!(outcome.membership.username.as_str(), "Ann");
        assert_eq!(outcome.remaining.len(), 1);
        assert_eq!(outcome.remaining[0].0, conn("c2"));
        assert_eq!(
            registry.room_size(&RoomId::new("lobby").unwrap()).await,
            1
        );
    }

    #[tokio::test]
    async fn test_last_member_disconnect_leaves_no_recipients() {
        // given (precondition): Ann alone in "lobby"
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        join(&registry, "c1", "Ann", "lobby").await;
        let usecase = DisconnectUseCase::new(registry.clone());

        // when (operation): she disconnects
        let outcome = usecase.execute(&conn("c1")).await.unwrap();

        // then (expected result): no recipients, and the room is gone
        assert!(outcome.remaining.is_empty());
        assert!(registry.list_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_before_join_is_noop() {
        // given (precondition): the connection never sent a join
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = DisconnectUseCase::new(registry.clone());

        // when (operation):
        let outcome = usecase.execute(&conn("c1")).await;

        // then (expected result): nothing to do, nothing broadcast
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_events_after_disconnect_have_no_effect() {
        // given (precondition): Ann joined and already disconnected
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        join(&registry, "c1", "Ann", "lobby").await;
        let usecase = DisconnectUseCase::new(registry.clone());
        usecase.execute(&conn("c1")).await.unwrap();

        // when (operation): a straggling disconnect for the same id
        let outcome = usecase.execute(&conn("c1")).await;

        // then (expected result): idempotent, registry state unchanged
        assert!(outcome.is_none());
        assert!(registry.list_rooms().await.is_empty());
    }
}

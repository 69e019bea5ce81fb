//! UseCase: broadcast a chat message to the sender's room.
//!
//! The registry is not mutated. If the sender is not registered (an event
//! racing its own disconnect), the message is silently dropped.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::domain::{ConnectionId, ConnectionRegistry, Membership};

/// Fan-out data for one chat message.
#[derive(Debug)]
pub struct ChatOutcome {
    /// Membership of the sender, for attributing the message
    pub sender: Membership,
    /// Everyone in the room, including the sender
    pub recipients: Vec<(ConnectionId, UnboundedSender<String>)>,
}

/// Chat broadcast usecase
pub struct BroadcastChatUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl BroadcastChatUseCase {
    /// Create a new BroadcastChatUseCase
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Resolve the sender and the room-wide recipient list.
    ///
    /// Returns `None` when the sender is unregistered; the caller drops the
    /// message without surfacing an error.
    pub async fn execute(&self, conn_id: &ConnectionId) -> Option<ChatOutcome> {
        let sender = self.registry.membership(conn_id).await?;
        let recipients = self.registry.room_senders(&sender.room, None).await;
        Some(ChatOutcome { sender, recipients })
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
    async fn test_chat_includes_sender_in_recipients() {
        // given (precondition): Ann and Bob share "lobby"
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        join(&registry, "c1", "Ann", "lobby").await;
        join(&registry, "c2", "Bob", "lobby").await;
        let usecase = BroadcastChatUseCase::new(registry.clone());

        // when (operation): Ann sends a message
        let outcome = usecase.execute(&conn("c1")).await.unwrap();

        // then (expected result): the whole room receives it, Ann included
        assert_eq!(outcome.sender.username.as_str(), "Ann");
        assert_eq!(outcome.recipients.len(), 2);
        assert!(outcome.recipients.iter().any(|(id, _)| id == &conn("c1")));
        assert!(outcome.recipients.iter().any(|(id, _)| id == &conn("c2")));
    }

    #[tokio::test]
    async fn test_chat_does_not_cross_rooms() {
        // given (precondition): Cat is in another room
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        join(&registry, "c1", "Ann", "lobby").await;
        join(&registry, "c3", "Cat", "attic").await;
        let usecase = BroadcastChatUseCase::new(registry.clone());

        // when (operation):
        let outcome = usecase.execute(&conn("c1")).await.unwrap();

        // then (expected result): Cat is not a recipient
        assert!(!outcome.recipients.iter().any(|(id, _)| id == &conn("c3")));
    }

    #[tokio::test]
    async fn test_chat_from_unregistered_is_dropped() {
        // given (precondition): the sender never joined (or its disconnect
        // already cleaned it up)
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = BroadcastChatUseCase::new(registry.clone());

        // when (operation):
        let outcome = usecase.execute(&conn("ghost")).await;

        // then (expected result): silently dropped
        assert!(outcome.is_none());
    }
}

//! UseCase: relay a typing indicator to the rest of the sender's room.
//!
//! No registry mutation. The indicator is never echoed back to its
//! originator, and is silently dropped when the sender is unregistered.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::domain::{ConnectionId, ConnectionRegistry, Membership};

/// Fan-out data for one typing update.
#[derive(Debug)]
pub struct TypingOutcome {
    /// Membership of the typist
    pub sender: Membership,
    /// Room members excluding the typist
    pub recipients: Vec<(ConnectionId, UnboundedSender<String>)>,
}

/// Typing relay usecase
pub struct UpdateTypingUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl UpdateTypingUseCase {
    /// Create a new UpdateTypingUseCase
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Resolve the typist and everyone else in their room.
    ///
    /// Returns `None` when the sender is unregistered.
    pub async fn execute(&self, conn_id: &ConnectionId) -> Option<TypingOutcome> {
        let sender = self.registry.membership(conn_id).await?;
        let recipients = self
            .registry
            .room_senders(&sender.room, Some(conn_id.clone()))
            .await;
        Some(TypingOutcome { sender, recipients })
    }
}

//! UseCase: join a room.
//!
//! Validates the normalized join request, registers the connection, and
//! gathers everything the handler needs to fan out: the `init` snapshot for
//! the joiner, the peers to notify, and the new room size.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::{
    domain::{ConnectionId, ConnectionRegistry, RegistryError, RoomId, RoomMember, Username},
    infrastructure::dto::websocket::JoinRequest,
};

use super::error::JoinError;

/// Result of a successful join, ready for fan-out.
#[derive(Debug)]
pub struct JoinOutcome {
    /// Validated display name of the joiner
    pub username: Username,
    /// Room the connection ended up in (requested or default)
    pub room: RoomId,
    /// Members of the room excluding the joiner, post-join
    pub snapshot: Vec<RoomMember>,
    /// Fan-out targets excluding the joiner
    pub peers: Vec<(ConnectionId, UnboundedSender<String>)>,
    /// Room size including the joiner
    pub room_size: usize,
}

/// Join usecase
pub struct JoinRoomUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl JoinRoomUseCase {
    /// Create a new JoinRoomUseCase
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Execute the join.
    ///
    /// # Errors
    ///
    /// * `JoinError::Validation` - empty/overlong display name or room id
    /// * `JoinError::AlreadyJoined` - the connection is already registered
    pub async fn execute(
        &self,
        conn_id: ConnectionId,
        request: JoinRequest,
        sender: UnboundedSender<String>,
    ) -> Result<JoinOutcome, JoinError> {
        let username = Username::new(&request.username)?;
        let room = RoomId::resolve(request.room.as_deref())?;

        self.registry
            .register(conn_id.clone(), username.clone(), room.clone(), sender)
            .await
            .map_err(|RegistryError::AlreadyRegistered(id)| JoinError::AlreadyJoined(id))?;

        let snapshot = self
            .registry
            .list_room_members(&room, Some(conn_id.clone()))
            .await;
        let peers = self
            .registry
            .room_senders(&room, Some(conn_id.clone()))
            .await;
        let room_size = self.registry.room_size(&room).await;

        Ok(JoinOutcome {
            username,
            room,
            snapshot,
            peers,
            room_size,
        })
    }
}

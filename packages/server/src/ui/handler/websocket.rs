//! WebSocket connection handler: the presence & broadcast protocol driver.
//!
//! One task pair per connection: a receive loop that dispatches inbound
//! events through the usecases, and a send loop that drains this
//! connection's outbound queue into the socket. Fan-out never touches the
//! socket directly — it enqueues onto the recipients' unbounded channels and
//! moves on (fire-and-forget, no acknowledgment awaited), so no handler
//! blocks on I/O.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc::{self, UnboundedSender};

use piazza_shared::time::local_time_string;

use crate::{
    domain::ConnectionId,
    infrastructure::dto::websocket::{ClientEvent, JoinPayload, ServerEvent},
    ui::state::AppState,
    usecase::{
        BroadcastChatUseCase, DisconnectUseCase, JoinError, JoinRoomUseCase, UpdateTypingUseCase,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // The transport assigns the opaque connection identifier on accept;
    // a reconnect gets a fresh one, there is no session resumption.
    let conn_id = ConnectionId::generate();
    tracing::info!("Connection '{}' accepted", conn_id);
    ws.on_upgrade(move |socket| handle_socket(socket, state, conn_id))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, conn_id: ConnectionId) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // This connection's outbound queue; every event addressed to it, from
    // any handler, goes through here.
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    // Handshake: tell the client which id it was assigned.
    let _ = tx.send(ServerEvent::connected(&conn_id).to_json());

    // Drain the outbound queue into the socket.
    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if ws_sender.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    // Dispatch inbound events until the peer goes away.
    let recv_state = state.clone();
    let recv_conn_id = conn_id.clone();
    let recv_tx = tx.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", recv_conn_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    dispatch_event(&recv_state, &recv_conn_id, &recv_tx, text.as_str()).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping from '{}'", recv_conn_id);
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", recv_conn_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Graceful or not, disconnect is the only leave transition. It takes
    // the same dispatch lock as inbound events so its notifications are
    // ordered with every other broadcast.
    let _ordered = state.event_lock.lock().await;
    let disconnect_usecase = DisconnectUseCase::new(state.registry.clone());
    match disconnect_usecase.execute(&conn_id).await {
        Some(outcome) if !outcome.remaining.is_empty() => {
            tracing::info!(
                "'{}' ({}) left room '{}'",
                outcome.membership.username,
                conn_id,
                outcome.membership.room
            );
            fan_out(
                &outcome.remaining,
                &ServerEvent::user_left(&conn_id, &outcome.membership.username),
            );
            fan_out(
                &outcome.remaining,
                &ServerEvent::UserCount(outcome.remaining.len()),
            );
        }
        Some(outcome) => {
            // Room became empty: entry deleted, no one left to notify.
            tracing::info!(
                "'{}' ({}) left room '{}', room is now gone",
                outcome.membership.username,
                conn_id,
                outcome.membership.room
            );
        }
        None => {
            tracing::debug!("Connection '{}' disconnected before joining", conn_id);
        }
    }
}

async fn dispatch_event(
    state: &Arc<AppState>,
    conn_id: &ConnectionId,
    tx: &UnboundedSender<String>,
    text: &str,
) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Unparseable event from '{}': {}", conn_id, e);
            return;
        }
    };

    // Handlers read registry state and enqueue the resulting broadcasts as
    // separate steps; the dispatch lock spans both, so the fan-out of this
    // event is complete before any other connection's event is dispatched
    // and all recipients in a room see broadcasts in the same order.
    let _ordered = state.event_lock.lock().await;
    match event {
        ClientEvent::Join(payload) => handle_join(state, conn_id, tx, payload).await,
        ClientEvent::ChatMessage { message } => handle_chat(state, conn_id, message).await,
        ClientEvent::Typing(is_typing) => handle_typing(state, conn_id, is_typing).await,
    }
}

async fn handle_join(
    state: &Arc<AppState>,
    conn_id: &ConnectionId,
    tx: &UnboundedSender<String>,
    payload: JoinPayload,
) {
    let usecase = JoinRoomUseCase::new(state.registry.clone());
    let outcome = match usecase
        .execute(conn_id.clone(), payload.normalize(), tx.clone())
        .await
    {
        Ok(outcome) => outcome,
        Err(JoinError::Validation(e)) => {
            // The client is expected to reject these before emitting; the
            // server guard just drops the request.
            tracing::warn!("Rejected join from '{}': {}", conn_id, e);
            return;
        }
        Err(JoinError::AlreadyJoined(_)) => {
            tracing::warn!(
                "Connection '{}' sent join while already registered, ignoring",
                conn_id
            );
            return;
        }
    };

    tracing::info!(
        "'{}' ({}) joined room '{}' ({} members)",
        outcome.username,
        conn_id,
        outcome.room,
        outcome.room_size
    );

    // To the joiner: the membership snapshot (everyone else, post-join).
    let _ = tx.send(ServerEvent::init(outcome.snapshot).to_json());

    // To the rest of the room: who arrived.
    fan_out(
        &outcome.peers,
        &ServerEvent::user_joined(conn_id, &outcome.username),
    );

    // To the whole room, joiner included: the new size.
    let count = ServerEvent::UserCount(outcome.room_size);
    fan_out(&outcome.peers, &count);
    let _ = tx.send(count.to_json());
}

async fn handle_chat(state: &Arc<AppState>, conn_id: &ConnectionId, message: String) {
    let usecase = BroadcastChatUseCase::new(state.registry.clone());
    let Some(outcome) = usecase.execute(conn_id).await else {
        tracing::debug!("Dropped chat_message from unregistered '{}'", conn_id);
        return;
    };

    let event = ServerEvent::chat_message(
        conn_id,
        &outcome.sender.username,
        message,
        local_time_string(),
    );
    fan_out(&outcome.recipients, &event);
}

async fn handle_typing(state: &Arc<AppState>, conn_id: &ConnectionId, is_typing: bool) {
    let usecase = UpdateTypingUseCase::new(state.registry.clone());
    let Some(outcome) = usecase.execute(conn_id).await else {
        tracing::debug!("Dropped typing from unregistered '{}'", conn_id);
        return;
    };

    fan_out(
        &outcome.recipients,
        &ServerEvent::typing(conn_id, &outcome.sender.username, is_typing),
    );
}

/// Enqueue one event to every recipient. Never blocks; a closed channel
/// means the recipient is tearing down and its disconnect will clean up.
fn fan_out(recipients: &[(ConnectionId, UnboundedSender<String>)], event: &ServerEvent) {
    let payload = event.to_json();
    for (id, sender) in recipients {
        if sender.send(payload.clone()).is_err() {
            tracing::warn!("Failed to enqueue event to client '{}'", id);
        }
    }
}

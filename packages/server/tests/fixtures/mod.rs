//! Integration test fixtures: a server on an ephemeral port and a minimal
//! WebSocket test client speaking the wire protocol.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use piazza_server::ui::{build_router, state::AppState};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// A piazza server running in-process on an ephemeral port.
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let state = AppState::new();
        let app = build_router(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no local addr");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server failed");
        });

        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// One connected protocol client. The transport-assigned id is captured from
/// the `connected` handshake frame.
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pub socket_id: String,
}

impl TestClient {
    /// Connect and consume the `connected` handshake.
    pub async fn connect(server: &TestServer) -> Self {
        let (stream, _) = connect_async(server.ws_url())
            .await
            .expect("failed to connect test client");
        let mut client = Self {
            stream,
            socket_id: String::new(),
        };

        let connected = client.recv().await;
        assert_eq!(connected["type"], "connected");
        client.socket_id = connected["data"]["socketId"]
            .as_str()
            .expect("connected frame carries socketId")
            .to_string();
        client
    }

    pub async fn send(&mut self, event: Value) {
        self.stream
            .send(Message::text(event.to_string()))
            .await
            .expect("failed to send test frame");
    }

    pub async fn join(&mut self, username: &str, room: &str) {
        self.send(json!({"type": "join", "data": {"username": username, "room": room}}))
            .await;
    }

    /// Next text frame, panicking after a timeout.
    pub async fn recv(&mut self) -> Value {
        self.try_recv(RECV_TIMEOUT)
            .await
            .expect("timed out waiting for a frame")
    }

    /// Next text frame within `timeout`, `None` if nothing arrives.
    pub async fn try_recv(&mut self, timeout: Duration) -> Option<Value> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let msg = tokio::time::timeout_at(deadline, self.stream.next())
                .await
                .ok()??;
            match msg.expect("websocket error in test client") {
                Message::Text(text) => {
                    return Some(serde_json::from_str(text.as_str()).expect("non-JSON frame"));
                }
                Message::Close(_) => return None,
                _ => continue,
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

//! Piazza CLI chat client.
//!
//! Joins a room, mirrors presence locally, and renders the room as text:
//! joins/leaves, chat lines with server timestamps, the user count, and the
//! aggregate typing indicator.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin piazza-client -- --username Ann --room lobby
//! ```

use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use piazza_client::{CacheUpdate, PresenceCache, TypingNotifier};
use piazza_server::infrastructure::dto::websocket::{ClientEvent, JoinPayload, ServerEvent};
use piazza_shared::setup_logger;

/// CLI chat client for the Piazza avatar chat
#[derive(Debug, Parser)]
#[command(name = "piazza-client", version, about)]
struct Args {
    /// WebSocket endpoint of the piazza server
    #[arg(long, default_value = "ws://127.0.0.1:3000/ws")]
    url: String,

    /// Display name to join with (must not be blank)
    #[arg(long)]
    username: String,

    /// Room to join; the server default room when omitted
    #[arg(long)]
    room: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    // The empty-name rejection is local-only: nothing is sent.
    if args.username.trim().is_empty() {
        eprintln!("error: username must not be empty");
        std::process::exit(2);
    }

    if let Err(e) = run(args).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let (socket, _) = connect_async(&args.url).await?;
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Everything outbound (join, chat, typing) funnels through one queue.
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let send_task = tokio::spawn(async move {
        while let Some(payload) = out_rx.recv().await {
            if ws_sender.send(Message::text(payload)).await.is_err() {
                break;
            }
        }
    });

    let join = ClientEvent::Join(JoinPayload::Full {
        username: args.username.clone(),
        room: args.room.clone(),
    });
    out_tx.send(serde_json::to_string(&join)?)?;

    let typing = TypingNotifier::spawn(out_tx.clone());
    let mut lines = spawn_input_reader();
    let mut cache = PresenceCache::new(args.username.clone());

    println!(
        "* joining '{}' as {}",
        args.room.as_deref().unwrap_or("default"),
        args.username
    );

    loop {
        tokio::select! {
            msg = ws_receiver.next() => {
                let Some(Ok(msg)) = msg else {
                    println!("* disconnected");
                    break;
                };
                if let Message::Text(text) = msg {
                    match serde_json::from_str::<ServerEvent>(text.as_str()) {
                        Ok(event) => {
                            if let Some(update) = cache.apply(event) {
                                render(&cache, update);
                            }
                        }
                        Err(e) => tracing::warn!("Unparseable server event: {}", e),
                    }
                }
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    break; // stdin closed
                };
                let message = line.trim().to_string();
                if message.is_empty() {
                    continue;
                }
                typing.keystroke();
                let event = ClientEvent::ChatMessage { message };
                out_tx.send(serde_json::to_string(&event)?)?;
            }
        }
    }

    send_task.abort();
    Ok(())
}

/// Read stdin lines on a blocking thread and forward them to the event loop.
fn spawn_input_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || {
        let Ok(mut editor) = rustyline::DefaultEditor::new() else {
            return;
        };
        loop {
            match editor.readline("") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break, // Ctrl+C / Ctrl+D / read error
            }
        }
    });

    rx
}

fn render(cache: &PresenceCache, update: CacheUpdate) {
    match update {
        CacheUpdate::Seeded { peer_count } => {
            println!("* you're in ({peer_count} already here)");
        }
        CacheUpdate::PeerJoined { note, .. } | CacheUpdate::PeerLeft { note, .. } => {
            println!("* {note}");
        }
        CacheUpdate::SpeechBubble {
            socket_id,
            username,
            message,
            timestamp,
        } => {
            let who = if cache.local_id() == Some(socket_id.as_str()) {
                "you".to_string()
            } else {
                username
            };
            println!("[{timestamp}] {who}: {message}");
        }
        CacheUpdate::TypingChanged { summary } => {
            if let Some(summary) = summary {
                println!("* {summary}");
            }
        }
        CacheUpdate::UserCount(count) => {
            let plural = if count == 1 { "" } else { "s" };
            println!("* {count} user{plural} online");
        }
    }
}

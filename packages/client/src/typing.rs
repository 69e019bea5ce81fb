//! Debounced typing-state transmission.
//!
//! The first keystroke of a burst sends `typing(true)` immediately; after
//! 1000 ms without a keystroke, `typing(false)` is sent once. Every
//! keystroke resets the idle timer, so at most one outstanding timer exists
//! per connection and `typing(false)` fires at most once per quiet period.

use std::time::Duration;

use tokio::{
    sync::mpsc::{self, UnboundedSender},
    task::JoinHandle,
};

use piazza_server::infrastructure::dto::websocket::ClientEvent;

/// Quiet period after the last keystroke before `typing(false)` is sent.
pub const TYPING_IDLE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Owns the idle timer for one connection and writes serialized `typing`
/// events onto the connection's outbound queue.
pub struct TypingNotifier {
    keystrokes: UnboundedSender<()>,
    task: JoinHandle<()>,
}

impl TypingNotifier {
    /// Spawn the notifier task feeding `outbound`.
    pub fn spawn(outbound: UnboundedSender<String>) -> Self {
        let (keystrokes, mut rx) = mpsc::unbounded_channel::<()>();

        let task = tokio::spawn(async move {
            let mut typing = false;
            loop {
                if typing {
                    tokio::select! {
                        key = rx.recv() => {
                            if key.is_none() {
                                break;
                            }
                            // Re-entering the select re-arms the idle timer.
                        }
                        _ = tokio::time::sleep(TYPING_IDLE_TIMEOUT) => {
                            let _ = outbound.send(typing_event(false));
                            typing = false;
                        }
                    }
                } else {
                    match rx.recv().await {
                        Some(()) => {
                            let _ = outbound.send(typing_event(true));
                            typing = true;
                        }
                        None => break,
                    }
                }
            }
        });

        Self { keystrokes, task }
    }

    /// Record one keystroke.
    pub fn keystroke(&self) {
        let _ = self.keystrokes.send(());
    }
}

impl Drop for TypingNotifier {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn typing_event(is_typing: bool) -> String {
    serde_json::to_string(&ClientEvent::Typing(is_typing))
        .expect("ClientEvent serialization cannot fail")
}

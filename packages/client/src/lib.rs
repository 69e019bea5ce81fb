//! Piazza chat client library.
//!
//! The client-side half of the presence protocol: a local mirror of "who is
//! in the room with me" rebuilt from server events, and the debounced typing
//! transmitter. The CLI binary renders the mirror as text; a graphical
//! client would consume the same cache.

pub mod presence;
pub mod typing;

pub use presence::{CacheUpdate, Peer, PresenceCache};
pub use typing::TypingNotifier;

//! UseCase layer.
//!
//! One usecase per inbound protocol event. Each usecase drives the
//! Connection Registry and returns who should be notified; actually fanning
//! the events out is the UI layer's job.

pub mod broadcast_chat;
pub mod disconnect;
pub mod error;
pub mod join_room;
pub mod update_typing;

pub use broadcast_chat::{BroadcastChatUseCase, ChatOutcome};
pub use disconnect::{DisconnectOutcome, DisconnectUseCase};
pub use error::JoinError;
pub use join_room::{JoinOutcome, JoinRoomUseCase};
pub use update_typing::{TypingOutcome, UpdateTypingUseCase};

//! Piazza chat server library.
//!
//! Authoritative room presence and message-broadcast protocol for a
//! multi-user avatar chat room. The server tracks which connection belongs to
//! which room and fans out presence, typing, and chat events to room members
//! over WebSocket.

pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub use error::ServerError;
pub use ui::run;

//! Domain layer for the presence protocol.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod registry;
pub mod value_object;

pub use entity::{Membership, RoomMember, RoomSummary};
pub use error::{RegistryError, ValueObjectError};
pub use registry::ConnectionRegistry;
pub use value_object::{ConnectionId, RoomId, Username};

//! Data transfer objects for the external interfaces.

pub mod http;
pub mod websocket;

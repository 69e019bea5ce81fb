//! Shared utilities for the Piazza chat application.
//!
//! Cross-cutting concerns used by both the server and the CLI client:
//! logger setup and time formatting.

pub mod logger;
pub mod time;

pub use logger::setup_logger;
pub use time::local_time_string;

//! Shared server state.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{domain::ConnectionRegistry, infrastructure::repository::InMemoryConnectionRegistry};

/// Shared application state
pub struct AppState {
    /// The authoritative presence registry (data access abstraction)
    pub registry: Arc<dyn ConnectionRegistry>,
    /// Orders event dispatch across connection tasks: the fan-out of one
    /// inbound event (or disconnect) is fully enqueued before the next one
    /// is processed, so room members observe broadcasts in a single order.
    pub event_lock: Mutex<()>,
}

impl AppState {
    /// Create state backed by a fresh in-memory registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            registry: Arc::new(InMemoryConnectionRegistry::new()),
            event_lock: Mutex::new(()),
        })
    }
}

//! Server state shared by all handlers.

use serde::Deserialize;
use std::sync::Arc;

use crate::{
    domain::{PlayerRepository, PresenceRepository},
    infrastructure::repository::{InMemoryPlayerRepository, InMemoryPresenceRepository},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub app_id: String,
}

/// Shared application state
pub struct AppState {
    /// Application identifier clients must present
    pub app_id: String,
    /// Durable player table
    pub players: Arc<dyn PlayerRepository>,
    /// Volatile presence registry
    pub presence: Arc<dyn PresenceRepository>,
}

impl AppState {
    /// State backed by the in-memory repositories
    pub fn in_memory(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            players: Arc::new(InMemoryPlayerRepository::new()),
            presence: Arc::new(InMemoryPresenceRepository::new()),
        }
    }
}

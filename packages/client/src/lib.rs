//! Terminal client for the Tapboard click counter game.
//!
//! The [`ClickCounter`] controller holds the local session state, issues
//! transactions through a [`DataService`], and derives the view from the
//! latest query snapshot. [`RealtimeClient`] is the WebSocket implementation
//! of that service, plus the query and presence streams.

pub mod app;
pub mod config;
pub mod connection;
pub mod controller;
pub mod error;
pub mod input;
pub mod leaderboard;
pub mod presence;
pub mod service;
pub mod view;

// Re-export entry points
pub use app::run_client;
pub use config::{ClickMode, ClientConfig};
pub use connection::{QuerySubscription, RealtimeClient, RoomHandle};
pub use controller::{ClickCounter, SessionState};
pub use error::ClientError;
pub use service::{DataService, QueryState};

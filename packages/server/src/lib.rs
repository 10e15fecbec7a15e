//! Realtime data service for Tapboard.
//!
//! Serves three things over a single WebSocket per client: reactive
//! "all players" queries, merge-style transactions on the player table, and
//! ephemeral presence rooms for cursors. A small HTTP API exposes health and
//! debugging views.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::{create_app, run as run_server, serve};

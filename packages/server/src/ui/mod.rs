//! UI layer: axum router, HTTP and WebSocket handlers.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{create_app, run, serve};

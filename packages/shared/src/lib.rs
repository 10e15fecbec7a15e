//! Shared utilities for Tapboard.
//!
//! Logger setup, time helpers and the well-known defaults used by both the
//! realtime service and the terminal client.

pub mod constants;
pub mod logger;
pub mod time;

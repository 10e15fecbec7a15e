//! Command line configuration of the realtime service.

use clap::Parser;
use tapboard_shared::constants::{DEFAULT_APP_ID, DEFAULT_HOST, DEFAULT_PORT};

/// Realtime data service for the Tapboard click counter game
#[derive(Debug, Clone, Parser)]
#[command(name = "tapboard-server", version, about)]
pub struct ServerConfig {
    /// Host address to bind
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Application identifier clients must present when connecting
    #[arg(long, default_value = DEFAULT_APP_ID)]
    pub app_id: String,
}

impl ServerConfig {
    /// `host:port` to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

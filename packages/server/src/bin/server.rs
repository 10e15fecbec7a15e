//! Tapboard realtime data service.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tapboard-server -- --port 8080
//! ```

use clap::Parser;
use tapboard_server::ServerConfig;
use tapboard_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    // Run the server
    if let Err(e) = tapboard_server::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

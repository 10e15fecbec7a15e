//! Tapboard terminal client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tapboard-client -- --url ws://127.0.0.1:8080
//! ```

use clap::Parser;
use tapboard_client::{ClientConfig, run_client};
use tapboard_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ClientConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

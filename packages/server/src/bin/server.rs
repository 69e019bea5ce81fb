//! Piazza chat server binary.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin piazza-server
//! ```

use clap::Parser;

use piazza_shared::setup_logger;

/// Room presence and message-broadcast server for the Piazza avatar chat
#[derive(Debug, Parser)]
#[command(name = "piazza-server", version, about)]
struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    // Run the server
    if let Err(e) = piazza_server::run(args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

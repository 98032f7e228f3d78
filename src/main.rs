//! Books API service.
//!
//! ```text
//!   client ──▶ axum router ──▶ handler ──▶ BookService ──▶ BookStore ──▶ postgres
//!                 │                                                   └─▶ memory
//!                 └─ request id · tracing · CORS · timeout · body limit · metrics
//! ```

use std::path::PathBuf;

use clap::Parser;

use books_api::config;
use books_api::lifecycle::startup;
use books_api::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "books-api")]
#[command(about = "CRUD HTTP service for books", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "BOOKS_API_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = config::load(args.config.as_deref())?;

    init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "books-api starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        storage = ?config.storage.backend,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

//! # Wikiquote Tweet
//!
//! A Rust web service that tweets a random inspirational quote from Wikiquote
//! whenever its trigger endpoint receives a button event.
//!
//! ## Environment Variables
//!
//! - `PIXABAY_KEY`: pixabay.com API key
//! - `xapi_access_token`: Twitter API Access token (OAuth 2.0 User Context)
//! - `TEMP_DIRECTORY`: image download directory (defaults to `/tmp`)
//! - `PORT`: Server port (defaults to 3000)
//!
//! ## API Endpoints
//!
//! - `GET /`: Returns a welcome message
//! - `GET /health`: Returns service health status
//! - `POST /trigger`: Tweets a quote in the language selected by the click type

use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use wikiquote_tweet::{build_router, get_server_port, AppConfig};

/// Main entry point for the wikiquote-tweet web service.
///
/// This function initializes the logging system, loads the configuration once,
/// sets up the HTTP server with all routes, and serves until Ctrl+C.
///
/// # Logging
///
/// The application uses the `env_logger` crate for structured logging. Log levels
/// can be controlled via the `RUST_LOG` environment variable.
///
/// # Example Usage
///
/// ```bash
/// RUST_LOG=info PIXABAY_KEY=... xapi_access_token=... cargo run
///
/// curl -X POST localhost:3000/trigger \
///      -H 'Content-Type: application/json' \
///      -d '{"clickType": "DOUBLE"}'
/// ```
#[tokio::main]
async fn main() {
    // Initialize the logging system
    env_logger::init();

    let config = match AppConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let app = build_router(config).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let port = get_server_port();
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    info!("Starting wikiquote-tweet server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Received shutdown signal, stopping server");
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
    {
        error!("HTTP server error: {}", e);
    }
}

//! # Wikiquote Tweet Library
//!
//! A Rust library that finds random inspirational quotes on Wikiquote and tweets
//! them via the Twitter/X API using OAuth 2.0 User Context Access Token
//! authentication, optionally with a matching image from pixabay.com.
//!
//! ## Features
//!
//! - Randomized quote search over Wikiquote categories, pages, sections and lines
//! - Tweet formatting with an inlined or appended theme hashtag
//! - Pixabay image search and Twitter media upload
//! - HTTP trigger endpoint mapping button click types to languages
//! - Structured logging
//!
//! ## Configuration
//!
//! The following environment variables are read once at startup:
//! - `PIXABAY_KEY`: pixabay.com API key
//! - `xapi_access_token`: Twitter API Access Token
//! - `xapi_refresh_token`, `xapi_client_id`, `xapi_client_secret`: optional, enable token refresh
//! - `TEMP_DIRECTORY`: image download directory (defaults to `/tmp`)
//! - `PORT`: Server port (defaults to 3000)
//!
//! ## API Endpoints
//!
//! - `GET /`: Returns a welcome message
//! - `GET /health`: Returns service health status
//! - `POST /trigger`: Tweets a quote for a button event (`{"clickType": "SINGLE"}`)

pub mod config;
pub mod handlers;
pub mod oauth;
pub mod pixabay;
pub mod publisher;
pub mod twitter;
pub mod wikiquote;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

// Re-export commonly used types and functions
pub use config::{get_server_port, AppConfig, TwitterConfig};
pub use handlers::{handle_health, handle_root, handle_trigger, ButtonEvent, ClickType};
pub use oauth::build_oauth2_user_context_header;
pub use publisher::{publish_quote, tweet_inspirational_quote, Language, QuoteOutlet};
pub use twitter::TweetReference;

/// Builds the HTTP router with every route of the service.
///
/// Middleware is layered on by the caller so tests can exercise the bare routes.
pub fn build_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/trigger", post(handle_trigger))
        .with_state(config)
}

#[cfg(test)]
mod tests;

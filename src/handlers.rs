//! HTTP route handlers for the wikiquote-tweet service.
//!
//! This module contains the HTTP route handler functions, most importantly the
//! button trigger that tweets a quote in the language selected by the click type.

use axum::{extract::State, http::StatusCode, response::Json};
use log::{error, info};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::publisher::{tweet_inspirational_quote, Language};

/// Click patterns reported by the IoT button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClickType {
    Single,
    Double,
    Long,
}

impl ClickType {
    /// SINGLE tweets in English, DOUBLE in Spanish and LONG in Portuguese.
    pub fn language(self) -> Language {
        match self {
            ClickType::Single => Language::English,
            ClickType::Double => Language::Spanish,
            ClickType::Long => Language::Portuguese,
        }
    }
}

/// Event sent by the button. Any other fields of the event are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ButtonEvent {
    #[serde(rename = "clickType")]
    pub click_type: ClickType,
}

/// Handles GET requests to the root `/` endpoint.
pub async fn handle_root() -> &'static str {
    "Press the button for an inspirational quote!"
}

/// Handles GET requests to the `/health` endpoint.
///
/// # Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "wikiquote-tweet"
/// }
/// ```
pub async fn handle_health() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "wikiquote-tweet"}))
}

/// Handles POST requests to the `/trigger` endpoint.
///
/// Maps the event's click type to a language and tweets an inspirational quote
/// in it. Bodies with a missing or unknown `clickType` are rejected by the JSON
/// extractor before this handler runs.
///
/// # Success Response
///
/// `tweet_url` is `null` when no quote could be found and nothing was posted.
///
/// ```json
/// {
///   "status": "success",
///   "language": "es",
///   "tweet_url": "https://twitter.com/i/web/status/1234567890"
/// }
/// ```
///
/// # Error Response
///
/// ```json
/// {
///   "status": "error",
///   "message": "Failed to tweet quote",
///   "error": "<error details>"
/// }
/// ```
pub async fn handle_trigger(
    State(config): State<Arc<AppConfig>>,
    Json(event): Json<ButtonEvent>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    info!("Received event: {:?}", event);
    let language = event.click_type.language();
    info!("Language: {}", language.code());

    match tweet_inspirational_quote(&config, language).await {
        Ok(tweet) => {
            let tweet_url = tweet.map(|tweet| tweet.url());
            match &tweet_url {
                Some(url) => info!("Quote tweeted: {}", url),
                None => info!("No quote was tweeted"),
            }
            Ok(Json(json!({
                "status": "success",
                "language": language.code(),
                "tweet_url": tweet_url
            })))
        }
        Err(e) => {
            error!("Failed to tweet quote: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(
                    json!({"status": "error", "message": "Failed to tweet quote", "error": e.to_string()}),
                ),
            ))
        }
    }
}

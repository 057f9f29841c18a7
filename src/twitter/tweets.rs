//! Tweet operations for Twitter API.
//!
//! This module contains the function for posting tweets, with or without
//! attached media, using the Twitter API v2.

use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::TwitterConfig;

use super::api::{make_authenticated_request, sanitize_for_logging};

const TWEETS_URL: &str = "https://api.x.com/2/tweets";

/// A tweet as returned by the posting endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TweetReference {
    /// The tweet ID
    pub id: String,
    /// The text Twitter stored for the tweet
    pub text: String,
}

impl TweetReference {
    /// Public URL of the tweet. It resolves without knowing the author's handle.
    pub fn url(&self) -> String {
        format!("https://twitter.com/i/web/status/{}", self.id)
    }
}

#[derive(Debug, Deserialize)]
struct PostTweetResponse {
    data: TweetReference,
}

/// Builds the JSON body for the create-tweet endpoint.
pub(crate) fn build_tweet_payload(text: &str, media_ids: &[String]) -> serde_json::Value {
    if media_ids.is_empty() {
        json!({ "text": text })
    } else {
        json!({
            "text": text,
            "media": { "media_ids": media_ids }
        })
    }
}

/// Posts a tweet to Twitter/X using the API v2 endpoint.
///
/// # Parameters
///
/// - `config`: Mutable reference to TwitterConfig (may be updated with new token)
/// - `text`: The text content of the tweet to post
/// - `media_ids`: IDs returned by [`super::upload_media`]; empty for a text-only tweet
///
/// # Returns
///
/// - `Ok(TweetReference)`: The posted tweet
/// - `Err(Box<dyn std::error::Error + Send + Sync>)`: If authentication fails, network error, or API error
///
/// # Errors
///
/// A duplicate-status rejection is returned as an error like any other API failure.
pub async fn post_tweet(
    config: &mut TwitterConfig,
    text: &str,
    media_ids: &[String],
) -> Result<TweetReference, Box<dyn std::error::Error + Send + Sync>> {
    info!(
        "Starting tweet post operation ({} chars, {} media): '{}'",
        text.chars().count(),
        media_ids.len(),
        sanitize_for_logging(text, 280)
    );

    let client = Client::new();
    let payload = build_tweet_payload(text, media_ids);
    debug!("Tweet payload: {}", serde_json::to_string_pretty(&payload)?);
    debug!("Request headers: Authorization: Bearer [REDACTED], Content-Type: application/json");

    let response_text = make_authenticated_request(config, "post_tweet", || {
        client
            .post(TWEETS_URL)
            .header("Content-Type", "application/json")
            .json(&payload)
    })
    .await?;

    let response: PostTweetResponse = serde_json::from_str(&response_text)?;
    info!("Tweet posted with id {}", response.data.id);
    Ok(response.data)
}

//! OAuth authentication module for Twitter/X API integration.
//!
//! This module contains the OAuth 2.0 User Context helpers used to post tweets
//! and upload media on behalf of the bot account.

use log::{debug, info};
use std::collections::HashMap;

use crate::twitter::sanitize_for_logging;

/// Twitter's OAuth 2.0 token endpoint, used for both code exchange and refresh.
pub const TOKEN_URL: &str = "https://api.x.com/2/oauth2/token";

/// Builds the Authorization header for OAuth 2.0 User Context authentication.
///
/// # Format
///
/// ```text
/// Bearer YOUR_ACCESS_TOKEN_HERE
/// ```
///
/// # Example
///
/// ```rust
/// use wikiquote_tweet::build_oauth2_user_context_header;
///
/// let header = build_oauth2_user_context_header("your_access_token");
/// assert_eq!(header, "Bearer your_access_token");
/// ```
pub fn build_oauth2_user_context_header(access_token: &str) -> String {
    format!("Bearer {}", access_token)
}

/// Refreshes an OAuth 2.0 User Context access token using a refresh token.
///
/// # Returns
///
/// - `Ok((access_token, Some(refresh_token)))`: Twitter rotated the refresh token as well
/// - `Ok((access_token, None))`: Only a new access token was issued
/// - `Err(...)`: If the request failed or the response carried no access token
pub async fn refresh_access_token(
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<(String, Option<String>), Box<dyn std::error::Error + Send + Sync>> {
    info!("Requesting new access token from {}", TOKEN_URL);
    let client = reqwest::Client::new();

    let mut params = HashMap::new();
    params.insert("grant_type", "refresh_token");
    params.insert("refresh_token", refresh_token);
    params.insert("client_id", client_id);

    let response = client
        .post(TOKEN_URL)
        .basic_auth(client_id, Some(client_secret))
        .form(&params)
        .send()
        .await?;

    let status = response.status();
    let response_text = response.text().await?;

    if !status.is_success() {
        debug!(
            "Token refresh error response: {}",
            sanitize_for_logging(&response_text, 200)
        );
        return Err(format!("Token refresh failed ({})", status).into());
    }

    let json: serde_json::Value = serde_json::from_str(&response_text)?;
    let access_token = json
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or("No access_token in response")?;
    let new_refresh_token = json
        .get("refresh_token")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    Ok((access_token.to_string(), new_refresh_token))
}

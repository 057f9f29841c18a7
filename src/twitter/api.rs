//! Core Twitter API utilities.
//!
//! This module contains low-level API utilities for making authenticated requests
//! to the Twitter API, including automatic token refresh on 401 errors.

use log::{debug, error, info, warn};
use reqwest::{RequestBuilder, StatusCode};

use crate::config::TwitterConfig;
use crate::oauth::build_oauth2_user_context_header;

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// This function:
/// - Truncates long text to prevent log flooding
/// - Replaces control characters that could manipulate log output
/// - Escapes newlines to prevent log injection
///
/// # Parameters
///
/// - `text`: The text to sanitize
/// - `max_len`: Maximum number of characters before truncation
pub(crate) fn sanitize_for_logging(text: &str, max_len: usize) -> String {
    let sanitized: Vec<char> = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.len() > max_len {
        format!(
            "{}... [truncated, {} total bytes]",
            sanitized[..max_len].iter().collect::<String>(),
            text.len()
        )
    } else {
        sanitized.into_iter().collect()
    }
}

/// Returns true when Twitter rejected a post because the same text was already tweeted.
pub(crate) fn is_duplicate_rejection(status: StatusCode, body: &str) -> bool {
    status == StatusCode::FORBIDDEN && body.to_lowercase().contains("duplicate")
}

/// Makes an authenticated request to the Twitter API with automatic token refresh on 401 errors.
///
/// The request is produced by `build_request` and the Authorization header is added
/// here. It is called a second time after a token refresh when the first attempt is
/// rejected with 401 Unauthorized, so request bodies that cannot be cloned
/// (multipart uploads) are rebuilt instead of replayed.
///
/// # Parameters
///
/// - `config`: Mutable reference to TwitterConfig (may be updated with new token)
/// - `operation_name`: Human-readable name for the operation (for logging)
/// - `build_request`: Builds the unauthenticated request
///
/// # Returns
///
/// - `Ok(String)`: The API response body on success
/// - `Err(Box<dyn std::error::Error + Send + Sync>)`: If the request fails or token refresh fails
pub(crate) async fn make_authenticated_request<F>(
    config: &mut TwitterConfig,
    operation_name: &str,
    build_request: F,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>>
where
    F: Fn() -> RequestBuilder,
{
    info!(
        "Making authenticated request for operation: {}",
        operation_name
    );

    let auth_header = build_oauth2_user_context_header(&config.access_token);
    let response = build_request()
        .header("Authorization", auth_header)
        .send()
        .await?;

    let status = response.status();
    info!(
        "Received response with status: {} for operation: {}",
        status, operation_name
    );

    if status.is_success() {
        let response_text = response.text().await?;
        info!("Operation '{}' completed successfully", operation_name);
        debug!(
            "Response summary for '{}': {} bytes received",
            operation_name,
            response_text.len()
        );
        return Ok(response_text);
    }

    if status != StatusCode::UNAUTHORIZED {
        let error_text = response.text().await?;
        return Err(api_error(operation_name, status, &error_text));
    }

    warn!(
        "Received 401 Unauthorized for operation '{}' - access token may be expired",
        operation_name
    );

    if !config.can_refresh_token() {
        error!(
            "Cannot refresh token for operation '{}' - missing refresh credentials",
            operation_name
        );
        return Err(format!(
            "Twitter API error (401) for operation '{}' and token refresh not available",
            operation_name
        )
        .into());
    }

    info!(
        "Attempting automatic token refresh for operation '{}'",
        operation_name
    );
    if let Err(e) = config.refresh_access_token().await {
        error!(
            "Token refresh failed for operation '{}': {}",
            operation_name, e
        );
        return Err(format!(
            "Token refresh failed for operation '{}': {}",
            operation_name, e
        )
        .into());
    }

    info!(
        "Token refreshed successfully, retrying operation '{}'",
        operation_name
    );
    let auth_header = build_oauth2_user_context_header(&config.access_token);
    let retry_response = build_request()
        .header("Authorization", auth_header)
        .send()
        .await?;

    let retry_status = retry_response.status();
    info!(
        "Retry response status: {} for operation '{}'",
        retry_status, operation_name
    );

    let response_text = retry_response.text().await?;
    if retry_status.is_success() {
        info!(
            "Operation '{}' completed successfully after token refresh",
            operation_name
        );
        Ok(response_text)
    } else {
        Err(api_error(operation_name, retry_status, &response_text))
    }
}

/// Logs a failed Twitter response and turns it into an error.
fn api_error(
    operation_name: &str,
    status: StatusCode,
    error_text: &str,
) -> Box<dyn std::error::Error + Send + Sync> {
    debug!(
        "Error response for '{}': {}",
        operation_name,
        sanitize_for_logging(error_text, 200)
    );

    // Duplicate statuses are reported as such but otherwise treated like any other failure.
    if is_duplicate_rejection(status, error_text) {
        error!(
            "Operation '{}' rejected by Twitter as a duplicate status",
            operation_name
        );
        return format!(
            "Twitter rejected duplicate status for operation '{}' ({})",
            operation_name, status
        )
        .into();
    }

    error!("Operation '{}' failed - Status: {}", operation_name, status);
    format!(
        "Twitter API error for operation '{}' ({})",
        operation_name, status
    )
    .into()
}

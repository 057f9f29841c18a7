//! Image search on pixabay.com.
//!
//! Finds a photo matching a quote's theme so it can be attached to the tweet.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;

use crate::twitter::sanitize_for_logging;

const PIXABAY_API_URL: &str = "https://pixabay.com/api/";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<ImageHit>,
}

#[derive(Debug, Deserialize)]
struct ImageHit {
    #[serde(rename = "webformatURL")]
    webformat_url: String,
}

/// Builds the query string for a Pixabay image search.
fn search_params<'a>(
    keyword: &'a str,
    language: &'a str,
    api_key: &'a str,
) -> [(&'a str, &'a str); 6] {
    [
        ("q", keyword),
        ("lang", language),
        ("image_type", "photo"),
        ("safesearch", "true"),
        ("editors_choice", "true"),
        ("key", api_key),
    ]
}

/// Picks one hit of a Pixabay search response at random.
fn pick_image<R: Rng + ?Sized>(
    body: &str,
    rng: &mut R,
) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .hits
        .choose(rng)
        .map(|hit| hit.webformat_url.clone()))
}

/// Randomly finds an image related to a keyword in the specified language.
///
/// The keyword and language are passed to Pixabay as-is, so they must conform
/// to its `q` and `lang` parameters.
///
/// # Parameters
///
/// - `client`: HTTP client to issue the search with
/// - `api_key`: A pixabay.com API key
/// - `keyword`: The keyword to search
/// - `language`: The keyword's language, as lowercase ISO-639-1
///
/// # Returns
///
/// - `Ok(Some(url))`: The `webformatURL` of a random matching image
/// - `Ok(None)`: If no image matched
/// - `Err(...)`: If the request failed or the response could not be decoded
pub async fn find_image<R: Rng + ?Sized>(
    client: &Client,
    api_key: &str,
    keyword: &str,
    language: &str,
    rng: &mut R,
) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
    info!("Searching image for '{}' in language {}", keyword, language);

    let response = client
        .get(PIXABAY_API_URL)
        .query(&search_params(keyword, language, api_key))
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        debug!(
            "Pixabay error response: {}",
            sanitize_for_logging(&body, 200)
        );
        return Err(format!("Pixabay API error ({})", status).into());
    }

    pick_image(&body, rng)
}

//! Media upload for Twitter API.

use log::{debug, info};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;

use crate::config::TwitterConfig;

use super::api::make_authenticated_request;

const MEDIA_UPLOAD_URL: &str = "https://api.x.com/2/media/upload";

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    data: UploadedMedia,
}

#[derive(Debug, Deserialize)]
struct UploadedMedia {
    id: String,
}

/// Uploads an image file and returns the media ID to attach to a tweet.
///
/// The whole file is read into memory and sent as a single multipart request
/// with `media_category=tweet_image`.
///
/// # Parameters
///
/// - `config`: Mutable reference to TwitterConfig (may be updated with new token)
/// - `path`: Path of the image on disk
pub async fn upload_media(
    config: &mut TwitterConfig,
    path: &Path,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image.jpg".to_string());

    info!(
        "Uploading media {} ({} bytes)",
        path.display(),
        bytes.len()
    );

    let client = Client::new();
    let response_text = make_authenticated_request(config, "upload_media", || {
        let part = Part::bytes(bytes.clone()).file_name(file_name.clone());
        let form = Form::new()
            .text("media_category", "tweet_image")
            .part("media", part);
        client.post(MEDIA_UPLOAD_URL).multipart(form)
    })
    .await?;

    let response: MediaUploadResponse = serde_json::from_str(&response_text)?;
    debug!("Uploaded media id: {}", response.data.id);
    Ok(response.data.id)
}

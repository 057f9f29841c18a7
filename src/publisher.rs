//! Quote publishing pipeline.
//!
//! Finds a random quote in the Wikiquote category of the requested language,
//! links it to its source page, attaches a Pixabay image when one matches the
//! quote's theme, and tweets it.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::config::{AppConfig, TwitterConfig};
use crate::pixabay::find_image;
use crate::twitter::{post_tweet, upload_media, TweetReference};
use crate::wikiquote::{
    find_quote_from_category, FoundQuote, WikiSource, WikiquoteClient, MAX_TWEET_LENGTH,
};

/// Characters Twitter charges for a link once it is shortened to t.co.
pub const MAX_TCO_URL_LENGTH: usize = 20;

/// Languages the bot tweets in. Each one searches its own Wikiquote site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Spanish,
    Portuguese,
}

impl Language {
    /// Maps a lowercase ISO-639-1 code to a language; unsupported codes fall back to English.
    ///
    /// The trigger endpoint selects languages by click type; this is the entry
    /// point for library callers that select them by code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "es" => Language::Spanish,
            "pt" => Language::Portuguese,
            "en" => Language::English,
            other => {
                warn!("Unsupported language '{}', falling back to English", other);
                Language::English
            }
        }
    }

    /// The ISO-639-1 code, also the subdomain of the Wikiquote site.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::Portuguese => "pt",
        }
    }

    /// The Wikiquote category searched for quotes.
    pub fn category(self) -> &'static str {
        match self {
            Language::English => "Virtues",
            Language::Spanish => "Virtudes",
            Language::Portuguese => "Sentimentos",
        }
    }
}

/// URL of the Wikiquote page a quote was taken from.
pub fn quote_source_url(theme: &str, language: Language) -> String {
    format!(
        "https://{}.wikiquote.org/{}",
        language.code(),
        urlencoding::encode(&theme.replace(' ', "_"))
    )
}

/// Builds the tweet text: the quote, followed by its source link when the link fits.
pub fn compose_message(quote: &FoundQuote, language: Language) -> String {
    let mut message = quote.text.clone();
    if message.chars().count() < MAX_TWEET_LENGTH - MAX_TCO_URL_LENGTH {
        message.push(' ');
        message.push_str(&quote_source_url(&quote.theme, language));
    }
    message
}

/// File name for a downloaded image: the last path segment of its URL.
pub(crate) fn image_file_name(
    image_url: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let url = url::Url::parse(image_url)?;
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| format!("Image URL has no file name: {}", image_url).into())
}

/// Download path for an image: its file name behind a random prefix, so
/// overlapping runs that picked the same image never share a file.
pub(crate) fn temp_image_path<R: Rng + ?Sized>(
    temp_dir: &Path,
    image_url: &str,
    rng: &mut R,
) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
    let name = image_file_name(image_url)?;
    Ok(temp_dir.join(format!("{:016x}-{}", rng.gen::<u64>(), name)))
}

/// A downloaded image that is deleted from disk when dropped.
#[derive(Debug)]
pub struct TempImage {
    path: PathBuf,
}

impl TempImage {
    /// Takes ownership of the file at `path`.
    pub fn new(path: PathBuf) -> Self {
        TempImage { path }
    }

    /// Creates an empty file at `path` and takes ownership of it.
    ///
    /// Fails if `path` already exists, leaving that file alone.
    pub async fn create(
        path: PathBuf,
    ) -> Result<(Self, tokio::fs::File), Box<dyn std::error::Error + Send + Sync>> {
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        Ok((TempImage::new(path), file))
    }

    /// Downloads `image_url` into `temp_dir`, streaming it to disk chunk by chunk.
    ///
    /// The guard exists before the request is sent, so a failed download
    /// leaves no partial file behind.
    pub async fn download<R: Rng + ?Sized>(
        client: &Client,
        image_url: &str,
        temp_dir: &Path,
        rng: &mut R,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let path = temp_image_path(temp_dir, image_url, rng)?;
        let (image, mut file) = TempImage::create(path).await?;

        let mut response = client.get(image_url).send().await?.error_for_status()?;
        let mut written = 0;

        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len();
        }
        file.flush().await?;

        debug!("Downloaded {} bytes to {}", written, image.path.display());
        Ok(image)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed temporary image {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove temporary image {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// The services a composed quote passes through on its way to a tweet.
#[allow(async_fn_in_trait)]
pub trait QuoteOutlet {
    /// Finds an image for `theme`; `Ok(None)` when nothing matched.
    async fn find_image<R: Rng + ?Sized>(
        &mut self,
        theme: &str,
        language: Language,
        rng: &mut R,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;

    /// Downloads an image into a temporary file owned by the returned guard.
    async fn download_image<R: Rng + ?Sized>(
        &mut self,
        image_url: &str,
        rng: &mut R,
    ) -> Result<TempImage, Box<dyn std::error::Error + Send + Sync>>;

    /// Uploads an image and returns its media ID.
    async fn upload_image(
        &mut self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Posts a tweet with the given media attached.
    async fn post(
        &mut self,
        message: &str,
        media_ids: &[String],
    ) -> Result<TweetReference, Box<dyn std::error::Error + Send + Sync>>;
}

/// Pixabay for images, Twitter for media and tweets.
///
/// Holds its own copy of the Twitter credentials, so a token refreshed during
/// one run stays local to that run.
pub struct TwitterOutlet<'a> {
    client: Client,
    pixabay_key: &'a str,
    temp_dir: &'a Path,
    twitter: TwitterConfig,
}

impl<'a> TwitterOutlet<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        TwitterOutlet {
            client: Client::new(),
            pixabay_key: &config.pixabay_key,
            temp_dir: &config.temp_dir,
            twitter: config.twitter.clone(),
        }
    }
}

impl QuoteOutlet for TwitterOutlet<'_> {
    async fn find_image<R: Rng + ?Sized>(
        &mut self,
        theme: &str,
        language: Language,
        rng: &mut R,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        find_image(&self.client, self.pixabay_key, theme, language.code(), rng).await
    }

    async fn download_image<R: Rng + ?Sized>(
        &mut self,
        image_url: &str,
        rng: &mut R,
    ) -> Result<TempImage, Box<dyn std::error::Error + Send + Sync>> {
        TempImage::download(&self.client, image_url, self.temp_dir, rng).await
    }

    async fn upload_image(
        &mut self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        upload_media(&mut self.twitter, path).await
    }

    async fn post(
        &mut self,
        message: &str,
        media_ids: &[String],
    ) -> Result<TweetReference, Box<dyn std::error::Error + Send + Sync>> {
        post_tweet(&mut self.twitter, message, media_ids).await
    }
}

/// Finds a quote in the language's category and publishes it through `outlet`.
///
/// The tweet carries an image when the image search finds one and is text only
/// otherwise. A failed image search is logged and treated as no image; any
/// other failure aborts the run. The downloaded image is removed before this
/// returns, whatever the outcome.
///
/// # Returns
///
/// - `Ok(Some(TweetReference))`: The posted tweet
/// - `Ok(None)`: No quote was found, nothing was posted
/// - `Err(...)`: If a Wikiquote, download, upload or posting request failed
pub async fn publish_quote<S, O, R>(
    source: &S,
    outlet: &mut O,
    language: Language,
    rng: &mut R,
) -> Result<Option<TweetReference>, Box<dyn std::error::Error + Send + Sync>>
where
    S: WikiSource,
    O: QuoteOutlet,
    R: Rng + ?Sized,
{
    let quote = match find_quote_from_category(source, language.category(), rng).await? {
        Some(quote) => quote,
        None => {
            warn!(
                "Could not find a tweetable quote in category '{}'",
                language.category()
            );
            return Ok(None);
        }
    };

    let message = compose_message(&quote, language);
    info!(
        "Tweeting message ({} chars): {}",
        message.chars().count(),
        message
    );

    let image_url = match outlet.find_image(&quote.theme, language, rng).await {
        Ok(url) => url,
        Err(e) => {
            warn!("Image search for theme {} failed: {}", quote.theme, e);
            None
        }
    };

    let tweet = match image_url {
        Some(image_url) => {
            info!(
                "Found image for theme {} in language {}",
                quote.theme,
                language.code()
            );
            let image = outlet.download_image(&image_url, rng).await?;
            info!("Found image file at {}", image.path().display());

            let media_id = outlet.upload_image(image.path()).await?;
            outlet.post(&message, &[media_id]).await?
        }
        None => {
            warn!(
                "Could not find image for theme {} in language {}",
                quote.theme,
                language.code()
            );
            outlet.post(&message, &[]).await?
        }
    };

    info!("Tweet published at {}", tweet.url());
    Ok(Some(tweet))
}

/// Tweets an inspirational quote in the specified language.
///
/// Randomly searches the language's Wikiquote category for a tweetable quote
/// and searches pixabay.com for an image matching the quote's theme. See
/// [`publish_quote`] for how the outcome is reported.
pub async fn tweet_inspirational_quote(
    config: &AppConfig,
    language: Language,
) -> Result<Option<TweetReference>, Box<dyn std::error::Error + Send + Sync>> {
    let mut rng = StdRng::from_entropy();
    let wiki = WikiquoteClient::new(language.code());
    let mut outlet = TwitterOutlet::new(config);

    info!(
        "Searching category '{}' on {}",
        language.category(),
        wiki.api_url()
    );
    publish_quote(&wiki, &mut outlet, language, &mut rng).await
}

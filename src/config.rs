//! Configuration module for the wikiquote-tweet service.
//!
//! This module centralizes environment variable handling. The whole
//! configuration is read once at startup into an [`AppConfig`] that is shared
//! read-only by every pipeline run.

use log::{debug, error, info, warn};
use std::env;
use std::path::PathBuf;

/// Temporary directory used for downloaded images when `TEMP_DIRECTORY` is unset.
pub const DEFAULT_TEMP_DIRECTORY: &str = "/tmp";

/// Masks a secret for logging, keeping at most the first and last 8 characters.
pub(crate) fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let len = chars.len();

    let prefix: String = chars.iter().take(8).collect();
    if len > 16 {
        let suffix: String = chars[len - 8..].iter().collect();
        format!("{}...{}", prefix, suffix)
    } else {
        format!("{}...", prefix)
    }
}

/// Configuration struct for Twitter/X API credentials.
///
/// This struct holds the credentials required to authenticate with the Twitter/X API v2 endpoints.
/// It uses OAuth 2.0 User Context (Access Token) for uploading media and posting tweets.
/// Every pipeline run works on its own clone, so a token refresh only affects that run.
#[derive(Debug, Clone)]
pub struct TwitterConfig {
    /// The Access Token for OAuth 2.0 User Context authentication (all operations)
    pub access_token: String,
    /// The Refresh Token for automatically refreshing expired access tokens
    pub refresh_token: Option<String>,
    /// The Client ID for OAuth 2.0 operations
    pub client_id: Option<String>,
    /// The Client Secret for OAuth 2.0 operations
    pub client_secret: Option<String>,
}

impl TwitterConfig {
    /// Loads the Twitter credentials through `lookup`.
    ///
    /// # Required Variables
    ///
    /// - `xapi_access_token`: Twitter API Access Token
    ///
    /// # Optional Variables (for automatic token refresh)
    ///
    /// - `xapi_refresh_token`
    /// - `xapi_client_id`
    /// - `xapi_client_secret`
    fn from_lookup<F>(lookup: &F) -> Result<Self, Box<dyn std::error::Error + Send + Sync>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = match lookup("xapi_access_token") {
            Some(token) if !token.is_empty() => {
                info!(
                    "Found xapi_access_token environment variable with length: {}",
                    token.chars().count()
                );
                debug!("Access token (masked): {}", mask_secret(&token));

                if token.chars().count() < 10 {
                    warn!(
                        "Access token seems unusually short ({} characters)",
                        token.chars().count()
                    );
                }
                token
            }
            Some(_) => {
                error!("Access token is empty");
                return Err("Access token cannot be empty".into());
            }
            None => {
                error!("Make sure xapi_access_token environment variable is set");
                return Err("Missing xapi_access_token environment variable".into());
            }
        };

        let optional = |name: &str| match lookup(name) {
            Some(value) if !value.is_empty() => {
                info!("Found {} environment variable", name);
                debug!("{} (masked): {}", name, mask_secret(&value));
                Some(value)
            }
            _ => {
                info!("No {} found in environment variables", name);
                None
            }
        };

        let config = TwitterConfig {
            access_token,
            refresh_token: optional("xapi_refresh_token"),
            client_id: optional("xapi_client_id"),
            client_secret: optional("xapi_client_secret"),
        };

        if config.refresh_token.is_some() && !config.can_refresh_token() {
            warn!("Refresh token is provided but client credentials are missing - automatic token refresh will be disabled");
        }
        if config.can_refresh_token() {
            info!("Automatic token refresh is enabled");
        } else {
            info!("Automatic token refresh is disabled - manual token refresh required");
        }

        Ok(config)
    }

    /// Attempts to refresh the access token using the stored refresh token and client credentials.
    ///
    /// On success the access token (and the refresh token, when Twitter rotates it)
    /// is replaced in this config only. The shared [`AppConfig`] is never touched.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: If the token was successfully refreshed
    /// - `Err(Box<dyn std::error::Error + Send + Sync>)`: If refresh failed or credentials are missing
    pub async fn refresh_access_token(
        &mut self,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Attempting to refresh access token");

        let (client_id, client_secret, refresh_token) = match (
            self.client_id.as_ref(),
            self.client_secret.as_ref(),
            self.refresh_token.as_ref(),
        ) {
            (Some(id), Some(secret), Some(token)) => (id, secret, token),
            _ => {
                error!("Cannot refresh token: missing required credentials");
                if self.client_id.is_none() {
                    error!("Missing xapi_client_id");
                }
                if self.client_secret.is_none() {
                    error!("Missing xapi_client_secret");
                }
                if self.refresh_token.is_none() {
                    error!("Missing xapi_refresh_token");
                }
                return Err("Missing required credentials for token refresh".into());
            }
        };

        use crate::oauth::refresh_access_token;

        match refresh_access_token(client_id, client_secret, refresh_token).await {
            Ok((new_access_token, new_refresh_token)) => {
                info!("Access token refreshed successfully");
                self.access_token = new_access_token;

                if let Some(new_refresh) = new_refresh_token {
                    info!("Updating refresh token with new token from Twitter");
                    self.refresh_token = Some(new_refresh);
                    warn!("Refresh token was rotated - update xapi_refresh_token before the next restart");
                }

                debug!(
                    "Updated access token (masked): {}",
                    mask_secret(&self.access_token)
                );
                warn!("Access token has been refreshed - consider updating your xapi_access_token environment variable");
                Ok(())
            }
            Err(e) => {
                error!("Failed to refresh access token: {}", e);
                Err(e)
            }
        }
    }

    /// Returns true if client_id, client_secret and refresh_token are all available.
    pub fn can_refresh_token(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some() && self.refresh_token.is_some()
    }
}

/// Process-wide configuration, loaded once before the first pipeline run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The pixabay.com API key used by the image search
    pub pixabay_key: String,
    /// Twitter/X credentials, cloned into every pipeline run
    pub twitter: TwitterConfig,
    /// Directory where images are downloaded before upload
    pub temp_dir: PathBuf,
}

impl AppConfig {
    /// Creates a new `AppConfig` by loading every setting from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `PIXABAY_KEY`: A pixabay.com API key
    /// - `xapi_access_token`: Twitter API Access Token (OAuth 2.0 User Context)
    ///
    /// # Optional Environment Variables
    ///
    /// - `xapi_refresh_token`, `xapi_client_id`, `xapi_client_secret`: automatic token refresh
    /// - `TEMP_DIRECTORY`: image download directory, defaults to `/tmp`
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use wikiquote_tweet::AppConfig;
    ///
    /// let config = AppConfig::from_env().unwrap();
    /// println!("Images go to {}", config.temp_dir.display());
    /// ```
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error + Send + Sync>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pixabay_key = match lookup("PIXABAY_KEY") {
            Some(key) if !key.is_empty() => {
                debug!("Pixabay key (masked): {}", mask_secret(&key));
                key
            }
            _ => {
                error!("Make sure PIXABAY_KEY environment variable is set");
                return Err("Missing PIXABAY_KEY environment variable".into());
            }
        };

        let twitter = TwitterConfig::from_lookup(&lookup)?;

        let temp_dir = lookup("TEMP_DIRECTORY")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMP_DIRECTORY));
        info!("Using temporary directory {}", temp_dir.display());

        info!("Configuration loaded successfully");
        Ok(AppConfig {
            pixabay_key,
            twitter,
            temp_dir,
        })
    }
}

/// Gets the server port from environment variables or returns the default.
///
/// This function reads the `PORT` environment variable and parses it as a u16.
/// If the environment variable is not set it defaults to 3000.
///
/// # Panics
///
/// This function will panic if the `PORT` environment variable is set to a value
/// that cannot be parsed as a valid port number.
pub fn get_server_port() -> u16 {
    env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .expect("PORT must be a valid number")
}

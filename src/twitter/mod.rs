//! Twitter/X API integration module.
//!
//! This module contains functions for interacting with the Twitter/X API,
//! namely media upload and tweet posting using OAuth 2.0 User Context
//! authentication.

mod api;
mod media;
mod tweets;

// Re-export public API
pub use media::upload_media;
pub use tweets::{post_tweet, TweetReference};

// Crate-internal re-exports (used by tests and other modules)
pub(crate) use api::sanitize_for_logging;
#[allow(unused_imports)]
pub(crate) use api::is_duplicate_rejection;
#[allow(unused_imports)]
pub(crate) use tweets::build_tweet_payload;

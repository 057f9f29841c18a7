//! Wikiquote integration module.
//!
//! This module contains the Wikiquote API client, the tweet formatter for
//! quotes parsed out of wikitext, and the randomized quote search built on
//! top of both.

mod api;
mod finder;
mod formatting;
mod pool;
#[cfg(test)]
pub(crate) mod testing;

pub use api::{CategoryMember, Section, SectionText, WikiSource, WikiquoteClient};
pub use finder::{
    find_quote_from_category, find_quote_from_page, find_quote_from_section,
    find_quote_from_wikitext, is_searchable_section, FoundQuote, FORBIDDEN_SECTIONS,
};
pub use formatting::{build_tweetable_quote, MAX_TWEET_LENGTH};
pub use pool::CandidatePool;

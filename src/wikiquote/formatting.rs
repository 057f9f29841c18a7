//! Tweet formatting for quotes parsed out of wikitext.
//!
//! Message and author strings are stripped of leftover wikitext markup, joined,
//! and decorated with the theme as a hashtag when it fits.

use regex::Regex;
use std::sync::OnceLock;

/// Maximum tweet length, in characters, that a formatted quote may use.
pub const MAX_TWEET_LENGTH: usize = 140;

/// Wikitext markup removed from messages and authors.
struct MarkupPatterns {
    tags: Regex,
    link_start: Regex,
    link_end: Regex,
    apostrophes: Regex,
    message_punctuation: Regex,
    author_punctuation: Regex,
}

impl MarkupPatterns {
    fn compile() -> Option<Self> {
        Some(MarkupPatterns {
            tags: Regex::new(r"<.*?>").ok()?,
            link_start: Regex::new(r"\[.:").ok()?,
            link_end: Regex::new(r"\|.\]").ok()?,
            apostrophes: Regex::new(r"'{2,}").ok()?,
            message_punctuation: Regex::new(r#"[\[\]"«»“”#=]"#).ok()?,
            author_punctuation: Regex::new(r"[\[\]#=]").ok()?,
        })
    }

    /// Removes HTML tags (keeping their content), `[x:` / `|x]` link remnants,
    /// the given punctuation class and runs of `''`.
    fn strip(&self, text: &str, punctuation: &Regex) -> String {
        let text = self.tags.replace_all(text, "");
        let text = self.link_start.replace_all(&text, "");
        let text = self.link_end.replace_all(&text, "");
        let text = punctuation.replace_all(&text, "");
        let text = self.apostrophes.replace_all(&text, "");

        text.trim().to_string()
    }
}

/// Patterns compiled on first use and shared by every call afterwards.
fn markup_patterns() -> Option<&'static MarkupPatterns> {
    static PATTERNS: OnceLock<Option<MarkupPatterns>> = OnceLock::new();
    PATTERNS.get_or_init(MarkupPatterns::compile).as_ref()
}

/// Byte offset in `haystack` of the first case-insensitive match of `needle_lower`.
fn find_case_insensitive(haystack: &str, needle_lower: &str) -> Option<usize> {
    haystack
        .char_indices()
        .map(|(idx, _)| idx)
        .find(|&idx| haystack[idx..].to_lowercase().starts_with(needle_lower))
}

/// Builds a quote suitable for tweeting, or `None` if it cannot fit.
///
/// A quote is tweetable if its length does not exceed [`MAX_TWEET_LENGTH`]. The
/// message and author are stripped of wikitext markup and whitespace, and the
/// message gets a terminal period unless it already ends in `.`, `?` or `!`.
/// The theme becomes a hashtag: inlined in front of its first occurrence in
/// the quote, otherwise appended as a suffix with parentheses dropped and
/// whitespace turned into hyphens. A hashtag that does not fit is left out,
/// and a blank theme adds no hashtag at all.
///
/// # Example
///
/// ```rust
/// use wikiquote_tweet::wikiquote::build_tweetable_quote;
///
/// let quote = build_tweetable_quote("Be yourself.", "— Oscar Wilde", "Individuality");
/// assert_eq!(quote.as_deref(), Some("Be yourself. — Oscar Wilde #individuality"));
/// ```
pub fn build_tweetable_quote(message: &str, author: &str, theme: &str) -> Option<String> {
    let patterns = markup_patterns()?;
    let mut message = patterns.strip(message, &patterns.message_punctuation);
    if let Some(last) = message.chars().last() {
        if !matches!(last, '.' | '?' | '!') {
            message.push('.');
        }
    }

    let author = patterns.strip(author, &patterns.author_punctuation);

    if message.chars().count() + author.chars().count() >= MAX_TWEET_LENGTH {
        return None;
    }

    let mut quote = format!("{} {}", message, author);
    let hashtag = theme.trim().to_lowercase();

    if !hashtag.is_empty() {
        match find_case_insensitive(&quote, &hashtag) {
            Some(i) if quote.chars().count() < MAX_TWEET_LENGTH => quote.insert(i, '#'),
            _ => {
                let suffix: String = hashtag
                    .chars()
                    .filter(|c| !matches!(c, '(' | ')'))
                    .map(|c| if c.is_whitespace() { '-' } else { c })
                    .collect();

                if quote.chars().count() + suffix.chars().count() < MAX_TWEET_LENGTH - 1 {
                    quote.push_str(" #");
                    quote.push_str(&suffix);
                }
            }
        }
    }

    if quote.chars().count() <= MAX_TWEET_LENGTH {
        Some(quote)
    } else {
        None
    }
}

//! Randomized quote search over Wikiquote categories, pages, sections and lines.
//!
//! Every level samples its candidates without replacement and stops at the
//! first candidate that yields a tweetable quote. Running out of candidates is
//! `Ok(None)`; API failures abort the search with `Err`.

use log::{debug, info};
use rand::Rng;

use super::api::{Section, WikiSource};
use super::formatting::build_tweetable_quote;
use super::pool::CandidatePool;

/// Section headings that never contain quotes, in every supported language.
pub const FORBIDDEN_SECTIONS: [&str; 8] = [
    "references",
    "see also",
    "external links",
    "referencias",
    "enlaces externos",
    "véase también",
    "temas relacionados",
    "veja também",
];

/// A tweetable quote together with the title of the page it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundQuote {
    pub text: String,
    pub theme: String,
}

/// Whether a section is worth searching: it has a usable index and is not forbidden.
pub fn is_searchable_section(section: &Section) -> bool {
    let index = section.index.trim();
    if index.is_empty() || index == "0" {
        return false;
    }
    let line = section.line.trim().to_lowercase();
    !FORBIDDEN_SECTIONS.contains(&line.as_str())
}

/// Randomly finds a tweetable quote in a blob of wikitext.
///
/// Wikiquote lists quotes as `* message` followed by `*: author`, so splitting on
/// `*` leaves a blank fragment between the two. Random fragments are drawn until
/// a blank one with a neighbor on each side formats into a tweetable quote.
///
/// The blank fragment must not be the first one nor one of the last two.
pub fn find_quote_from_wikitext<R: Rng + ?Sized>(
    wikitext: &str,
    theme: &str,
    rng: &mut R,
) -> Option<String> {
    let fragments: Vec<&str> = wikitext.split('*').collect();
    let mut pool = CandidatePool::new(fragments.len());

    while let Some(i) = pool.draw(rng) {
        if i > 0 && i + 2 < fragments.len() && fragments[i].trim().is_empty() {
            if let Some(quote) = build_tweetable_quote(fragments[i - 1], fragments[i + 1], theme) {
                return Some(quote);
            }
        }
    }

    None
}

/// Randomly finds a tweetable quote in one section of a page.
///
/// The title of the page is used as the theme.
pub async fn find_quote_from_section<S, R>(
    source: &S,
    page_id: u64,
    section_index: &str,
    rng: &mut R,
) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>
where
    S: WikiSource,
    R: Rng + ?Sized,
{
    let section = source.section_wikitext(page_id, section_index).await?;
    debug!(
        "Searching section {} of '{}' ({} bytes of wikitext)",
        section_index,
        section.title,
        section.wikitext.len()
    );
    Ok(find_quote_from_wikitext(
        &section.wikitext,
        &section.title,
        rng,
    ))
}

/// Randomly finds a tweetable quote in the sections of a page.
///
/// Forbidden sections and sections without an index are skipped. The page
/// body outside of sections is not searched.
pub async fn find_quote_from_page<S, R>(
    source: &S,
    page_id: u64,
    rng: &mut R,
) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>
where
    S: WikiSource,
    R: Rng + ?Sized,
{
    let sections = source.sections(page_id).await?;
    let mut pool = CandidatePool::new(sections.len());

    while let Some(i) = pool.draw(rng) {
        let section = &sections[i];
        if !is_searchable_section(section) {
            debug!("Skipping section '{}' of page {}", section.line, page_id);
            continue;
        }

        if let Some(quote) = find_quote_from_section(source, page_id, &section.index, rng).await? {
            return Ok(Some(quote));
        }
    }

    debug!("No quote found in page {}", page_id);
    Ok(None)
}

/// Randomly finds a tweetable quote in a page of a Wikiquote category.
///
/// The category is not validated; a category that does not exist simply has
/// no pages.
///
/// # Returns
///
/// - `Ok(Some(FoundQuote))`: A quote and the title of its page
/// - `Ok(None)`: No page of the category yielded a quote
/// - `Err(...)`: If a Wikiquote request failed
pub async fn find_quote_from_category<S, R>(
    source: &S,
    category: &str,
    rng: &mut R,
) -> Result<Option<FoundQuote>, Box<dyn std::error::Error + Send + Sync>>
where
    S: WikiSource,
    R: Rng + ?Sized,
{
    let pages = source.category_members(category).await?;
    let mut pool = CandidatePool::new(pages.len());

    while let Some(i) = pool.draw(rng) {
        let page = &pages[i];
        info!("Searching page '{}' ({})", page.title, page.pageid);

        if let Some(text) = find_quote_from_page(source, page.pageid, rng).await? {
            info!("Found quote in page '{}'", page.title);
            return Ok(Some(FoundQuote {
                text,
                theme: page.title.clone(),
            }));
        }
    }

    info!("No quote found in category '{}'", category);
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wikiquote::testing::{FakeWiki, QUOTES};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_wikitext_without_separators_has_no_quote() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            find_quote_from_wikitext("No list markers here at all.", "Theme", &mut rng),
            None
        );
        assert_eq!(
            find_quote_from_wikitext("* one\n* two\n* three\n", "Theme", &mut rng),
            None
        );
    }

    #[test]
    fn test_wikitext_separator_too_close_to_the_edges() {
        // Fragments: "", " A\n", ":\n", " B\n"; the only blank one is the first.
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(find_quote_from_wikitext("* A\n*:\n* B\n", "Theme", &mut rng), None);
        // Fragments: "", " A\n", "\n", " B\n"; the blank one is second to last.
        assert_eq!(find_quote_from_wikitext("* A\n*\n* B\n", "Theme", &mut rng), None);
    }

    #[test]
    fn test_wikitext_quote_from_separator_neighbors() {
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(
            find_quote_from_wikitext(QUOTES, "Boldness", &mut rng),
            Some("Fortune favors the bold. Virgil #boldness".to_string())
        );
    }

    #[test]
    fn test_wikitext_skips_untweetable_candidates() {
        let long = "x".repeat(200);
        let wikitext = format!("*{}\n*\n*Nobody\n*Short one\n*\n*Somebody\n*\n", long);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(
                find_quote_from_wikitext(&wikitext, "", &mut rng),
                Some("Short one. Somebody".to_string())
            );
        }
    }

    #[test]
    fn test_wikitext_is_deterministic_for_a_seed() {
        let wikitext = "*Alpha\n*\n*A\n*Beta\n*\n*B\n*Gamma\n*\n*C\n*\n";
        let run = |seed| find_quote_from_wikitext(wikitext, "", &mut StdRng::seed_from_u64(seed));
        for seed in 0..10 {
            let quote = run(seed);
            assert!(quote.is_some());
            assert_eq!(quote, run(seed));
        }
    }

    #[test]
    fn test_searchable_sections() {
        let section = |line: &str, index: &str| Section {
            line: line.to_string(),
            index: index.to_string(),
        };
        assert!(is_searchable_section(&section("Quotes", "1")));
        assert!(!is_searchable_section(&section("See also", "2")));
        assert!(!is_searchable_section(&section("Véase también", "3")));
        assert!(!is_searchable_section(&section("Veja também", "3")));
        assert!(!is_searchable_section(&section("Quotes", "")));
        assert!(!is_searchable_section(&section("Quotes", "0")));
    }

    #[tokio::test]
    async fn test_category_returns_quote_and_page_title() {
        let wiki = FakeWiki::default().page(7, "Courage", &[("Quotes", "1", QUOTES)]);
        let mut rng = StdRng::seed_from_u64(5);

        let found = find_quote_from_category(&wiki, "Virtues", &mut rng)
            .await
            .unwrap();

        assert_eq!(
            found,
            Some(FoundQuote {
                text: "Fortune favors the bold. Virgil #courage".to_string(),
                theme: "Courage".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_category_with_only_forbidden_sections_has_no_quote() {
        let wiki = FakeWiki::default()
            .page(
                1,
                "Honesty",
                &[("References", "1", QUOTES), ("See also", "2", QUOTES)],
            )
            .page(2, "Honestidad", &[("Enlaces externos", "1", QUOTES)])
            .page(3, "Empty", &[]);
        let mut rng = StdRng::seed_from_u64(9);

        let found = find_quote_from_category(&wiki, "Virtues", &mut rng)
            .await
            .unwrap();

        assert_eq!(found, None);
        assert!(wiki.fetched.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_page_tries_each_section_once() {
        let wiki = FakeWiki::default().page(
            4,
            "Patience",
            &[
                ("Sourced", "1", "* no separators\n"),
                ("Unsourced", "2", "plain text"),
                ("External links", "3", QUOTES),
            ],
        );
        let mut rng = StdRng::seed_from_u64(2);

        let found = find_quote_from_page(&wiki, 4, &mut rng).await.unwrap();

        assert_eq!(found, None);
        let mut fetched = wiki.fetched.borrow().clone();
        fetched.sort();
        assert_eq!(fetched, vec![(4, "1".to_string()), (4, "2".to_string())]);
    }

    #[tokio::test]
    async fn test_empty_category_has_no_quote() {
        let wiki = FakeWiki::default();
        let mut rng = StdRng::seed_from_u64(1);
        let found = find_quote_from_category(&wiki, "Nothing", &mut rng)
            .await
            .unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_api_failure_aborts_search() {
        let mut wiki = FakeWiki::default().page(8, "Justice", &[("Quotes", "1", QUOTES)]);
        wiki.sections.clear();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(find_quote_from_category(&wiki, "Virtues", &mut rng)
            .await
            .is_err());
    }
}

//! Wikiquote (MediaWiki) API access.
//!
//! This module defines the [`WikiSource`] seam used by the quote finders and its
//! HTTP implementation against `https://{lang}.wikiquote.org/w/api.php`.

use log::{debug, error, info};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::twitter::sanitize_for_logging;

/// A page listed as a member of a Wikiquote category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryMember {
    pub pageid: u64,
    pub title: String,
}

/// One entry of a page's table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Section {
    /// The section heading as displayed
    pub line: String,
    /// The section index accepted by `action=parse&section=`
    pub index: String,
}

/// Wikitext of a single page section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionText {
    /// Title of the page the section belongs to
    pub title: String,
    pub wikitext: String,
}

/// Source of Wikiquote content for the quote finders.
///
/// Errors are transport failures or responses missing the expected fields;
/// an empty result is returned as an empty list, never as an error.
#[allow(async_fn_in_trait)]
pub trait WikiSource {
    /// Pages of `category` (without the `Category:` prefix).
    async fn category_members(
        &self,
        category: &str,
    ) -> Result<Vec<CategoryMember>, Box<dyn std::error::Error + Send + Sync>>;

    /// Table of contents of a page.
    async fn sections(
        &self,
        page_id: u64,
    ) -> Result<Vec<Section>, Box<dyn std::error::Error + Send + Sync>>;

    /// Wikitext of one section of a page.
    async fn section_wikitext(
        &self,
        page_id: u64,
        section_index: &str,
    ) -> Result<SectionText, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug, Deserialize)]
struct ParseResponse<T> {
    parse: T,
}

#[derive(Debug, Deserialize)]
struct ParsedSections {
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct ParsedWikitext {
    title: String,
    wikitext: WikitextContent,
}

#[derive(Debug, Deserialize)]
struct WikitextContent {
    #[serde(rename = "*")]
    content: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: CategoryMembers,
}

#[derive(Debug, Deserialize)]
struct CategoryMembers {
    categorymembers: Vec<CategoryMember>,
}

/// Decodes a MediaWiki JSON response, surfacing `{"error": {...}}` bodies as errors.
pub(crate) fn decode_response<T: DeserializeOwned>(
    body: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    let json: serde_json::Value = serde_json::from_str(body)?;

    if let Some(err) = json.get("error") {
        let code = err.get("code").and_then(|v| v.as_str()).unwrap_or("unknown");
        let info = err.get("info").and_then(|v| v.as_str()).unwrap_or("");
        return Err(format!("Wikiquote API error '{}': {}", code, info).into());
    }

    Ok(serde_json::from_value(json)?)
}

/// HTTP client for one Wikiquote language site.
#[derive(Debug, Clone)]
pub struct WikiquoteClient {
    client: Client,
    api_url: String,
}

impl WikiquoteClient {
    /// Creates a client for the site of `language` (lowercase ISO-639-1).
    pub fn new(language: &str) -> Self {
        WikiquoteClient {
            client: Client::new(),
            api_url: format!("https://{}.wikiquote.org/w/api.php", language),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// POSTs form `params` to the API and decodes the JSON response.
    async fn post_form<T: DeserializeOwned>(
        &self,
        operation_name: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
        debug!("Wikiquote request '{}': {:?}", operation_name, params);

        let response = self.client.post(&self.api_url).form(params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(
                "Wikiquote operation '{}' failed - Status: {}",
                operation_name, status
            );
            debug!(
                "Error response for '{}': {}",
                operation_name,
                sanitize_for_logging(&body, 200)
            );
            return Err(format!(
                "Wikiquote API error for operation '{}' ({})",
                operation_name, status
            )
            .into());
        }

        decode_response(&body)
    }
}

impl WikiSource for WikiquoteClient {
    async fn category_members(
        &self,
        category: &str,
    ) -> Result<Vec<CategoryMember>, Box<dyn std::error::Error + Send + Sync>> {
        info!("Listing pages of category '{}'", category);
        let title = format!("Category:{}", category);

        let response: QueryResponse = self
            .post_form(
                "category_members",
                &[
                    ("format", "json"),
                    ("action", "query"),
                    ("list", "categorymembers"),
                    ("cmtitle", title.as_str()),
                    ("cmprop", "ids|title"),
                    ("cmnamespace", "0"),
                    ("cmtype", "file"),
                    ("cmlimit", "100"),
                    ("cmsort", "timestamp"),
                    ("cmdir", "newer"),
                ],
            )
            .await?;

        info!(
            "Category '{}' has {} pages",
            category,
            response.query.categorymembers.len()
        );
        Ok(response.query.categorymembers)
    }

    async fn sections(
        &self,
        page_id: u64,
    ) -> Result<Vec<Section>, Box<dyn std::error::Error + Send + Sync>> {
        let page_id = page_id.to_string();
        let response: ParseResponse<ParsedSections> = self
            .post_form(
                "sections",
                &[
                    ("format", "json"),
                    ("action", "parse"),
                    ("prop", "sections"),
                    ("pageid", page_id.as_str()),
                ],
            )
            .await?;

        debug!(
            "Page {} has {} sections",
            page_id,
            response.parse.sections.len()
        );
        Ok(response.parse.sections)
    }

    async fn section_wikitext(
        &self,
        page_id: u64,
        section_index: &str,
    ) -> Result<SectionText, Box<dyn std::error::Error + Send + Sync>> {
        let page_id = page_id.to_string();
        let response: ParseResponse<ParsedWikitext> = self
            .post_form(
                "section_wikitext",
                &[
                    ("format", "json"),
                    ("action", "parse"),
                    ("prop", "wikitext"),
                    ("section", section_index),
                    ("pageid", page_id.as_str()),
                ],
            )
            .await?;

        Ok(SectionText {
            title: response.parse.title,
            wikitext: response.parse.wikitext.content,
        })
    }
}

//! In-memory Wikiquote for tests of the quote search and the publisher.

use std::cell::RefCell;
use std::collections::HashMap;

use super::api::{CategoryMember, Section, SectionText, WikiSource};

/// One `* message` / `*: author` pair in the layout Wikiquote uses.
pub(crate) const QUOTES: &str = "Intro\n* Fortune favors the bold\n*\n* Virgil\n*\n";

/// In-memory Wikiquote with a record of every section fetched.
#[derive(Default)]
pub(crate) struct FakeWiki {
    pub(crate) members: Vec<CategoryMember>,
    pub(crate) sections: HashMap<u64, Vec<Section>>,
    pub(crate) texts: HashMap<(u64, String), SectionText>,
    pub(crate) fetched: RefCell<Vec<(u64, String)>>,
}

impl FakeWiki {
    /// Adds a category member with the given `(heading, index, wikitext)` sections.
    pub(crate) fn page(mut self, pageid: u64, title: &str, sections: &[(&str, &str, &str)]) -> Self {
        self.members.push(CategoryMember {
            pageid,
            title: title.to_string(),
        });
        let mut toc = Vec::new();
        for (line, index, wikitext) in sections {
            toc.push(Section {
                line: line.to_string(),
                index: index.to_string(),
            });
            self.texts.insert(
                (pageid, index.to_string()),
                SectionText {
                    title: title.to_string(),
                    wikitext: wikitext.to_string(),
                },
            );
        }
        self.sections.insert(pageid, toc);
        self
    }
}

impl WikiSource for FakeWiki {
    async fn category_members(
        &self,
        _category: &str,
    ) -> Result<Vec<CategoryMember>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.members.clone())
    }

    async fn sections(
        &self,
        page_id: u64,
    ) -> Result<Vec<Section>, Box<dyn std::error::Error + Send + Sync>> {
        self.sections
            .get(&page_id)
            .cloned()
            .ok_or_else(|| format!("no page {}", page_id).into())
    }

    async fn section_wikitext(
        &self,
        page_id: u64,
        section_index: &str,
    ) -> Result<SectionText, Box<dyn std::error::Error + Send + Sync>> {
        self.fetched
            .borrow_mut()
            .push((page_id, section_index.to_string()));
        self.texts
            .get(&(page_id, section_index.to_string()))
            .cloned()
            .ok_or_else(|| "missing section".into())
    }
}

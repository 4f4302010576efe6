//! Per-page section lists.
//!
//! Implements "absence is normal" semantics:
//! - Key absent = content page without scroll sections → empty list
//! - Key present = the most recently registered list for that page

use crate::model::{PageId, SectionList};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Session-lifetime mapping from page to its ordered sections.
///
/// Lists are shared as `Rc` so a resolver keeps using the list it was handed
/// even if the page is re-registered meanwhile; re-registration swaps in a new
/// list rather than mutating the old one.
#[derive(Debug, Default)]
pub struct SectionRegistry {
    pages: HashMap<PageId, Rc<SectionList>>,
    empty: Rc<SectionList>,
}

impl SectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the sections of a page.
    pub fn register(&mut self, page: PageId, sections: SectionList) {
        debug!(page = %page, sections = sections.len(), "registering page sections");
        self.pages.insert(page, Rc::new(sections));
    }

    /// Sections of a page; an empty list for unknown pages.
    pub fn get(&self, page: &PageId) -> Rc<SectionList> {
        self.pages
            .get(page)
            .cloned()
            .unwrap_or_else(|| Rc::clone(&self.empty))
    }

    /// Forget a page. Returns whether it was registered.
    pub fn unregister(&mut self, page: &PageId) -> bool {
        self.pages.remove(page).is_some()
    }

    /// Whether a page has registered sections (possibly an empty list).
    pub fn contains(&self, page: &PageId) -> bool {
        self.pages.contains_key(page)
    }

    /// Number of registered pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True if no page is registered.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

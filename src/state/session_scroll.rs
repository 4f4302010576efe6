//! Per-page scroll memory.
//!
//! Implements "preserve on return" semantics:
//! - Key absent = page never left → restore shows top (offset 0)
//! - Key present = page previously left → restore returns to the stored offset

use crate::model::PageId;
use std::collections::HashMap;

/// Scroll offsets saved when navigating away from a page.
///
/// # Invariant
/// Offsets are only stored for pages that have been left. A page left at
/// offset 0 has an entry; a page never left has none (distinguishing "left at
/// top" from "never visited").
pub type PageScrollStates = HashMap<PageId, f64>;

/// Extension trait for managing page scroll memory.
pub trait PageScrollExt {
    /// Saved offset for a page, 0 for pages never left.
    fn scroll_offset_for(&self, page: &PageId) -> f64;

    /// Whether an offset was saved for a page.
    fn is_page_visited(&self, page: &PageId) -> bool;

    /// Save the offset when leaving a page. Non-finite offsets save as 0.
    fn save_scroll_offset(&mut self, page: PageId, offset: f64);
}

impl PageScrollExt for PageScrollStates {
    fn scroll_offset_for(&self, page: &PageId) -> f64 {
        self.get(page).copied().unwrap_or(0.0)
    }

    fn is_page_visited(&self, page: &PageId) -> bool {
        self.contains_key(page)
    }

    fn save_scroll_offset(&mut self, page: PageId, offset: f64) {
        let offset = if offset.is_finite() { offset.max(0.0) } else { 0.0 };
        self.insert(page, offset);
    }
}

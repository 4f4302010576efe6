//! Offset → section index resolution.
//!
//! The active section is always *derived*: it is recomputed from the current
//! [`ScrollState`] and the page's [`SectionList`], never stored as an
//! independent source of truth. The cached value only exists so subscribers
//! are told when it changes.

use crate::model::SectionList;
use crate::state::observer::{Observable, Subscription};
use crate::view_state::scroll::{OffsetTracker, ScrollState};
use crate::view_state::types::SectionIndex;
use std::rc::Rc;
use tracing::trace;

/// Resolve the active section for a scroll offset.
///
/// Returns the greatest index `i` with `sections[i].start_offset() <= offset`,
/// index 0 if `offset` precedes every start, and `None` for an empty list.
///
/// # Examples
///
/// ```
/// # use panelsync::model::{SectionId, SectionList};
/// # use panelsync::state::resolver::resolve;
/// let list = SectionList::from_heights([
///     (SectionId::new("home").unwrap(), 800),
///     (SectionId::new("about").unwrap(), 800),
///     (SectionId::new("work").unwrap(), 800),
/// ]).unwrap();
///
/// assert_eq!(resolve(&list, 750.0).map(|i| i.get()), Some(0));
/// assert_eq!(resolve(&list, 800.0).map(|i| i.get()), Some(1));
/// assert_eq!(resolve(&list, 2000.0).map(|i| i.get()), Some(2));
/// ```
pub fn resolve(sections: &SectionList, offset: f64) -> Option<SectionIndex> {
    let slice = sections.as_slice();
    let past = slice.partition_point(|s| s.start_offset() <= offset);
    SectionIndex::new(past.saturating_sub(1), slice.len())
}

/// Stateful resolver bound to one page's section list.
#[derive(Debug)]
pub struct SectionIndexResolver {
    sections: Rc<SectionList>,
    current: Observable<Option<SectionIndex>>,
}

impl Default for SectionIndexResolver {
    fn default() -> Self {
        Self::new(Rc::new(SectionList::empty()))
    }
}

impl SectionIndexResolver {
    /// Create a resolver for a list; the index starts at the list's first
    /// section (or `None` for an empty list).
    pub fn new(sections: Rc<SectionList>) -> Self {
        let initial = resolve(&sections, 0.0);
        Self {
            sections,
            current: Observable::new(initial),
        }
    }

    /// The list this resolver reads.
    pub fn sections(&self) -> &Rc<SectionList> {
        &self.sections
    }

    /// Swap in a new page's list and resolve against `offset`.
    pub fn set_sections(&mut self, sections: Rc<SectionList>, offset: f64) -> Option<SectionIndex> {
        self.sections = sections;
        self.update(offset)
    }

    /// Last resolved index.
    pub fn current(&self) -> Option<SectionIndex> {
        self.current.get()
    }

    /// Resolve for a new offset (scroll-driven path).
    pub fn update(&mut self, offset: f64) -> Option<SectionIndex> {
        let index = resolve(&self.sections, offset);
        if self.current.set(index) {
            trace!(offset, index = ?index.map(|i| i.get()), "active section changed");
        }
        index
    }

    /// Make `index` current without consulting an offset (indicator clicks).
    ///
    /// Returns `true` when the index changed.
    pub fn select(&mut self, index: SectionIndex) -> bool {
        if self.sections.get(index).is_none() {
            return false;
        }
        let changed = self.current.set(Some(index));
        if changed {
            trace!(index = index.get(), "active section selected");
        }
        changed
    }

    /// Resolve for an already observed scroll state.
    pub fn update_from(&mut self, state: ScrollState) -> Option<SectionIndex> {
        self.update(state.offset)
    }

    /// Re-read the container and resolve, independent of scroll events.
    ///
    /// Same-page hash navigation can complete without any scroll event, so
    /// callers invoke this explicitly. Idempotent: calling it repeatedly with
    /// an unchanged container yields the same index and no notifications.
    /// A detached or suspended tracker contributes its last known state.
    pub fn recalculate(&mut self, tracker: &mut OffsetTracker) -> Option<SectionIndex> {
        let state = tracker.observe().unwrap_or_else(|| tracker.state());
        self.update_from(state)
    }

    /// Subscribe to index changes.
    pub fn subscribe(&self, callback: impl Fn(&Option<SectionIndex>) + 'static) -> Subscription {
        self.current.subscribe(callback)
    }

    /// Drop every subscriber. Idempotent.
    pub fn clear_subscribers(&self) {
        self.current.clear_subscribers();
    }
}

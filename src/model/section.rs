//! Sections and validated, immutable section lists.

use crate::model::SectionId;
use crate::view_state::height_index::HeightIndex;
use crate::view_state::types::SectionIndex;
use std::collections::HashSet;
use thiserror::Error;

/// A logical, ordered content region of a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    id: SectionId,
    order: usize,
    start_offset: f64,
}

impl Section {
    /// Create a section. Ordering constraints are checked by [`SectionList::new`].
    pub fn new(id: SectionId, order: usize, start_offset: f64) -> Self {
        Self {
            id,
            order,
            start_offset,
        }
    }

    /// Stable section identifier.
    pub fn id(&self) -> &SectionId {
        &self.id
    }

    /// Position in top-to-bottom layout order (0-based).
    pub fn order(&self) -> usize {
        self.order
    }

    /// Scroll offset at which this section becomes current.
    pub fn start_offset(&self) -> f64 {
        self.start_offset
    }
}

/// Reasons a sequence of sections cannot form a [`SectionList`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SectionListError {
    /// `order` values are not exactly `0, 1, 2, ...` in sequence.
    #[error("Section at position {position} has order {found}, expected {position}")]
    OrderMismatch {
        /// Position in the supplied sequence.
        position: usize,
        /// The order value found there.
        found: usize,
    },

    /// A start offset is smaller than the one before it.
    #[error("Section {id} starts at {start_offset}, before the preceding section")]
    OffsetsNotAscending {
        /// Offending section.
        id: SectionId,
        /// Its start offset.
        start_offset: f64,
    },

    /// A start offset is NaN or infinite.
    #[error("Section {id} has a non-finite start offset")]
    NonFiniteOffset {
        /// Offending section.
        id: SectionId,
    },

    /// Two sections share an identifier.
    #[error("Duplicate section id: {0}")]
    DuplicateId(SectionId),
}

/// Ordered sequence of sections for one page.
///
/// # Invariants
/// - `sections[i].order() == i`
/// - start offsets are finite and non-decreasing
/// - ids are unique
///
/// Lists are immutable once built; content changes produce a new list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionList {
    sections: Vec<Section>,
}

impl SectionList {
    /// The list of a page without scroll sections.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate and wrap an ordered sequence of sections.
    ///
    /// # Errors
    ///
    /// Returns [`SectionListError`] when any list invariant is violated.
    pub fn new(sections: Vec<Section>) -> Result<Self, SectionListError> {
        let mut seen = HashSet::with_capacity(sections.len());
        let mut previous_start = f64::NEG_INFINITY;

        for (position, section) in sections.iter().enumerate() {
            if section.order != position {
                return Err(SectionListError::OrderMismatch {
                    position,
                    found: section.order,
                });
            }
            if !section.start_offset.is_finite() {
                return Err(SectionListError::NonFiniteOffset {
                    id: section.id.clone(),
                });
            }
            if section.start_offset < previous_start {
                return Err(SectionListError::OffsetsNotAscending {
                    id: section.id.clone(),
                    start_offset: section.start_offset,
                });
            }
            if !seen.insert(section.id.clone()) {
                return Err(SectionListError::DuplicateId(section.id.clone()));
            }
            previous_start = section.start_offset;
        }

        Ok(Self { sections })
    }

    /// Build a list from rendered section heights, top to bottom.
    ///
    /// Each section starts where the preceding ones end.
    ///
    /// # Errors
    ///
    /// Returns [`SectionListError::DuplicateId`] if an id repeats.
    pub fn from_heights(
        entries: impl IntoIterator<Item = (SectionId, u32)>,
    ) -> Result<Self, SectionListError> {
        let (ids, heights): (Vec<SectionId>, Vec<u32>) = entries.into_iter().unzip();
        let index = HeightIndex::from_heights(&heights);

        let sections = ids
            .into_iter()
            .enumerate()
            .map(|(order, id)| Section::new(id, order, index.start_of(order) as f64))
            .collect();

        Self::new(sections)
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True for pages without scroll sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section at a validated index.
    pub fn get(&self, index: SectionIndex) -> Option<&Section> {
        self.sections.get(index.get())
    }

    /// Look up a section by id.
    pub fn by_id(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| &s.id == id)
    }

    /// Index of the section with the given id.
    pub fn index_of(&self, id: &SectionId) -> Option<SectionIndex> {
        self.sections
            .iter()
            .position(|s| &s.id == id)
            .and_then(|i| SectionIndex::new(i, self.len()))
    }

    /// The home (first) section.
    pub fn home(&self) -> Option<&Section> {
        self.sections.first()
    }

    /// Iterate sections in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    /// Borrow the sections as a slice.
    pub fn as_slice(&self) -> &[Section] {
        &self.sections
    }
}

impl<'a> IntoIterator for &'a SectionList {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

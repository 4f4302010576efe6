//! Core view-state newtypes

/// Validated index into a page's `SectionList`.
///
/// # Invariants
/// - Always < section_count at construction time
/// - 0-indexed: 0 is the first (home) section
///
/// # Smart Constructor
/// Use `SectionIndex::new(index, section_count)` which returns `Option<Self>`.
/// A page with no sections has no valid index at all, which callers model as
/// `Option<SectionIndex>::None` rather than a sentinel zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionIndex(usize);

impl SectionIndex {
    /// Create a validated section index.
    ///
    /// Returns `None` if index >= section_count.
    ///
    /// # Examples
    /// ```
    /// # use panelsync::view_state::types::SectionIndex;
    /// assert!(SectionIndex::new(0, 3).is_some());
    /// assert!(SectionIndex::new(3, 3).is_none());
    /// assert!(SectionIndex::new(0, 0).is_none());
    /// ```
    pub fn new(index: usize, section_count: usize) -> Option<Self> {
        (index < section_count).then_some(Self(index))
    }

    /// Get the raw index value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Display index (1-based, for user-facing display).
    pub fn display(&self) -> usize {
        self.0 + 1
    }

    /// Check if this is the first (home) section.
    pub fn is_first(&self) -> bool {
        self.0 == 0
    }

    /// Check if this is the last section.
    pub fn is_last(&self, section_count: usize) -> bool {
        self.0 + 1 == section_count
    }
}

impl std::fmt::Display for SectionIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in pixels; the only input to tier classification.
    pub width: u32,
    /// Height in pixels; panels are centered within it.
    pub height: f64,
}

impl Viewport {
    /// Create new viewport dimensions.
    pub fn new(width: u32, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 800.0)
    }
}

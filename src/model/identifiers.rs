//! Core identifier newtypes with smart constructors.
//!
//! All identifiers validate non-empty strings at construction time.
//! Raw constructors are never exported - use smart constructors only.

use serde::Deserialize;
use std::fmt;

/// Identifier of a page whose sections are tracked (e.g. "home", "projects").
/// NEVER export the constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct PageId(String);

impl PageId {
    /// Smart constructor: validates non-empty, whitespace-free page ID.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidPageId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidPageId::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(InvalidPageId::Whitespace(raw));
        }
        Ok(Self(raw))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PageId {
    type Error = InvalidPageId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

/// Stable identifier of a section within a page.
///
/// This is the value carried by navigation indicators and hash links, so a
/// click resolves to a section without comparing rendered label text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct SectionId(String);

impl SectionId {
    /// Smart constructor: validates non-empty section ID.
    ///
    /// A leading `#` is stripped so hash fragments (`#about`) and bare ids
    /// (`about`) name the same section.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidSectionId> {
        let raw = raw.into();
        let trimmed = raw.strip_prefix('#').unwrap_or(&raw);
        if trimmed.is_empty() {
            return Err(InvalidSectionId::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(InvalidSectionId::Whitespace(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the raw identifier (without any `#`).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render as a same-page hash fragment (`#id`).
    pub fn to_fragment(&self) -> String {
        format!("#{}", self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SectionId {
    type Error = InvalidSectionId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

// ===== Error Types =====

/// Rejected page identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPageId {
    /// The identifier was empty.
    #[error("Page ID cannot be empty")]
    Empty,
    /// The identifier contained whitespace.
    #[error("Page ID cannot contain whitespace: {0:?}")]
    Whitespace(String),
}

/// Rejected section identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSectionId {
    /// The identifier was empty (or only `#`).
    #[error("Section ID cannot be empty")]
    Empty,
    /// The identifier contained whitespace.
    #[error("Section ID cannot contain whitespace: {0:?}")]
    Whitespace(String),
}

// ===== Tests =====

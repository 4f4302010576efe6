//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod identifiers;
pub mod section;

// Re-export for convenience
pub use error::{AppError, InputError, ParseError};
pub use identifiers::{InvalidPageId, InvalidSectionId, PageId, SectionId};
pub use section::{Section, SectionList, SectionListError};

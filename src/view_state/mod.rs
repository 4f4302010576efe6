//! View-state layer - geometry, scrolling and panel state.
//!
//! # Module Structure
//!
//! - `types`: Core newtypes (SectionIndex, Viewport)
//! - `height_index`: HeightIndex - O(log n) prefix sums via Fenwick tree
//! - `scroll`: ScrollState, ScrollContainer and the OffsetTracker
//! - `stage`: Stage - headless panel visibility and positions

pub mod height_index;
pub mod scroll;
pub mod stage;
pub mod types;

pub use height_index::HeightIndex;
pub use scroll::{OffsetTracker, ScrollContainer, ScrollState, TrackerStatus, VirtualContainer};
pub use stage::{Panel, Placement, Stage, Tween};
pub use types::{SectionIndex, Viewport};

//! Session state (pure).
//!
//! Everything here is driven by explicit calls carrying the host clock; no
//! component reads wall time or schedules callbacks on its own, so every state
//! transition is testable without a browser or event loop.

pub mod breakpoint;
pub mod nav;
pub mod observer;
pub mod page;
pub mod registry;
pub mod resolver;
pub mod session_scroll;
pub mod transition;

// Re-export for convenience
pub use breakpoint::{
    BreakpointController, Breakpoints, DisplayTier, InvalidBreakpoints, LayoutMachine, LayoutMode,
    TierChange,
};
pub use nav::{Indicator, NavOutcome, NavRequest, NavSynchronizer, OverlayState, PendingNav};
pub use observer::{Observable, Subscription};
pub use page::{CoreConfig, HostCommand, NavigationKind, PageController};
pub use registry::SectionRegistry;
pub use resolver::{resolve, SectionIndexResolver};
pub use session_scroll::{PageScrollExt, PageScrollStates};
pub use transition::{
    direction, Direction, InvalidTiming, TransitionDirector, TransitionPhase, TransitionTiming,
};

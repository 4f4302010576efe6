//! Scroll observation: container abstraction, scroll state and the offset tracker.

use std::cell::Cell;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Current scroll position and maximum scrollable distance of a container.
///
/// Derived on every observation; carries no identity of its own.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// Distance scrolled from the top.
    pub offset: f64,
    /// Maximum scrollable distance (content height minus viewport height).
    pub extent: f64,
}

impl ScrollState {
    /// The state reported before any container exists.
    pub const ZERO: Self = Self {
        offset: 0.0,
        extent: 0.0,
    };

    /// Create a scroll state.
    pub fn new(offset: f64, extent: f64) -> Self {
        Self { offset, extent }
    }

    /// Scroll progress in percent, clamped to `[0, 100]`.
    ///
    /// A container that cannot scroll (extent <= 0) reports 0.
    ///
    /// # Examples
    ///
    /// ```
    /// # use panelsync::view_state::scroll::ScrollState;
    /// assert_eq!(ScrollState::new(400.0, 1600.0).percentage(), 25.0);
    /// assert_eq!(ScrollState::new(50.0, 0.0).percentage(), 0.0);
    /// assert_eq!(ScrollState::new(2000.0, 1600.0).percentage(), 100.0);
    /// ```
    pub fn percentage(&self) -> f64 {
        if self.extent.is_nan() || self.extent <= 0.0 || !self.offset.is_finite() {
            return 0.0;
        }
        (self.offset / self.extent * 100.0).clamp(0.0, 100.0)
    }
}

/// A scrollable container the tracker can observe.
///
/// Methods take `&self`: containers are shared, interior-mutable handles in a
/// single-threaded UI, the same way a DOM element is.
pub trait ScrollContainer {
    /// Current scroll offset.
    fn scroll_offset(&self) -> f64;

    /// Maximum scrollable distance.
    fn scroll_extent(&self) -> f64;

    /// Programmatically move the scroll offset. Does not emit a scroll event.
    fn scroll_to(&self, offset: f64);

    /// Whether the container is still part of the live document.
    fn is_connected(&self) -> bool {
        true
    }
}

/// Headless [`ScrollContainer`] used by the trace replayer and tests.
///
/// Offsets are clamped to `[0, extent]` like a browser scroller.
#[derive(Debug)]
pub struct VirtualContainer {
    offset: Cell<f64>,
    extent: Cell<f64>,
    connected: Cell<bool>,
}

impl VirtualContainer {
    /// Create a connected container with the given scrollable extent.
    pub fn new(extent: f64) -> Self {
        Self {
            offset: Cell::new(0.0),
            extent: Cell::new(extent.max(0.0)),
            connected: Cell::new(true),
        }
    }

    /// Change the scrollable extent (content or viewport resized).
    pub fn set_extent(&self, extent: f64) {
        self.extent.set(extent.max(0.0));
        self.scroll_to(self.offset.get());
    }

    /// Simulate removal of the element from the document.
    pub fn disconnect(&self) {
        self.connected.set(false);
    }
}

impl ScrollContainer for VirtualContainer {
    fn scroll_offset(&self) -> f64 {
        self.offset.get()
    }

    fn scroll_extent(&self) -> f64 {
        self.extent.get()
    }

    fn scroll_to(&self, offset: f64) {
        let clamped = if offset.is_finite() {
            offset.clamp(0.0, self.extent.get())
        } else {
            0.0
        };
        self.offset.set(clamped);
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }
}

/// Observation status of an [`OffsetTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerStatus {
    /// No container attached yet; reports a zero state.
    Detached,
    /// Reading a live container.
    Tracking,
    /// The container went away; last state is retained, no further updates.
    Suspended,
}

/// Lazily observes a scroll container's offset and extent.
///
/// Holds only a weak reference, so a container dropped by its owner is
/// detected on the next observation instead of being kept alive.
#[derive(Debug, Default)]
pub struct OffsetTracker {
    container: Option<Weak<dyn ScrollContainer>>,
    state: ScrollState,
    suspended: bool,
}

impl OffsetTracker {
    /// Create a detached tracker reporting a zero state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin tracking `container`, replacing any previous one.
    pub fn attach<C: ScrollContainer + 'static>(&mut self, container: &Rc<C>) {
        let weak: Weak<dyn ScrollContainer> = Rc::<C>::downgrade(container);
        self.container = Some(weak);
        self.suspended = false;
        self.state = ScrollState::ZERO;
        self.observe();
    }

    /// Stop tracking and reset to the zero state. Idempotent.
    pub fn detach(&mut self) {
        self.container = None;
        self.suspended = false;
        self.state = ScrollState::ZERO;
    }

    /// Current observation status.
    pub fn status(&self) -> TrackerStatus {
        match (&self.container, self.suspended) {
            (None, _) => TrackerStatus::Detached,
            (Some(_), true) => TrackerStatus::Suspended,
            (Some(_), false) => TrackerStatus::Tracking,
        }
    }

    /// Last observed state.
    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// Re-read the container.
    ///
    /// Returns the fresh state, or `None` when there is nothing to emit:
    /// no container yet, or the container has become stale (which suspends
    /// the tracker).
    pub fn observe(&mut self) -> Option<ScrollState> {
        if self.suspended {
            return None;
        }
        let container = self.live_container()?;
        self.state = ScrollState::new(container.scroll_offset(), container.scroll_extent());
        Some(self.state)
    }

    /// Programmatically scroll the tracked container and re-observe.
    ///
    /// Used for resets and restores; no-op while detached or suspended.
    pub fn scroll_to(&mut self, offset: f64) -> Option<ScrollState> {
        if self.suspended {
            return None;
        }
        let container = self.live_container()?;
        container.scroll_to(offset);
        self.observe()
    }

    fn live_container(&mut self) -> Option<Rc<dyn ScrollContainer>> {
        let weak = self.container.as_ref()?;
        match weak.upgrade() {
            Some(container) if container.is_connected() => Some(container),
            _ => {
                debug!(
                    last_offset = self.state.offset,
                    "scroll container is gone, suspending offset tracking"
                );
                self.suspended = true;
                None
            }
        }
    }
}

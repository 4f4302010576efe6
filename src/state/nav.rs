//! Navigation indicators and the overlay gate.
//!
//! Indicators carry the section's stable id, so a click maps straight to a
//! section without comparing label text.
//!
//! # Overlay gate
//!
//! ```text
//!          overlay_opened()            navigation while open
//!  Closed ─────────────────► Open ──────────────────────────► Closing
//!    ▲                                                          │
//!    └──────────────────────── overlay_closed() ◄───────────────┘
//!                              (resumes the deferred navigation)
//! ```
//!
//! Only the latest deferred navigation survives.

use crate::model::{SectionId, SectionList};
use crate::state::transition::{direction, Direction};
use crate::view_state::types::SectionIndex;
use std::rc::Rc;
use tracing::debug;

/// One navigation indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    /// Section the indicator points at.
    pub section: SectionId,
    /// Whether it marks the current section.
    pub active: bool,
}

/// State of the external overlay / detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayState {
    /// No overlay; navigation proceeds immediately.
    #[default]
    Closed,
    /// Overlay open; the next navigation asks the host to close it.
    Open,
    /// Close requested, waiting for the host to confirm.
    Closing,
}

/// A navigation parked until the overlay closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingNav {
    /// Indicator click toward a section.
    Section(SectionId),
    /// Hash navigation; recompute the active section.
    Recalculate,
}

/// A cross-section navigation ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRequest {
    /// Currently active section.
    pub from: SectionId,
    /// Clicked section.
    pub to: SectionId,
    /// Direction of travel.
    pub direction: Direction,
}

/// Result of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Nothing to do: active or unknown indicator.
    Ignored,
    /// Parked behind the overlay. `close_overlay` is set when the host must
    /// now be asked to close it (not yet requested).
    Deferred {
        /// Whether a close request should be sent.
        close_overlay: bool,
    },
    /// Navigate to another section.
    Navigate(NavRequest),
    /// Recompute the active section from the container.
    Recalculate,
}

impl std::fmt::Display for NavOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavOutcome::Ignored => f.write_str("ignored"),
            NavOutcome::Deferred { close_overlay: true } => f.write_str("deferred(close-overlay)"),
            NavOutcome::Deferred { close_overlay: false } => f.write_str("deferred"),
            NavOutcome::Navigate(request) => write!(
                f,
                "navigate({}->{} {})",
                request.from, request.to, request.direction
            ),
            NavOutcome::Recalculate => f.write_str("recalculate"),
        }
    }
}

/// Keeps indicators in step with the current section and gates navigation
/// on the overlay.
#[derive(Debug, Default)]
pub struct NavSynchronizer {
    sections: Rc<SectionList>,
    indicators: Vec<Indicator>,
    overlay: OverlayState,
    pending: Option<PendingNav>,
}

impl NavSynchronizer {
    /// Create with no indicators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild indicators for a page's sections.
    pub fn rebuild(&mut self, sections: Rc<SectionList>, active: Option<SectionIndex>) {
        self.indicators = sections
            .iter()
            .enumerate()
            .map(|(i, section)| Indicator {
                section: section.id().clone(),
                active: active.is_some_and(|a| a.get() == i),
            })
            .collect();
        self.sections = sections;
    }

    /// Mark the indicator for `active`. Returns whether anything changed.
    pub fn sync_active(&mut self, active: Option<SectionIndex>) -> bool {
        let mut changed = false;
        for (i, indicator) in self.indicators.iter_mut().enumerate() {
            let now_active = active.is_some_and(|a| a.get() == i);
            if indicator.active != now_active {
                indicator.active = now_active;
                changed = true;
            }
        }
        changed
    }

    /// All indicators in section order.
    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    /// Section of the active indicator.
    pub fn active_section(&self) -> Option<&SectionId> {
        self.indicators
            .iter()
            .find(|i| i.active)
            .map(|i| &i.section)
    }

    /// Overlay state as last reported.
    pub fn overlay(&self) -> OverlayState {
        self.overlay
    }

    /// Deferred navigation, if any.
    pub fn pending(&self) -> Option<&PendingNav> {
        self.pending.as_ref()
    }

    /// Handle a click on the indicator for `section`.
    pub fn click(&mut self, section: &SectionId) -> NavOutcome {
        let Some(target) = self.sections.by_id(section) else {
            debug!(section = %section, "click on unknown indicator ignored");
            return NavOutcome::Ignored;
        };
        let Some(from) = self.active_section().and_then(|id| self.sections.by_id(id)) else {
            return NavOutcome::Ignored;
        };
        let Some(direction) = direction(from.order(), target.order()) else {
            return NavOutcome::Ignored;
        };
        let request = NavRequest {
            from: from.id().clone(),
            to: target.id().clone(),
            direction,
        };
        if self.overlay != OverlayState::Closed {
            return self.defer(PendingNav::Section(request.to));
        }
        NavOutcome::Navigate(request)
    }

    /// Handle same-page hash navigation.
    pub fn hash_navigation(&mut self) -> NavOutcome {
        if self.overlay != OverlayState::Closed {
            return self.defer(PendingNav::Recalculate);
        }
        NavOutcome::Recalculate
    }

    /// A scroll moved the page while the overlay is up.
    ///
    /// Parks a recalculation unless a click is already waiting; the click
    /// resolves the section itself once it runs.
    pub fn defer_recalculate(&mut self) -> NavOutcome {
        if self.overlay == OverlayState::Closed {
            return NavOutcome::Recalculate;
        }
        match self.pending {
            Some(PendingNav::Section(_)) => NavOutcome::Deferred {
                close_overlay: false,
            },
            _ => self.defer(PendingNav::Recalculate),
        }
    }

    /// The host opened the overlay.
    pub fn overlay_opened(&mut self) {
        self.overlay = OverlayState::Open;
    }

    /// The host closed the overlay. Returns the deferred navigation to resume.
    pub fn overlay_closed(&mut self) -> Option<PendingNav> {
        self.overlay = OverlayState::Closed;
        let pending = self.pending.take();
        if let Some(nav) = &pending {
            debug!(?nav, "resuming deferred navigation");
        }
        pending
    }

    /// Forget any deferred navigation and reset the gate.
    pub fn reset(&mut self) {
        self.overlay = OverlayState::Closed;
        self.pending = None;
    }

    fn defer(&mut self, nav: PendingNav) -> NavOutcome {
        let close_overlay = self.overlay == OverlayState::Open;
        if close_overlay {
            self.overlay = OverlayState::Closing;
        }
        if let Some(replaced) = self.pending.replace(nav) {
            debug!(?replaced, "deferred navigation superseded");
        }
        debug!(close_overlay, "navigation deferred behind overlay");
        NavOutcome::Deferred { close_overlay }
    }
}

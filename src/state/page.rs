//! Page controller - the single owner of session-scoped scroll/section state.
//!
//! The host (browser glue, test harness, trace replayer) forwards raw events
//! here with its clock; the controller fans them out to the tracker, resolver,
//! breakpoint controller, layout machine, transition director and
//! navigation indicators.
//!
//! Every change of the active section flows through one path: only a changed
//! index moves the indicators and starts a transition. Scrolls derive the
//! index from the container; an indicator click picks it outright and the
//! container scroll follows.

use crate::model::{PageId, SectionId, SectionList};
use crate::state::breakpoint::{
    BreakpointController, Breakpoints, DisplayTier, LayoutMachine, LayoutMode,
};
use crate::state::nav::{
    Indicator, NavOutcome, NavRequest, NavSynchronizer, OverlayState, PendingNav,
};
use crate::state::observer::Subscription;
use crate::state::registry::SectionRegistry;
use crate::state::resolver::{resolve, SectionIndexResolver};
use crate::state::session_scroll::{PageScrollExt, PageScrollStates};
use crate::state::transition::{TransitionDirector, TransitionPhase, TransitionTiming};
use crate::view_state::scroll::{OffsetTracker, ScrollContainer, ScrollState};
use crate::view_state::stage::Stage;
use crate::view_state::types::{SectionIndex, Viewport};
use serde::Deserialize;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info};

/// Validated settings the core runs with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreConfig {
    /// Tier thresholds.
    pub breakpoints: Breakpoints,
    /// Transition durations and geometry.
    pub timing: TransitionTiming,
    /// Restore the saved offset on back/forward navigation.
    pub restore_scroll: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            breakpoints: Breakpoints::DEFAULT,
            timing: TransitionTiming::default(),
            restore_scroll: true,
        }
    }
}

/// How the router arrived at a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationKind {
    /// Fresh navigation: start at the top.
    #[default]
    Push,
    /// History traversal: return to the saved offset when enabled.
    Restore,
}

/// Requests from the core to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// Close the overlay so a deferred navigation can run.
    CloseOverlay,
}

impl HostCommand {
    /// Short name for logs and reports.
    pub fn name(self) -> &'static str {
        match self {
            HostCommand::CloseOverlay => "close-overlay",
        }
    }
}

/// Owns every component for the page currently shown.
#[derive(Debug)]
pub struct PageController {
    registry: SectionRegistry,
    page: Option<PageId>,
    sections: Rc<SectionList>,
    tracker: OffsetTracker,
    resolver: SectionIndexResolver,
    breakpoints: BreakpointController,
    layout: LayoutMachine,
    director: TransitionDirector,
    stage: Stage,
    nav: NavSynchronizer,
    scroll_memory: PageScrollStates,
    restore_scroll: bool,
    frozen: bool,
    torn_down: bool,
    /// Offset a click scrolled to; resolution waits until the offset leaves it.
    click_anchor: Option<f64>,
    viewport: Viewport,
    clock: Duration,
    commands: Vec<HostCommand>,
}

impl Default for PageController {
    fn default() -> Self {
        Self::new(CoreConfig::default())
    }
}

impl PageController {
    /// Create a controller with no page loaded and no container attached.
    pub fn new(config: CoreConfig) -> Self {
        Self {
            registry: SectionRegistry::new(),
            page: None,
            sections: Rc::new(SectionList::empty()),
            tracker: OffsetTracker::new(),
            resolver: SectionIndexResolver::default(),
            breakpoints: BreakpointController::new(config.breakpoints),
            layout: LayoutMachine::new(),
            director: TransitionDirector::new(config.timing),
            stage: Stage::default(),
            nav: NavSynchronizer::new(),
            scroll_memory: PageScrollStates::new(),
            restore_scroll: config.restore_scroll,
            frozen: false,
            torn_down: false,
            click_anchor: None,
            viewport: Viewport::default(),
            clock: Duration::ZERO,
            commands: Vec::new(),
        }
    }

    /// Section lists known to this session.
    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    /// Mutable registry, for the content provider.
    pub fn registry_mut(&mut self) -> &mut SectionRegistry {
        &mut self.registry
    }

    /// Attach the scroll container and resolve against it.
    pub fn attach_container<C: ScrollContainer + 'static>(&mut self, container: &Rc<C>, now: Duration) {
        self.clock = now;
        self.tracker.attach(container);
        self.torn_down = false;
        self.refresh_geometry();
        self.recalculate(now);
    }

    /// Record a measured panel height.
    pub fn measure_panel(&mut self, section: &SectionId, height: f64) {
        self.stage.set_panel_height(section, height);
    }

    /// Scroll event from the container.
    pub fn on_scroll(&mut self, now: Duration) {
        self.clock = now;
        if self.frozen {
            debug!("scroll ignored during navigation");
            return;
        }
        let Some(state) = self.tracker.observe() else {
            return;
        };
        self.refresh_geometry();
        self.follow_offset(state, now);
    }

    /// Viewport resize. Tier and tracker handling are independent; the tier
    /// only moves the layout when it crosses the stacked/paneled boundary.
    pub fn on_resize(&mut self, viewport: Viewport, now: Duration) {
        self.clock = now;
        self.viewport = viewport;
        self.refresh_geometry();

        self.breakpoints.observe_width(viewport.width);
        if let Some(tier) = self.breakpoints.tier() {
            let target = tier.layout_mode();
            if target != self.layout.mode() {
                let active = self.current_index().map(|i| i.get());
                self.director.set_layout_mode(target, &mut self.stage, now);
                self.layout.apply(target, &mut self.stage, active);
            }
        }

        if self.frozen {
            return;
        }
        if let Some(state) = self.tracker.observe() {
            self.refresh_geometry();
            self.follow_offset(state, now);
        }
    }

    /// Advance transitions to `now`.
    pub fn tick(&mut self, now: Duration) {
        self.clock = now;
        self.director.tick(&mut self.stage, now);
    }

    /// Router: navigation away from the current page is starting.
    ///
    /// Saves the page's offset, cancels any transition and ignores scroll
    /// events until the navigation completes.
    pub fn on_navigation_start(&mut self, now: Duration) {
        self.clock = now;
        let offset = self
            .tracker
            .observe()
            .unwrap_or_else(|| self.tracker.state())
            .offset;
        if let Some(page) = &self.page {
            self.scroll_memory.save_scroll_offset(page.clone(), offset);
        }
        self.director.cancel(&mut self.stage, now);
        self.click_anchor = None;
        self.frozen = true;
        info!(page = ?self.page.as_ref().map(|p| p.as_str()), offset, "navigation started");
    }

    /// Router: `page` is now displayed.
    pub fn on_navigation_complete(&mut self, page: PageId, kind: NavigationKind, now: Duration) {
        self.clock = now;
        self.director.cancel(&mut self.stage, now);
        self.click_anchor = None;

        let offset = match kind {
            NavigationKind::Restore if self.restore_scroll => {
                self.scroll_memory.scroll_offset_for(&page)
            }
            _ => 0.0,
        };
        self.tracker.scroll_to(offset);

        self.sections = self.registry.get(&page);
        let state = self.tracker.observe().unwrap_or_else(|| self.tracker.state());
        let index = self.resolver.set_sections(Rc::clone(&self.sections), state.offset);

        self.stage = Stage::new(&self.sections, self.viewport, index);
        self.layout.arrange(&mut self.stage, index.map(|i| i.get()));
        self.refresh_geometry();
        self.nav.rebuild(Rc::clone(&self.sections), index);

        info!(
            page = %page,
            ?kind,
            sections = self.sections.len(),
            offset = state.offset,
            "navigation complete"
        );
        self.page = Some(page);
        self.frozen = false;
    }

    /// Router: same-page hash navigation. No scroll event is assumed.
    pub fn on_hash_navigation(&mut self, now: Duration) -> NavOutcome {
        self.clock = now;
        let outcome = self.nav.hash_navigation();
        match &outcome {
            NavOutcome::Recalculate => {
                self.click_anchor = None;
                self.recalculate(now);
            }
            NavOutcome::Deferred { close_overlay } => self.request_close(*close_overlay),
            NavOutcome::Ignored | NavOutcome::Navigate(_) => {}
        }
        outcome
    }

    /// Re-read the container and resolve the active section. Idempotent.
    pub fn recalculate(&mut self, now: Duration) -> Option<SectionIndex> {
        self.clock = now;
        if self.frozen {
            return self.resolver.current();
        }
        let old = self.resolver.current();
        let state = self.tracker.observe().unwrap_or_else(|| self.tracker.state());
        self.refresh_geometry();
        if !self.admit(state.offset) {
            return old;
        }
        let new = self.resolver.recalculate(&mut self.tracker);
        if old != new {
            self.apply_index_change(old, new, now);
        }
        new
    }

    /// Click on the indicator for `section`.
    pub fn click_indicator(&mut self, section: &SectionId, now: Duration) -> NavOutcome {
        self.clock = now;
        if self.frozen {
            debug!(section = %section, "click ignored during navigation");
            return NavOutcome::Ignored;
        }
        let outcome = self.nav.click(section);
        match &outcome {
            NavOutcome::Navigate(request) => self.navigate(request, now),
            NavOutcome::Deferred { close_overlay } => self.request_close(*close_overlay),
            NavOutcome::Recalculate => {
                self.recalculate(now);
            }
            NavOutcome::Ignored => {}
        }
        outcome
    }

    /// Host: the overlay opened.
    pub fn overlay_opened(&mut self) {
        self.nav.overlay_opened();
    }

    /// Host: the overlay closed; resume any deferred navigation.
    pub fn overlay_closed(&mut self, now: Duration) {
        self.clock = now;
        match self.nav.overlay_closed() {
            Some(PendingNav::Section(section)) => {
                self.click_indicator(&section, now);
            }
            Some(PendingNav::Recalculate) => {
                self.click_anchor = None;
                self.recalculate(now);
            }
            None => {}
        }
    }

    /// Cancel transitions, detach the tracker and drop every listener.
    /// Idempotent.
    pub fn teardown(&mut self) {
        self.director.cancel(&mut self.stage, self.clock);
        self.tracker.detach();
        self.resolver.clear_subscribers();
        self.breakpoints.clear_subscribers();
        self.nav.reset();
        self.commands.clear();
        self.click_anchor = None;
        if !self.torn_down {
            info!(page = ?self.page.as_ref().map(|p| p.as_str()), "page controller torn down");
            self.torn_down = true;
        }
    }

    /// Page currently displayed.
    pub fn page(&self) -> Option<&PageId> {
        self.page.as_ref()
    }

    /// Sections of the current page.
    pub fn sections(&self) -> &SectionList {
        &self.sections
    }

    /// Active section index.
    pub fn current_index(&self) -> Option<SectionIndex> {
        self.resolver.current()
    }

    /// Active section id.
    pub fn current_section(&self) -> Option<&SectionId> {
        self.current_index()
            .and_then(|i| self.sections.get(i))
            .map(|s| s.id())
    }

    /// Last observed scroll state.
    pub fn scroll_state(&self) -> ScrollState {
        self.tracker.state()
    }

    /// Scroll progress in percent.
    pub fn progress(&self) -> f64 {
        self.tracker.state().percentage()
    }

    /// Display tier, once a width has been seen.
    pub fn tier(&self) -> Option<DisplayTier> {
        self.breakpoints.tier()
    }

    /// Current layout mode.
    pub fn layout_mode(&self) -> LayoutMode {
        self.layout.mode()
    }

    /// Navigation indicators.
    pub fn indicators(&self) -> &[Indicator] {
        self.nav.indicators()
    }

    /// Panel model.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Transition phase.
    pub fn phase(&self) -> &TransitionPhase {
        self.director.phase()
    }

    /// Whether scroll events are currently ignored.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Subscribe to active-section changes.
    pub fn subscribe_section(
        &self,
        callback: impl Fn(&Option<SectionIndex>) + 'static,
    ) -> Subscription {
        self.resolver.subscribe(callback)
    }

    /// Subscribe to tier changes.
    pub fn subscribe_tier(&self, callback: impl Fn(&Option<DisplayTier>) + 'static) -> Subscription {
        self.breakpoints.subscribe(callback)
    }

    /// Take pending host commands.
    pub fn drain_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }

    /// A click picks the section itself; the scroll follows and may be
    /// capped short of the section's start by the container's extent.
    fn navigate(&mut self, request: &NavRequest, now: Duration) {
        let Some(index) = self.sections.index_of(&request.to) else {
            return;
        };
        let Some(start) = self.sections.get(index).map(|s| s.start_offset()) else {
            return;
        };
        debug!(from = %request.from, to = %request.to, direction = %request.direction, "indicator navigation");

        let old = self.resolver.current();
        self.resolver.select(index);
        self.click_anchor = match self.tracker.scroll_to(start) {
            Some(state) => Some(state.offset),
            None => {
                debug!(to = %request.to, "no live container to scroll");
                None
            }
        };
        self.refresh_geometry();
        if old != Some(index) {
            self.apply_index_change(old, Some(index), now);
        }
    }

    /// Move the resolver to an observed scroll state, subject to [`Self::admit`].
    fn follow_offset(&mut self, state: ScrollState, now: Duration) {
        if !self.admit(state.offset) {
            return;
        }
        let old = self.resolver.current();
        let new = self.resolver.update_from(state);
        if old != new {
            self.apply_index_change(old, new, now);
        }
    }

    /// Whether an observed offset may move the active section.
    ///
    /// An offset still resting where a click scrolled keeps the clicked
    /// section. While the overlay is up, an offset that would change the
    /// section is parked as a deferred recalculation instead.
    fn admit(&mut self, offset: f64) -> bool {
        if let Some(anchor) = self.click_anchor {
            if (offset - anchor).abs() < f64::EPSILON {
                return false;
            }
            self.click_anchor = None;
        }
        if self.nav.overlay() == OverlayState::Closed
            || resolve(&self.sections, offset) == self.resolver.current()
        {
            return true;
        }
        if let NavOutcome::Deferred { close_overlay } = self.nav.defer_recalculate() {
            self.request_close(close_overlay);
        }
        false
    }

    fn request_close(&mut self, close_overlay: bool) {
        if close_overlay {
            self.commands.push(HostCommand::CloseOverlay);
        }
    }

    /// The one place an index change reaches the indicators and the stage.
    fn apply_index_change(&mut self, old: Option<SectionIndex>, new: Option<SectionIndex>, now: Duration) {
        self.nav.sync_active(new);
        if self.layout.mode() == LayoutMode::Stacked {
            return;
        }
        let from = old.and_then(|i| self.sections.get(i)).map(|s| s.id().clone());
        let to = new.and_then(|i| self.sections.get(i)).map(|s| s.id().clone());
        match (from, to) {
            (Some(from), Some(to)) => {
                self.director
                    .transition(&mut self.stage, &self.sections, &from, &to, now);
            }
            _ => {
                self.director.cancel(&mut self.stage, now);
                self.stage.show_only(new.map(|i| i.get()));
            }
        }
    }

    fn refresh_geometry(&mut self) {
        let extent = self.tracker.state().extent;
        let extent = if extent.is_finite() { extent.max(0.0) } else { 0.0 };
        self.stage
            .set_geometry(self.viewport, extent + self.viewport.height);
    }
}

#[cfg(test)]
#[path = "page_tests.rs"]
mod tests;

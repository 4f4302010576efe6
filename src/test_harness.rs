//! Acceptance test harness for the page controller.
//!
//! Wraps a [`PageController`] bound to a [`VirtualContainer`] with a
//! millisecond clock, so tests read as a sequence of user and router actions.

use crate::model::{PageId, SectionId, SectionList};
use crate::state::nav::NavOutcome;
use crate::state::page::{CoreConfig, HostCommand, NavigationKind, PageController};
use crate::view_state::scroll::{ScrollContainer, VirtualContainer};
use crate::view_state::types::Viewport;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// Long enough for any default transition to finish.
pub const SETTLE_MS: u64 = 10_000;

/// Test harness driving a [`PageController`] the way a browser host would.
pub struct PageHarness {
    controller: PageController,
    container: Rc<VirtualContainer>,
    heights: HashMap<PageId, f64>,
    viewport: Viewport,
    now: Duration,
}

impl PageHarness {
    /// Default configuration, 1280x800 viewport, container attached.
    pub fn new() -> Self {
        Self::with_config(CoreConfig::default())
    }

    /// Custom configuration, 1280x800 viewport, container attached.
    pub fn with_config(config: CoreConfig) -> Self {
        let viewport = Viewport::new(1280, 800.0);
        let mut controller = PageController::new(config);
        let container = Rc::new(VirtualContainer::new(0.0));
        controller.on_resize(viewport, Duration::ZERO);
        controller.attach_container(&container, Duration::ZERO);
        Self {
            controller,
            container,
            heights: HashMap::new(),
            viewport,
            now: Duration::ZERO,
        }
    }

    /// Register a page's sections as `(id, height)` pairs.
    pub fn register(&mut self, page: &str, sections: &[(&str, u32)]) {
        let page = PageId::new(page).expect("valid page id");
        let list = SectionList::from_heights(
            sections
                .iter()
                .map(|(id, h)| (SectionId::new(*id).expect("valid section id"), *h)),
        )
        .expect("valid section list");
        self.heights
            .insert(page.clone(), sections.iter().map(|(_, h)| f64::from(*h)).sum());
        self.controller.registry_mut().register(page, list);
    }

    /// Navigate to a page with a fresh (push) navigation.
    pub fn open_page(&mut self, page: &str) {
        self.open_page_with(page, NavigationKind::Push);
    }

    /// Navigate to a page with the given navigation kind.
    pub fn open_page_with(&mut self, page: &str, kind: NavigationKind) {
        let page = PageId::new(page).expect("valid page id");
        self.controller.on_navigation_start(self.now);
        self.fit_container(&page);
        self.controller.on_navigation_complete(page, kind, self.now);
    }

    /// Scroll the container and deliver a scroll event.
    pub fn scroll_to(&mut self, offset: f64) {
        self.container.scroll_to(offset);
        self.controller.on_scroll(self.now);
    }

    /// Move the container without any scroll event (what hash navigation
    /// can look like to the page).
    pub fn move_silently(&mut self, offset: f64) {
        self.container.scroll_to(offset);
    }

    /// Same-page hash navigation to a section, without a scroll event.
    pub fn hash_navigate(&mut self, section: &str) -> NavOutcome {
        let id = SectionId::new(section).expect("valid section id");
        if let Some(target) = self.controller.sections().by_id(&id) {
            self.container.scroll_to(target.start_offset());
        }
        self.controller.on_hash_navigation(self.now)
    }

    /// Resize the viewport.
    pub fn resize(&mut self, width: u32, height: f64) {
        self.viewport = Viewport::new(width, height);
        self.controller.on_resize(self.viewport, self.now);
    }

    /// Click a navigation indicator.
    pub fn click(&mut self, section: &str) -> NavOutcome {
        let id = SectionId::new(section).expect("valid section id");
        self.controller.click_indicator(&id, self.now)
    }

    /// Advance the clock and tick transitions.
    pub fn advance(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
        self.controller.tick(self.now);
    }

    /// Advance far enough for any transition to finish.
    pub fn settle(&mut self) {
        self.advance(SETTLE_MS);
    }

    /// Sections whose panels are visible (shown and rendered).
    pub fn visible_sections(&self) -> Vec<String> {
        self.controller
            .stage()
            .panels()
            .iter()
            .filter(|p| p.is_visible())
            .map(|p| p.section.as_str().to_string())
            .collect()
    }

    /// Active section id.
    pub fn current_section(&self) -> Option<String> {
        self.controller
            .current_section()
            .map(|s| s.as_str().to_string())
    }

    /// Section of the active indicator.
    pub fn active_indicator(&self) -> Option<String> {
        self.controller
            .indicators()
            .iter()
            .find(|i| i.active)
            .map(|i| i.section.as_str().to_string())
    }

    /// Pending host commands.
    pub fn drain_commands(&mut self) -> Vec<HostCommand> {
        self.controller.drain_commands()
    }

    /// The controller under test.
    pub fn controller(&self) -> &PageController {
        &self.controller
    }

    /// Mutable controller under test.
    pub fn controller_mut(&mut self) -> &mut PageController {
        &mut self.controller
    }

    /// The scroll container.
    pub fn container(&self) -> &Rc<VirtualContainer> {
        &self.container
    }

    /// Current clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    fn fit_container(&mut self, page: &PageId) {
        let total = self.heights.get(page).copied().unwrap_or(0.0);
        self.container
            .set_extent((total - self.viewport.height).max(0.0));
    }
}

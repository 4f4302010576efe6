//! Trace replay against a headless container.
//!
//! The replayer plays the host: it owns a [`VirtualContainer`], sizes it to
//! the page being shown, runs animation frames up to each event's timestamp
//! and prints the controller's state after every event.

use crate::model::PageId;
use crate::state::nav::NavOutcome;
use crate::state::page::{CoreConfig, PageController};
use crate::trace::{section_list, TraceAction, TraceEvent};
use crate::view_state::scroll::{ScrollContainer, VirtualContainer};
use crate::view_state::types::Viewport;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

/// Drives a [`PageController`] from trace events.
#[derive(Debug)]
pub struct Replayer {
    controller: PageController,
    container: Rc<VirtualContainer>,
    content_heights: HashMap<PageId, f64>,
    viewport: Viewport,
    now: Duration,
}

impl Replayer {
    /// Controller with a 1280x800 viewport and an attached empty container.
    pub fn new(config: CoreConfig) -> Self {
        let viewport = Viewport::default();
        let mut controller = PageController::new(config);
        let container = Rc::new(VirtualContainer::new(0.0));
        controller.on_resize(viewport, Duration::ZERO);
        controller.attach_container(&container, Duration::ZERO);
        Self {
            controller,
            container,
            content_heights: HashMap::new(),
            viewport,
            now: Duration::ZERO,
        }
    }

    /// Replay events in order, one report line each.
    pub fn replay<'a>(&mut self, events: impl IntoIterator<Item = &'a TraceEvent>) -> Vec<String> {
        events.into_iter().map(|event| self.apply(event)).collect()
    }

    /// Apply one event and describe the resulting state.
    ///
    /// Timestamps that go backwards are treated as "now".
    pub fn apply(&mut self, event: &TraceEvent) -> String {
        let at = Duration::from_millis(event.at_ms);
        if at < self.now {
            warn!(at_ms = event.at_ms, now_ms = ?self.now, "trace timestamp went backwards");
        }
        self.now = self.now.max(at);
        let now = self.now;
        self.controller.tick(now);

        let outcome = match &event.action {
            TraceAction::Register { page, sections } => {
                match section_list(sections) {
                    Ok(list) => {
                        let total: f64 = sections.iter().map(|s| f64::from(s.height)).sum();
                        self.content_heights.insert(page.clone(), total);
                        self.controller.registry_mut().register(page.clone(), list);
                    }
                    Err(e) => {
                        warn!(page = %page, error = %e, "register rejected");
                    }
                }
                None
            }
            TraceAction::NavigationStart => {
                self.controller.on_navigation_start(now);
                None
            }
            TraceAction::NavigationComplete { page, kind } => {
                self.fit_container(page);
                self.controller
                    .on_navigation_complete(page.clone(), *kind, now);
                None
            }
            TraceAction::Resize { width, height } => {
                self.viewport = Viewport::new(*width, *height);
                if let Some(page) = self.controller.page().cloned() {
                    self.fit_container(&page);
                }
                self.controller.on_resize(self.viewport, now);
                None
            }
            TraceAction::Scroll { offset } => {
                self.container.scroll_to(*offset);
                self.controller.on_scroll(now);
                None
            }
            TraceAction::Hash { section } => {
                if let Some(target) = self.controller.sections().by_id(section) {
                    self.container.scroll_to(target.start_offset());
                } else {
                    debug!(section = %section, "hash target not on this page");
                }
                Some(self.controller.on_hash_navigation(now))
            }
            TraceAction::Click { section } => Some(self.controller.click_indicator(section, now)),
            TraceAction::OverlayOpen => {
                self.controller.overlay_opened();
                None
            }
            TraceAction::OverlayClose => {
                self.controller.overlay_closed(now);
                None
            }
            TraceAction::Tick => None,
        };

        self.report(event.at_ms, event.action.name(), outcome.as_ref())
    }

    /// Tear the controller down at end of trace.
    pub fn finish(&mut self) {
        self.controller.teardown();
    }

    /// The controller being driven.
    pub fn controller(&self) -> &PageController {
        &self.controller
    }

    fn fit_container(&self, page: &PageId) {
        let content = self.content_heights.get(page).copied().unwrap_or(0.0);
        self.container
            .set_extent((content - self.viewport.height).max(0.0));
    }

    fn report(&mut self, at_ms: u64, name: &str, outcome: Option<&NavOutcome>) -> String {
        let controller = &self.controller;
        let shown: Vec<&str> = controller
            .stage()
            .shown_sections()
            .into_iter()
            .map(|s| s.as_str())
            .collect();
        let mut line = format!(
            "{at_ms}ms {name}: page={} section={} progress={:.1}% tier={} layout={} phase={} shown=[{}]",
            controller.page().map_or("-", |p| p.as_str()),
            controller.current_section().map_or("-", |s| s.as_str()),
            controller.progress(),
            controller.tier().map_or("-", |t| t.as_str()),
            controller.layout_mode(),
            controller.phase().name(),
            shown.join(","),
        );
        if let Some(outcome) = outcome {
            line.push_str(&format!(" outcome={outcome}"));
        }
        let commands: Vec<&str> = self
            .controller
            .drain_commands()
            .into_iter()
            .map(|c| c.name())
            .collect();
        if !commands.is_empty() {
            line.push_str(&format!(" commands=[{}]", commands.join(",")));
        }
        line
    }
}

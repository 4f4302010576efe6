//! Stage - headless model of panel visibility and geometry.
//!
//! Each section owns one panel. The stage records what a browser would hold in
//! the DOM for it: whether it is logically hidden, whether it renders at all,
//! where it sits vertically, and the animation currently moving it. Only the
//! layout machine and the transition director write panel state.
//!
//! # Visibility
//!
//! `hidden` is the logical flag (part of the active set or not); `rendered`
//! is whether the panel paints and hit-tests. A panel animating out is hidden
//! but still rendered until the transition settles.

use crate::model::{SectionId, SectionList};
use crate::view_state::types::{SectionIndex, Viewport};
use std::f64::consts::PI;
use std::time::Duration;

/// How a panel is positioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Absolutely positioned over the shared panel region (paneled mode).
    Anchored,
    /// In normal document flow, one after another (stacked mode).
    Flow,
    /// Pinned in place while the rest of the page flows (stacked home panel).
    Pinned,
}

/// A vertical position animation with "swing" easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    /// Starting top offset.
    pub from: f64,
    /// Final top offset.
    pub to: f64,
    /// Clock time the animation started.
    pub started_at: Duration,
    /// Animation length.
    pub duration: Duration,
}

impl Tween {
    /// Position at clock time `now`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::time::Duration;
    /// # use panelsync::view_state::stage::Tween;
    /// let tween = Tween {
    ///     from: 0.0,
    ///     to: 100.0,
    ///     started_at: Duration::ZERO,
    ///     duration: Duration::from_millis(1000),
    /// };
    /// assert_eq!(tween.value_at(Duration::ZERO), 0.0);
    /// assert!((tween.value_at(Duration::from_millis(500)) - 50.0).abs() < 1e-9);
    /// assert_eq!(tween.value_at(Duration::from_secs(5)), 100.0);
    /// ```
    pub fn value_at(&self, now: Duration) -> f64 {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return self.to;
        }
        let eased = 0.5 - (progress * PI).cos() / 2.0;
        self.from + (self.to - self.from) * eased
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Whether the animation has reached its end at `now`.
    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.started_at + self.duration
    }
}

/// One section's panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Section this panel displays.
    pub section: SectionId,
    /// Rendered height.
    pub height: f64,
    /// Logically hidden (not part of the visible set).
    pub hidden: bool,
    /// Paints and hit-tests (`display` other than `none`).
    pub rendered: bool,
    /// Current top offset.
    pub top: f64,
    /// Positioning scheme.
    pub placement: Placement,
    /// Animation in progress, if any.
    pub tween: Option<Tween>,
}

impl Panel {
    /// Visible to the user: logically shown and rendered.
    pub fn is_visible(&self) -> bool {
        !self.hidden && self.rendered
    }
}

/// All panels of the current page plus the geometry they are laid out in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stage {
    panels: Vec<Panel>,
    viewport: Viewport,
    document_height: f64,
}

impl Stage {
    /// Build a paneled stage with only `active` shown, at rest.
    ///
    /// Panels default to the viewport height.
    pub fn new(sections: &SectionList, viewport: Viewport, active: Option<SectionIndex>) -> Self {
        let panels = sections
            .iter()
            .map(|section| Panel {
                section: section.id().clone(),
                height: viewport.height,
                hidden: true,
                rendered: false,
                top: 0.0,
                placement: Placement::Anchored,
                tween: None,
            })
            .collect();

        let mut stage = Self {
            panels,
            viewport,
            document_height: viewport.height,
        };
        stage.show_only(active.map(|i| i.get()));
        stage
    }

    /// All panels in section order.
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Panel of a section.
    pub fn panel(&self, section: &SectionId) -> Option<&Panel> {
        self.panels.iter().find(|p| &p.section == section)
    }

    /// Mutable panel of a section.
    pub fn panel_mut(&mut self, section: &SectionId) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|p| &p.section == section)
    }

    /// Mutable access to every panel, in section order.
    pub fn panels_mut(&mut self) -> std::slice::IterMut<'_, Panel> {
        self.panels.iter_mut()
    }

    /// Sections whose panels are logically shown.
    pub fn shown_sections(&self) -> Vec<&SectionId> {
        self.panels
            .iter()
            .filter(|p| !p.hidden)
            .map(|p| &p.section)
            .collect()
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Full document height (the off-screen reference for downward exits).
    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    /// Record new viewport and document geometry.
    pub fn set_geometry(&mut self, viewport: Viewport, document_height: f64) {
        self.viewport = viewport;
        self.document_height = document_height.max(viewport.height);
    }

    /// Record a measured panel height.
    pub fn set_panel_height(&mut self, section: &SectionId, height: f64) {
        if let Some(panel) = self.panel_mut(section) {
            panel.height = height.max(0.0);
        }
    }

    /// Resting top offset that centers a panel in the viewport.
    ///
    /// Panels taller than the viewport rest at the top edge.
    pub fn centered_top(&self, height: f64) -> f64 {
        ((self.viewport.height - height) / 2.0).max(0.0)
    }

    /// Show exactly the panel at `index` centered at rest; hide and
    /// unrender all others. Cancels every running animation.
    pub fn show_only(&mut self, index: Option<usize>) {
        let viewport_height = self.viewport.height;
        for (i, panel) in self.panels.iter_mut().enumerate() {
            let shown = Some(i) == index;
            panel.hidden = !shown;
            panel.rendered = shown;
            panel.placement = Placement::Anchored;
            panel.tween = None;
            panel.top = ((viewport_height - panel.height) / 2.0).max(0.0);
        }
    }

    /// Start animating a panel from its current position to `to`.
    pub fn animate(&mut self, section: &SectionId, to: f64, now: Duration, duration: Duration) {
        if let Some(panel) = self.panel_mut(section) {
            panel.tween = Some(Tween {
                from: panel.top,
                to,
                started_at: now,
                duration,
            });
        }
    }

    /// Advance every animation to `now`, dropping finished ones.
    pub fn sample(&mut self, now: Duration) {
        for panel in &mut self.panels {
            if let Some(tween) = panel.tween {
                panel.top = tween.value_at(now);
                if tween.is_finished(now) {
                    panel.tween = None;
                }
            }
        }
    }

    /// Stop every animation where it currently stands.
    pub fn stop_all(&mut self, now: Duration) {
        self.sample(now);
        for panel in &mut self.panels {
            panel.tween = None;
        }
    }

    /// True while any panel is animating.
    pub fn is_animating(&self) -> bool {
        self.panels.iter().any(|p| p.tween.is_some())
    }
}

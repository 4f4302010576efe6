//! Responsive breakpoints: width → tier classification and the
//! paneled/stacked layout state machine.
//!
//! # Tiers
//!
//! ```text
//!  0 ──────────── compact_max │ compact_max+1 ──── full_min-1 │ full_min ──────── ∞
//!        Compact              │           Medium              │        Full
//! ```
//!
//! Every width maps to exactly one tier. Downstream layout only reacts when the
//! *tier* changes, so dragging a window edge within a tier costs nothing.
//!
//! # Layout states
//!
//! ```text
//!            width → Compact
//!  Paneled ─────────────────────► Stacked
//!     ▲                              │
//!     └──────────────────────────────┘
//!           width → Medium/Full
//! ```
//!
//! Both transitions are guarded by the current state: re-entering the state
//! the machine is already in is a no-op.

use crate::state::observer::{Observable, Subscription};
use crate::view_state::stage::{Placement, Stage};
use thiserror::Error;
use tracing::{debug, info};

/// Discrete viewport-width classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DisplayTier {
    /// Narrow (phones): stacked layout, collapsed navigation.
    Compact,
    /// Intermediate (tablets, small windows): full navigation, no side nav.
    Medium,
    /// Wide (desktop): full navigation plus side navigation.
    Full,
}

impl DisplayTier {
    /// All tiers, narrowest first.
    pub const ALL: [DisplayTier; 3] = [DisplayTier::Compact, DisplayTier::Medium, DisplayTier::Full];

    /// Whether the full navigation bar is shown.
    pub fn shows_full_nav(self) -> bool {
        self != DisplayTier::Compact
    }

    /// Whether the side navigation is shown.
    pub fn shows_side_nav(self) -> bool {
        self == DisplayTier::Full
    }

    /// Whether sections stack vertically instead of sharing a panel region.
    pub fn uses_stacked_layout(self) -> bool {
        self == DisplayTier::Compact
    }

    /// Layout mode implied by this tier.
    pub fn layout_mode(self) -> LayoutMode {
        if self.uses_stacked_layout() {
            LayoutMode::Stacked
        } else {
            LayoutMode::Paneled
        }
    }

    /// Lowercase name, as used in logs and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayTier::Compact => "compact",
            DisplayTier::Medium => "medium",
            DisplayTier::Full => "full",
        }
    }
}

impl std::fmt::Display for DisplayTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected breakpoint thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("compact_max ({compact_max}) must be below full_min ({full_min})")]
pub struct InvalidBreakpoints {
    /// Requested widest compact width.
    pub compact_max: u32,
    /// Requested narrowest full width.
    pub full_min: u32,
}

/// Ordered tier thresholds with `compact_max < full_min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoints {
    compact_max: u32,
    full_min: u32,
}

impl Breakpoints {
    /// Defaults: below 800px is compact, 1200px and up is full.
    pub const DEFAULT: Self = Self {
        compact_max: 799,
        full_min: 1200,
    };

    /// Validate thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidBreakpoints`] unless `compact_max < full_min`.
    pub fn new(compact_max: u32, full_min: u32) -> Result<Self, InvalidBreakpoints> {
        if compact_max < full_min {
            Ok(Self {
                compact_max,
                full_min,
            })
        } else {
            Err(InvalidBreakpoints {
                compact_max,
                full_min,
            })
        }
    }

    /// Widest compact width.
    pub fn compact_max(&self) -> u32 {
        self.compact_max
    }

    /// Narrowest full width.
    pub fn full_min(&self) -> u32 {
        self.full_min
    }

    /// Classify a width. Pure and total.
    ///
    /// # Examples
    ///
    /// ```
    /// # use panelsync::state::breakpoint::{Breakpoints, DisplayTier};
    /// let bp = Breakpoints::DEFAULT;
    /// assert_eq!(bp.classify(750), DisplayTier::Compact);
    /// assert_eq!(bp.classify(800), DisplayTier::Medium);
    /// assert_eq!(bp.classify(1200), DisplayTier::Full);
    /// ```
    pub fn classify(&self, width: u32) -> DisplayTier {
        if width <= self.compact_max {
            DisplayTier::Compact
        } else if width >= self.full_min {
            DisplayTier::Full
        } else {
            DisplayTier::Medium
        }
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A tier change reported by [`BreakpointController::observe_width`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierChange {
    /// Tier before the resize.
    pub from: DisplayTier,
    /// Tier after the resize.
    pub to: DisplayTier,
}

impl TierChange {
    /// Whether the change crosses the stacked/paneled boundary.
    pub fn changes_layout(&self) -> bool {
        self.from.layout_mode() != self.to.layout_mode()
    }
}

/// Observes viewport widths and reports tier changes only.
#[derive(Debug)]
pub struct BreakpointController {
    breakpoints: Breakpoints,
    tier: Observable<Option<DisplayTier>>,
}

impl BreakpointController {
    /// Create a controller that has not yet seen a width.
    pub fn new(breakpoints: Breakpoints) -> Self {
        Self {
            breakpoints,
            tier: Observable::new(None),
        }
    }

    /// Thresholds in use.
    pub fn breakpoints(&self) -> Breakpoints {
        self.breakpoints
    }

    /// Classify a width without recording it.
    pub fn classify(&self, width: u32) -> DisplayTier {
        self.breakpoints.classify(width)
    }

    /// Current tier, once a width has been observed.
    pub fn tier(&self) -> Option<DisplayTier> {
        self.tier.get()
    }

    /// Record a viewport width.
    ///
    /// The first observation establishes the tier and reports nothing; later
    /// ones report a [`TierChange`] only when the tier differs.
    pub fn observe_width(&mut self, width: u32) -> Option<TierChange> {
        let next = self.classify(width);
        let previous = self.tier.get();
        if !self.tier.set(Some(next)) {
            return None;
        }
        match previous {
            Some(from) => {
                debug!(width, from = %from, to = %next, "display tier changed");
                Some(TierChange { from, to: next })
            }
            None => {
                debug!(width, tier = %next, "initial display tier");
                None
            }
        }
    }

    /// Subscribe to tier changes (including the initial classification).
    pub fn subscribe(&self, callback: impl Fn(&Option<DisplayTier>) + 'static) -> Subscription {
        self.tier.subscribe(callback)
    }

    /// Drop every subscriber. Idempotent.
    pub fn clear_subscribers(&self) {
        self.tier.clear_subscribers();
    }
}

/// Layout presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutMode {
    /// Sections share one region and swap with animated transitions.
    Paneled,
    /// Sections are all visible, stacked vertically, without transitions.
    Stacked,
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LayoutMode::Paneled => "paneled",
            LayoutMode::Stacked => "stacked",
        })
    }
}

/// Paneled/stacked state machine applied to a [`Stage`].
///
/// The home panel is the first one on the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMachine {
    mode: LayoutMode,
}

impl Default for LayoutMachine {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Paneled,
        }
    }
}

impl LayoutMachine {
    /// Start in paneled mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// Move to `target`, rearranging `stage`.
    ///
    /// `active` is the index of the currently active section, kept visible
    /// when returning to paneled mode. Returns `false` (and leaves the stage
    /// untouched) when already in `target`.
    pub fn apply(&mut self, target: LayoutMode, stage: &mut Stage, active: Option<usize>) -> bool {
        if self.mode == target {
            return false;
        }
        match target {
            LayoutMode::Stacked => stack(stage),
            LayoutMode::Paneled => unstack(stage, active),
        }
        info!(from = %self.mode, to = %target, "layout mode switched");
        self.mode = target;
        true
    }

    /// Re-apply the current mode to a freshly built stage.
    pub fn arrange(&self, stage: &mut Stage, active: Option<usize>) {
        match self.mode {
            LayoutMode::Stacked => stack(stage),
            LayoutMode::Paneled => unstack(stage, active),
        }
    }
}

/// Every panel visible; home pinned at its anchored spot, the rest in flow.
fn stack(stage: &mut Stage) {
    let home_top = stage
        .panels()
        .first()
        .map(|home| stage.centered_top(home.height))
        .unwrap_or(0.0);
    let mut flow_top = 0.0;
    for (i, panel) in stage.panels_mut().enumerate() {
        panel.hidden = false;
        panel.rendered = true;
        panel.tween = None;
        if i == 0 {
            panel.placement = Placement::Pinned;
            panel.top = home_top;
        } else {
            panel.placement = Placement::Flow;
            panel.top = flow_top;
        }
        flow_top += panel.height;
    }
}

/// Only the active panel shown, centered at rest. Every other panel, home
/// included, is hidden.
fn unstack(stage: &mut Stage, active: Option<usize>) {
    stage.show_only(active);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SectionId, SectionList};
    use crate::view_state::types::{SectionIndex, Viewport};
    use proptest::prelude::*;

    fn stage(active: usize) -> Stage {
        let list = SectionList::from_heights(
            ["home", "about", "work"]
                .iter()
                .map(|id| (SectionId::new(*id).unwrap(), 800)),
        )
        .unwrap();
        let mut stage = Stage::new(&list, Viewport::new(1280, 900.0), SectionIndex::new(active, 3));
        stage.set_panel_height(&SectionId::new("home").unwrap(), 700.0);
        stage.show_only(Some(active));
        stage
    }

    #[test]
    fn derived_booleans_follow_tier() {
        assert!(!DisplayTier::Compact.shows_full_nav());
        assert!(DisplayTier::Medium.shows_full_nav());
        assert!(DisplayTier::Full.shows_full_nav());

        assert!(!DisplayTier::Medium.shows_side_nav());
        assert!(DisplayTier::Full.shows_side_nav());

        assert!(DisplayTier::Compact.uses_stacked_layout());
        assert!(!DisplayTier::Full.uses_stacked_layout());
    }

    #[test]
    fn breakpoints_reject_unordered_thresholds() {
        assert!(Breakpoints::new(1000, 1000).is_err());
        assert!(Breakpoints::new(1200, 800).is_err());
        assert!(Breakpoints::new(799, 800).is_ok());
    }

    #[test]
    fn adjacent_thresholds_leave_no_medium_width() {
        let bp = Breakpoints::new(799, 800).unwrap();
        assert_eq!(bp.classify(799), DisplayTier::Compact);
        assert_eq!(bp.classify(800), DisplayTier::Full);
    }

    #[test]
    fn first_observation_reports_no_change() {
        let mut controller = BreakpointController::new(Breakpoints::DEFAULT);
        assert_eq!(controller.observe_width(900), None);
        assert_eq!(controller.tier(), Some(DisplayTier::Medium));
    }

    #[test]
    fn resize_within_tier_is_debounced() {
        let mut controller = BreakpointController::new(Breakpoints::DEFAULT);
        controller.observe_width(900);
        for width in 901..1199 {
            assert_eq!(controller.observe_width(width), None);
        }
    }

    #[test]
    fn crossing_threshold_reports_change_once() {
        let mut controller = BreakpointController::new(Breakpoints::DEFAULT);
        controller.observe_width(900);

        let change = controller.observe_width(750).expect("tier changed");
        assert_eq!(change.from, DisplayTier::Medium);
        assert_eq!(change.to, DisplayTier::Compact);
        assert!(change.changes_layout());

        assert_eq!(controller.observe_width(740), None);
    }

    #[test]
    fn medium_to_full_does_not_change_layout() {
        let change = TierChange {
            from: DisplayTier::Medium,
            to: DisplayTier::Full,
        };
        assert!(!change.changes_layout());
    }

    #[test]
    fn stacking_shows_all_panels_and_pins_home() {
        let mut machine = LayoutMachine::new();
        let mut stage = stage(1);

        assert!(machine.apply(LayoutMode::Stacked, &mut stage, Some(1)));

        assert!(stage.panels().iter().all(|p| p.is_visible() && p.tween.is_none()));
        let home = &stage.panels()[0];
        assert_eq!(home.placement, Placement::Pinned);
        assert_eq!(home.top, 100.0);
        assert!(stage.panels()[1..]
            .iter()
            .all(|p| p.placement == Placement::Flow));
    }

    #[test]
    fn unstacking_keeps_only_active_and_hides_home() {
        let mut machine = LayoutMachine::new();
        let mut stage = stage(2);
        machine.apply(LayoutMode::Stacked, &mut stage, Some(2));

        assert!(machine.apply(LayoutMode::Paneled, &mut stage, Some(2)));

        let shown: Vec<&str> = stage.shown_sections().iter().map(|s| s.as_str()).collect();
        assert_eq!(shown, vec!["work"]);
        let home = &stage.panels()[0];
        assert_eq!(home.placement, Placement::Anchored);
        assert_eq!(home.top, 100.0);
        assert!(home.hidden);
        assert!(!home.rendered);
        assert!(!home.is_visible());
    }

    #[test]
    fn reentering_same_mode_is_noop() {
        let mut machine = LayoutMachine::new();
        let mut stage = stage(0);
        let before = stage.clone();

        assert!(!machine.apply(LayoutMode::Paneled, &mut stage, Some(0)));
        assert_eq!(stage, before);

        machine.apply(LayoutMode::Stacked, &mut stage, Some(0));
        let stacked = stage.clone();
        assert!(!machine.apply(LayoutMode::Stacked, &mut stage, Some(0)));
        assert_eq!(stage, stacked);
    }

    proptest! {
        #[test]
        fn classification_is_total_and_stable(
            compact_max in 0u32..5000,
            gap in 1u32..5000,
            width in 0u32..20_000,
        ) {
            let bp = Breakpoints::new(compact_max, compact_max + gap).unwrap();
            let tier = bp.classify(width);
            prop_assert_eq!(tier, bp.classify(width));

            let matches = DisplayTier::ALL
                .iter()
                .filter(|&&t| match t {
                    DisplayTier::Compact => width <= compact_max,
                    DisplayTier::Medium => width > compact_max && width < compact_max + gap,
                    DisplayTier::Full => width >= compact_max + gap,
                })
                .count();
            prop_assert_eq!(matches, 1);
        }
    }
}

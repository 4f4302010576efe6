//! Animated section swaps in paneled mode.
//!
//! A transition is a small state machine advanced by the host clock:
//!
//! ```text
//!             transition()                settle_at                 immediately             done_at
//!  Idle ─────────────────► AnimatingOut ────────────► Settling ─────────────────► AnimatingIn ───────► Idle
//!                             │   ▲                                                  │
//!                             └───┴──────────── transition() (last request wins) ◄───┘
//! ```
//!
//! 1. Every logically visible panel is marked hidden and tweened off-screen.
//! 2. The target panel is marked visible.
//! 3. At `settle_at` every hidden panel stops rendering.
//! 4. Every visible panel is pre-positioned on the side opposite the exit and
//!    tweened to its centered resting top.
//!
//! Pending steps live in [`TransitionPhase`]; a new request overwrites the
//! phase, so a superseded transition's settle and animate-in never run.

use crate::model::{SectionId, SectionList};
use crate::state::breakpoint::LayoutMode;
use crate::view_state::stage::Stage;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Which way the section sequence moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward a section earlier in the order.
    TowardStart,
    /// Toward a section later in the order.
    TowardEnd,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Direction::TowardStart => "toward-start",
            Direction::TowardEnd => "toward-end",
        })
    }
}

/// Direction from one order to another; `None` for a self-transition.
///
/// # Examples
///
/// ```
/// # use panelsync::state::transition::{direction, Direction};
/// assert_eq!(direction(2, 0), Some(Direction::TowardStart));
/// assert_eq!(direction(0, 2), Some(Direction::TowardEnd));
/// assert_eq!(direction(1, 1), None);
/// ```
pub fn direction(from_order: usize, to_order: usize) -> Option<Direction> {
    match to_order.cmp(&from_order) {
        std::cmp::Ordering::Greater => Some(Direction::TowardEnd),
        std::cmp::Ordering::Less => Some(Direction::TowardStart),
        std::cmp::Ordering::Equal => None,
    }
}

/// Top offset an outgoing panel animates to.
///
/// Toward the end it leaves past the document's bottom edge; toward the start
/// it leaves fully above the viewport.
pub fn exit_top(direction: Direction, height: f64, document_height: f64, margin: f64) -> f64 {
    match direction {
        Direction::TowardEnd => document_height + margin * height,
        Direction::TowardStart => -(height + margin * height),
    }
}

/// Top offset an incoming panel starts from: the mirror of [`exit_top`].
pub fn entry_top(direction: Direction, height: f64, document_height: f64, margin: f64) -> f64 {
    match direction {
        Direction::TowardEnd => exit_top(Direction::TowardStart, height, document_height, margin),
        Direction::TowardStart => exit_top(Direction::TowardEnd, height, document_height, margin),
    }
}

/// Rejected transition timing.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidTiming {
    /// Hidden panels must stop rendering before the outgoing animation ends.
    #[error("settle delay ({settle_delay_ms}ms) must be shorter than the duration ({duration_ms}ms)")]
    SettleNotBeforeEnd {
        /// Requested settle delay.
        settle_delay_ms: u128,
        /// Requested animation duration.
        duration_ms: u128,
    },
    /// Off-screen margin must be finite and non-negative.
    #[error("off-screen margin must be a finite non-negative factor, got {0}")]
    Margin(f64),
}

/// Durations and geometry of a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionTiming {
    duration: Duration,
    settle_delay: Duration,
    offscreen_margin: f64,
}

impl TransitionTiming {
    /// Default animation length.
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);
    /// Default delay before hidden panels stop rendering.
    pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(400);
    /// Default off-screen margin as a fraction of panel height.
    pub const DEFAULT_MARGIN: f64 = 2.0 / 3.0;

    /// Validate timing.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTiming`] if `settle_delay >= duration` or the margin is
    /// negative or not finite.
    pub fn new(
        duration: Duration,
        settle_delay: Duration,
        offscreen_margin: f64,
    ) -> Result<Self, InvalidTiming> {
        if settle_delay >= duration {
            return Err(InvalidTiming::SettleNotBeforeEnd {
                settle_delay_ms: settle_delay.as_millis(),
                duration_ms: duration.as_millis(),
            });
        }
        if !offscreen_margin.is_finite() || offscreen_margin < 0.0 {
            return Err(InvalidTiming::Margin(offscreen_margin));
        }
        Ok(Self {
            duration,
            settle_delay,
            offscreen_margin,
        })
    }

    /// Length of each outgoing and incoming animation.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Delay after the start before hidden panels stop rendering.
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Off-screen margin as a fraction of panel height.
    pub fn offscreen_margin(&self) -> f64 {
        self.offscreen_margin
    }
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            duration: Self::DEFAULT_DURATION,
            settle_delay: Self::DEFAULT_SETTLE_DELAY,
            offscreen_margin: Self::DEFAULT_MARGIN,
        }
    }
}

/// Where the in-flight transition stands.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionPhase {
    /// Nothing in flight.
    Idle,
    /// Outgoing panels are leaving; target is marked visible.
    AnimatingOut {
        /// Section being revealed.
        target: SectionId,
        /// Direction of travel.
        direction: Direction,
        /// When hidden panels stop rendering.
        settle_at: Duration,
    },
    /// Hidden panels are unrendered; the incoming animation starts next.
    Settling {
        /// Section being revealed.
        target: SectionId,
        /// Direction of travel.
        direction: Direction,
        /// When settling happened.
        at: Duration,
    },
    /// Incoming panels are moving to rest.
    AnimatingIn {
        /// Section being revealed.
        target: SectionId,
        /// When the incoming animation ends.
        done_at: Duration,
    },
}

impl TransitionPhase {
    /// Short name for logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            TransitionPhase::Idle => "idle",
            TransitionPhase::AnimatingOut { .. } => "animating-out",
            TransitionPhase::Settling { .. } => "settling",
            TransitionPhase::AnimatingIn { .. } => "animating-in",
        }
    }
}

/// Runs paneled-mode transitions against a [`Stage`].
#[derive(Debug)]
pub struct TransitionDirector {
    timing: TransitionTiming,
    layout: LayoutMode,
    phase: TransitionPhase,
    generation: u64,
}

impl Default for TransitionDirector {
    fn default() -> Self {
        Self::new(TransitionTiming::default())
    }
}

impl TransitionDirector {
    /// Create an idle director in paneled mode.
    pub fn new(timing: TransitionTiming) -> Self {
        Self {
            timing,
            layout: LayoutMode::Paneled,
            phase: TransitionPhase::Idle,
            generation: 0,
        }
    }

    /// Timing in use.
    pub fn timing(&self) -> TransitionTiming {
        self.timing
    }

    /// Current phase.
    pub fn phase(&self) -> &TransitionPhase {
        &self.phase
    }

    /// Whether a transition has pending steps.
    pub fn is_in_flight(&self) -> bool {
        self.phase != TransitionPhase::Idle
    }

    /// Number of transitions started so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Track the layout mode. Entering stacked mode cancels anything in flight.
    pub fn set_layout_mode(&mut self, mode: LayoutMode, stage: &mut Stage, now: Duration) {
        if mode == LayoutMode::Stacked {
            self.cancel(stage, now);
        }
        self.layout = mode;
    }

    /// Start a transition from `from` to `to`.
    ///
    /// Returns `false` without touching the stage when in stacked mode, when
    /// either id is not in `sections`, or when `from == to`.
    pub fn transition(
        &mut self,
        stage: &mut Stage,
        sections: &SectionList,
        from: &SectionId,
        to: &SectionId,
        now: Duration,
    ) -> bool {
        if self.layout == LayoutMode::Stacked {
            debug!(from = %from, to = %to, "transition refused in stacked layout");
            return false;
        }
        let (Some(source), Some(target)) = (sections.by_id(from), sections.by_id(to)) else {
            debug!(from = %from, to = %to, "transition refused: unknown section");
            return false;
        };
        let Some(direction) = direction(source.order(), target.order()) else {
            return false;
        };
        if stage.panel(to).is_none() {
            debug!(to = %to, "transition refused: no panel for target");
            return false;
        }

        if self.is_in_flight() {
            info!(
                phase = self.phase.name(),
                generation = self.generation,
                to = %to,
                "transition interrupted"
            );
        }
        self.generation += 1;
        info!(from = %from, to = %to, %direction, generation = self.generation, "transition started");

        stage.sample(now);
        let document_height = stage.document_height();
        let margin = self.timing.offscreen_margin;
        let outgoing: Vec<(SectionId, f64)> = stage
            .panels()
            .iter()
            .filter(|p| !p.hidden)
            .map(|p| {
                let top = exit_top(direction, p.height, document_height, margin);
                (p.section.clone(), top)
            })
            .collect();
        for (section, top) in &outgoing {
            if let Some(panel) = stage.panel_mut(section) {
                panel.hidden = true;
            }
            stage.animate(section, *top, now, self.timing.duration);
        }

        if let Some(panel) = stage.panel_mut(to) {
            panel.hidden = false;
        }

        self.phase = TransitionPhase::AnimatingOut {
            target: to.clone(),
            direction,
            settle_at: now + self.timing.settle_delay,
        };
        true
    }

    /// Run every step due at `now` and sample the stage.
    pub fn tick(&mut self, stage: &mut Stage, now: Duration) {
        loop {
            match &self.phase {
                TransitionPhase::AnimatingOut {
                    target,
                    direction,
                    settle_at,
                } if now >= *settle_at => {
                    let (target, direction, at) = (target.clone(), *direction, *settle_at);
                    stage.sample(at);
                    let mut unrendered = 0usize;
                    for panel in stage.panels_mut().filter(|p| p.hidden && p.rendered) {
                        panel.rendered = false;
                        unrendered += 1;
                    }
                    debug!(target = %target, unrendered, "transition settled");
                    self.phase = TransitionPhase::Settling {
                        target,
                        direction,
                        at,
                    };
                }
                TransitionPhase::Settling {
                    target,
                    direction,
                    at,
                } => {
                    let (target, direction, at) = (target.clone(), *direction, *at);
                    self.animate_in(stage, direction, at);
                    self.phase = TransitionPhase::AnimatingIn {
                        target,
                        done_at: at + self.timing.duration,
                    };
                }
                TransitionPhase::AnimatingIn { target, done_at } if now >= *done_at => {
                    debug!(target = %target, generation = self.generation, "transition complete");
                    self.phase = TransitionPhase::Idle;
                }
                _ => break,
            }
        }
        stage.sample(now);
    }

    /// Drop pending steps and freeze every animation in place. Returns whether
    /// anything was in flight.
    pub fn cancel(&mut self, stage: &mut Stage, now: Duration) -> bool {
        stage.stop_all(now);
        if !self.is_in_flight() {
            return false;
        }
        info!(phase = self.phase.name(), generation = self.generation, "transition cancelled");
        self.phase = TransitionPhase::Idle;
        true
    }

    fn animate_in(&self, stage: &mut Stage, direction: Direction, at: Duration) {
        let document_height = stage.document_height();
        let margin = self.timing.offscreen_margin;
        let incoming: Vec<(SectionId, f64, f64)> = stage
            .panels()
            .iter()
            .filter(|p| !p.hidden)
            .map(|p| {
                let start = entry_top(direction, p.height, document_height, margin);
                (p.section.clone(), start, stage.centered_top(p.height))
            })
            .collect();
        for (section, start, rest) in &incoming {
            if let Some(panel) = stage.panel_mut(section) {
                panel.top = *start;
                panel.rendered = true;
            }
            stage.animate(section, *rest, at, self.timing.duration);
        }
    }
}

#[cfg(test)]
#[path = "transition_tests.rs"]
mod tests;

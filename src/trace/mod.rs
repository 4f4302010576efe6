//! JSONL event traces.
//!
//! One event per line:
//!
//! ```text
//! {"at_ms": 0, "event": "register", "page": "home", "sections": [{"id": "intro", "height": 800}]}
//! {"at_ms": 0, "event": "navigation_complete", "page": "home"}
//! {"at_ms": 120, "event": "scroll", "offset": 900}
//! ```
//!
//! Blank lines are skipped. Every error carries the 1-based line number.

pub mod replay;

pub use replay::Replayer;

use crate::model::{PageId, ParseError, SectionId, SectionList};
use crate::state::page::NavigationKind;
use serde::Deserialize;
use serde_json::Value;

/// One timestamped host event.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEvent {
    /// Host clock in milliseconds.
    pub at_ms: u64,
    /// What happened.
    pub action: TraceAction,
}

/// Rendered height of one section in a `register` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraceSection {
    /// Section identifier (a leading `#` is accepted).
    pub id: SectionId,
    /// Rendered height in pixels.
    pub height: u32,
}

/// Event kinds, tagged by the `event` key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceAction {
    /// Content provider registered a page's sections.
    Register {
        /// Page the sections belong to.
        page: PageId,
        /// Sections top to bottom.
        sections: Vec<TraceSection>,
    },
    /// Router is leaving the current page.
    NavigationStart,
    /// Router finished showing `page`.
    NavigationComplete {
        /// Page now displayed.
        page: PageId,
        /// Push or history restore.
        #[serde(default)]
        kind: NavigationKind,
    },
    /// Viewport resized.
    Resize {
        /// Viewport width.
        width: u32,
        /// Viewport height.
        height: f64,
    },
    /// User scrolled the container.
    Scroll {
        /// New scroll offset.
        offset: f64,
    },
    /// Same-page hash link followed.
    Hash {
        /// Target section.
        section: SectionId,
    },
    /// Navigation indicator clicked.
    Click {
        /// Indicator's section.
        section: SectionId,
    },
    /// Overlay menu opened.
    OverlayOpen,
    /// Overlay menu finished closing.
    OverlayClose,
    /// Animation frame with no other input.
    Tick,
}

impl TraceAction {
    /// The `event` tag of this action.
    pub fn name(&self) -> &'static str {
        match self {
            TraceAction::Register { .. } => "register",
            TraceAction::NavigationStart => "navigation_start",
            TraceAction::NavigationComplete { .. } => "navigation_complete",
            TraceAction::Resize { .. } => "resize",
            TraceAction::Scroll { .. } => "scroll",
            TraceAction::Hash { .. } => "hash",
            TraceAction::Click { .. } => "click",
            TraceAction::OverlayOpen => "overlay_open",
            TraceAction::OverlayClose => "overlay_close",
            TraceAction::Tick => "tick",
        }
    }
}

/// Build the section list of a `register` event.
///
/// # Errors
///
/// Returns the list error when section ids repeat.
pub fn section_list(sections: &[TraceSection]) -> Result<SectionList, crate::model::SectionListError> {
    SectionList::from_heights(sections.iter().map(|s| (s.id.clone(), s.height)))
}

/// Parse a single trace line.
///
/// Returns `Ok(None)` for blank lines.
///
/// # Errors
///
/// - [`ParseError::InvalidJson`] when the line is not JSON
/// - [`ParseError::MissingField`] when `at_ms` or `event` is absent
/// - [`ParseError::InvalidEvent`] for unknown kinds, bad payloads and
///   duplicate section ids
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<TraceEvent>, ParseError> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(line).map_err(|e| ParseError::InvalidJson {
        line: line_number,
        message: e.to_string(),
    })?;

    let Some(object) = value.as_object() else {
        return Err(ParseError::InvalidEvent {
            line: line_number,
            message: "expected a JSON object".to_string(),
        });
    };

    let at_ms = object
        .get("at_ms")
        .ok_or(ParseError::MissingField {
            line: line_number,
            field: "at_ms",
        })?
        .as_u64()
        .ok_or_else(|| ParseError::InvalidEvent {
            line: line_number,
            message: "at_ms must be a non-negative integer".to_string(),
        })?;

    if !object.contains_key("event") {
        return Err(ParseError::MissingField {
            line: line_number,
            field: "event",
        });
    }

    let action: TraceAction =
        serde_json::from_value(value).map_err(|e| ParseError::InvalidEvent {
            line: line_number,
            message: e.to_string(),
        })?;

    if let TraceAction::Register { sections, .. } = &action {
        section_list(sections).map_err(|e| ParseError::InvalidEvent {
            line: line_number,
            message: e.to_string(),
        })?;
    }

    Ok(Some(TraceEvent { at_ms, action }))
}

/// Parse every line, collecting events and errors separately.
///
/// Errors never stop parsing; the caller reports and skips them.
pub fn parse_trace<S: AsRef<str>>(lines: &[S]) -> (Vec<TraceEvent>, Vec<ParseError>) {
    let mut events = Vec::new();
    let mut errors = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        match parse_line(line.as_ref(), i + 1) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }

    (events, errors)
}

//! panelsync
//!
//! Headless scroll-position and section-synchronization core for paneled
//! single-page layouts: which section is active, how the layout responds to
//! viewport width, and how panels animate between sections.
//!
//! Pure Core / Impure Shell: `model`, `view_state` and `state` are pure and
//! driven by an explicit clock; `config`, `logging`, `source` and `trace`
//! back the trace-replay binary.

pub mod config;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod trace;
pub mod view_state;

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;

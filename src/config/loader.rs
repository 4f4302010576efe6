//! Configuration file loading with precedence handling.

use crate::state::breakpoint::Breakpoints;
use crate::state::page::CoreConfig;
use crate::state::transition::TransitionTiming;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// Values parse but cannot be used together.
    #[error("Invalid {field}: {reason}")]
    InvalidValue {
        /// Offending setting.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/panelsync/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Restore saved scroll offsets on back/forward navigation.
    #[serde(default)]
    pub restore_scroll: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Tier thresholds.
    #[serde(default)]
    pub breakpoints: Option<BreakpointsSection>,

    /// Transition timing.
    #[serde(default)]
    pub transition: Option<TransitionSection>,
}

/// `[breakpoints]` section.
///
/// ```toml
/// [breakpoints]
/// compact_max = 799
/// full_min = 1200
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BreakpointsSection {
    /// Widest width still classified compact.
    #[serde(default)]
    pub compact_max: Option<u32>,

    /// Narrowest width classified full.
    #[serde(default)]
    pub full_min: Option<u32>,
}

/// `[transition]` section.
///
/// ```toml
/// [transition]
/// duration_ms = 2000
/// settle_delay_ms = 400
/// offscreen_margin = 0.6667
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TransitionSection {
    /// Length of each outgoing and incoming animation.
    #[serde(default)]
    pub duration_ms: Option<u64>,

    /// Delay before hidden panels stop rendering.
    #[serde(default)]
    pub settle_delay_ms: Option<u64>,

    /// Off-screen margin as a fraction of panel height.
    #[serde(default)]
    pub offscreen_margin: Option<f64>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Restore saved offsets on back/forward navigation.
    pub restore_scroll: bool,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Widest compact width.
    pub compact_max: u32,
    /// Narrowest full width.
    pub full_min: u32,
    /// Transition animation length in milliseconds.
    pub duration_ms: u64,
    /// Settle delay in milliseconds.
    pub settle_delay_ms: u64,
    /// Off-screen margin factor.
    pub offscreen_margin: f64,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let timing = TransitionTiming::default();
        Self {
            restore_scroll: true,
            log_file_path: default_log_path(),
            compact_max: Breakpoints::DEFAULT.compact_max(),
            full_min: Breakpoints::DEFAULT.full_min(),
            duration_ms: duration_ms(timing.duration()),
            settle_delay_ms: duration_ms(timing.settle_delay()),
            offscreen_margin: timing.offscreen_margin(),
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl ResolvedConfig {
    /// Validate into the settings the core runs with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when breakpoints are unordered,
    /// the settle delay is not shorter than the duration, or the margin is
    /// negative or not finite.
    pub fn to_core(&self) -> Result<CoreConfig, ConfigError> {
        let breakpoints =
            Breakpoints::new(self.compact_max, self.full_min).map_err(|e| {
                ConfigError::InvalidValue {
                    field: "breakpoints",
                    reason: e.to_string(),
                }
            })?;
        let timing = TransitionTiming::new(
            Duration::from_millis(self.duration_ms),
            Duration::from_millis(self.settle_delay_ms),
            self.offscreen_margin,
        )
        .map_err(|e| ConfigError::InvalidValue {
            field: "transition",
            reason: e.to_string(),
        })?;
        Ok(CoreConfig {
            breakpoints,
            timing,
            restore_scroll: self.restore_scroll,
        })
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/panelsync/panelsync.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("panelsync").join("panelsync.log")
    } else {
        PathBuf::from("panelsync.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/panelsync/config.toml` on Unix, appropriate path on
/// other platforms. Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("panelsync").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `PANELSYNC_CONFIG` environment variable
/// 3. Default path `~/.config/panelsync/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("PANELSYNC_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `PANELSYNC_LOG_FILE`: Override log file path
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(path) = std::env::var("PANELSYNC_LOG_FILE") {
        if !path.is_empty() {
            config.log_file_path = PathBuf::from(path);
        }
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };
    let breakpoints = config.breakpoints.unwrap_or_default();
    let transition = config.transition.unwrap_or_default();

    ResolvedConfig {
        restore_scroll: config.restore_scroll.unwrap_or(defaults.restore_scroll),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        compact_max: breakpoints.compact_max.unwrap_or(defaults.compact_max),
        full_min: breakpoints.full_min.unwrap_or(defaults.full_min),
        duration_ms: transition.duration_ms.unwrap_or(defaults.duration_ms),
        settle_delay_ms: transition
            .settle_delay_ms
            .unwrap_or(defaults.settle_delay_ms),
        offscreen_margin: transition
            .offscreen_margin
            .unwrap_or(defaults.offscreen_margin),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    compact_max_override: Option<u32>,
    full_min_override: Option<u32>,
    transition_ms_override: Option<u64>,
) -> ResolvedConfig {
    if let Some(compact_max) = compact_max_override {
        config.compact_max = compact_max;
    }

    if let Some(full_min) = full_min_override {
        config.full_min = full_min;
    }

    if let Some(duration_ms) = transition_ms_override {
        config.duration_ms = duration_ms;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

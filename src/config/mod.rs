//! Configuration module.
//!
//! TOML file plus environment and CLI overrides, resolved into the
//! [`CoreConfig`](crate::state::page::CoreConfig) the controller runs with.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, BreakpointsSection, ConfigError,
    ConfigFile, ResolvedConfig, TransitionSection,
};

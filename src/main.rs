//! panelsync - trace replayer entry point

use clap::Parser;
use panelsync::model::AppError;
use panelsync::trace::{parse_trace, Replayer};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// Replay a JSONL trace of host events through the section-synchronization core
#[derive(Parser, Debug)]
#[command(name = "panelsync")]
#[command(version)]
#[command(about = "Replay scroll, resize and navigation traces and print the resulting section state")]
pub struct Args {
    /// Path to JSONL trace file (reads from stdin if not provided)
    pub trace: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Widest viewport width still classified compact
    #[arg(long)]
    pub compact_max: Option<u32>,

    /// Narrowest viewport width classified full
    #[arg(long)]
    pub full_min: Option<u32>,

    /// Transition animation length in milliseconds
    #[arg(long)]
    pub transition_ms: Option<u64>,

    /// Path to log file (overrides config and PANELSYNC_LOG_FILE)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let mut config = {
        let config_file = panelsync::config::load_config_with_precedence(args.config.clone())?;
        let merged = panelsync::config::merge_config(config_file);
        let with_env = panelsync::config::apply_env_overrides(merged);
        panelsync::config::apply_cli_overrides(
            with_env,
            args.compact_max,
            args.full_min,
            args.transition_ms,
        )
    };
    if let Some(path) = args.log_file.clone() {
        config.log_file_path = path;
    }
    let core = config.to_core()?;

    panelsync::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let source = panelsync::source::detect_input_source(args.trace.clone())?;
    let lines = source.read_lines()?;
    let (events, errors) = parse_trace(&lines);

    for error in &errors {
        warn!(line = error.line(), error = %error, "skipping malformed trace line");
        eprintln!("{error}");
    }
    info!(events = events.len(), skipped = errors.len(), "trace parsed");

    let mut replayer = Replayer::new(core);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for event in &events {
        let line = replayer.apply(event);
        writeln!(out, "{line}").map_err(AppError::Output)?;
    }
    out.flush().map_err(AppError::Output)?;
    replayer.finish();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["panelsync", "--help"]);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::DisplayHelp
        );
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["panelsync", "--version"]);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::DisplayVersion
        );
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["panelsync"]);
        assert_eq!(args.trace, None);
        assert_eq!(args.config, None);
        assert_eq!(args.compact_max, None);
        assert_eq!(args.full_min, None);
        assert_eq!(args.transition_ms, None);
        assert_eq!(args.log_file, None);
    }

    #[test]
    fn test_trace_path_populates_trace_field() {
        let args = Args::parse_from(["panelsync", "session.jsonl"]);
        assert_eq!(args.trace, Some(PathBuf::from("session.jsonl")));
    }

    #[test]
    fn test_breakpoint_flags() {
        let args = Args::parse_from(["panelsync", "--compact-max", "639", "--full-min", "1024"]);
        assert_eq!(args.compact_max, Some(639));
        assert_eq!(args.full_min, Some(1024));
    }

    #[test]
    fn test_transition_ms_rejects_non_numeric() {
        let result = Args::try_parse_from(["panelsync", "--transition-ms", "fast"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_cli_overrides_flow_through_precedence_chain() {
        use panelsync::config::{apply_cli_overrides, merge_config, BreakpointsSection, ConfigFile};

        let config_file = ConfigFile {
            breakpoints: Some(BreakpointsSection {
                compact_max: Some(700),
                full_min: Some(1100),
            }),
            ..ConfigFile::default()
        };
        let merged = merge_config(Some(config_file));
        assert_eq!(merged.compact_max, 700);

        let args = Args::parse_from(["panelsync", "--compact-max", "500"]);
        let resolved = apply_cli_overrides(merged, args.compact_max, args.full_min, args.transition_ms);

        assert_eq!(resolved.compact_max, 500, "CLI should override config file");
        assert_eq!(resolved.full_min, 1100, "unset flags keep file values");
        assert!(resolved.to_core().is_ok());
    }
}

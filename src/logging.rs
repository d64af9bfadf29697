// src/logging.rs

//! `tracing` subscriber for the `nicescad` binary.
//!
//! The level comes from `--log-level`, else `NICESCAD_LOG`, else `info`.
//! Everything is written to stderr: stdout is reserved for output paths and
//! tree JSON, and the tool's own stderr is echoed next to it.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given.
pub const LOG_ENV: &str = "NICESCAD_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = effective_level(cli_level, std::env::var(LOG_ENV).ok().as_deref());

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))?;

    Ok(())
}

/// Pick the level from the flag, then the env value. Unknown env values are
/// ignored.
fn effective_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Level {
    cli_level
        .map(Level::from)
        .or_else(|| env_value.and_then(level_named))
        .unwrap_or(Level::INFO)
}

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

fn level_named(name: &str) -> Option<Level> {
    match name.trim().to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_names_are_forgiving() {
        assert_eq!(level_named(" Warning "), Some(Level::WARN));
        assert_eq!(level_named("TRACE"), Some(Level::TRACE));
        assert_eq!(level_named("loud"), None);
    }

    #[test]
    fn flag_beats_env_and_garbage_falls_back_to_info() {
        assert_eq!(effective_level(Some(LogLevel::Debug), Some("error")), Level::DEBUG);
        assert_eq!(effective_level(None, Some("error")), Level::ERROR);
        assert_eq!(effective_level(None, Some("loud")), Level::INFO);
        assert_eq!(effective_level(None, None), Level::INFO);
    }
}

//! Logger setup for executables
//!
//! Records are written twice: to stdout with coloured level tags and to the session's log file as
//! plain text. The default level can be overridden per target, so that a noisy module (for
//! instance the generator's per-step trace) can be opened up or silenced without touching the
//! rest of the output.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{self, info};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, str::FromStr};
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Logging configuration, usually read from the `[logging]` table of an executable's parameters.
///
/// Levels are the names accepted by [`LevelFilter`]'s `FromStr` (`off`, `error`, `warn`, `info`,
/// `debug`, `trace`), in any case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level for every target without an override. Must not hide `info`.
    pub level: String,

    /// Per-target overrides, keyed by module path (e.g. `traj_lib::coupled`).
    pub targets: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level less than `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Unknown log level `{level}` for target `{target}`")]
    UnknownLevel { target: String, level: String },

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "debug".into(),
            targets: BTreeMap::new(),
        }
    }
}

impl LogConfig {
    /// Config with only a default level.
    pub fn with_level(level: LevelFilter) -> Self {
        Self {
            level: level.to_string(),
            ..Default::default()
        }
    }

    /// Add or replace the override for `target`.
    pub fn target(mut self, target: &str, level: LevelFilter) -> Self {
        self.targets.insert(target.into(), level.to_string());
        self
    }

    /// The default level, which must let `info` through.
    pub fn min_level(&self) -> Result<LevelFilter, LoggerInitError> {
        let level = parse_level("*", &self.level)?;

        if level < log::Level::Info {
            return Err(LoggerInitError::InvalidMinLogLevel(level));
        }

        Ok(level)
    }

    /// The overrides, parsed, in target order.
    pub fn target_levels(&self) -> Result<Vec<(String, LevelFilter)>, LoggerInitError> {
        self.targets
            .iter()
            .map(|(target, level)| Ok((target.clone(), parse_level(target, level)?)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// Messages go to stdout and to the session's log file, prefixed with the
/// number of seconds since the session epoch. Debug and trace records also
/// carry their target.
///
/// # Safety
///
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(config: &LogConfig, session: &session::Session) -> Result<(), LoggerInitError> {
    let min_level = config.min_level()?;
    let target_levels = config.target_levels()?;

    let log_file =
        fern::log_file(session.log_file_path.clone()).map_err(LoggerInitError::LogFileInitError)?;

    let stdout = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}{}",
                record_prefix(
                    session::get_elapsed_seconds(),
                    record.level(),
                    record.target(),
                    true
                ),
                message
            ))
        })
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}{}",
                record_prefix(
                    session::get_elapsed_seconds(),
                    record.level(),
                    record.target(),
                    false
                ),
                message
            ))
        })
        .chain(log_file);

    let mut dispatch = fern::Dispatch::new().level(min_level);
    for (target, level) in &target_levels {
        dispatch = dispatch.level_for(target.clone(), *level);
    }

    dispatch
        .chain(stdout)
        .chain(file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Log level: {:?}", min_level);
    for (target, level) in &target_levels {
        info!("    Log level for {}: {:?}", target, level);
    }
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn parse_level(target: &str, level: &str) -> Result<LevelFilter, LoggerInitError> {
    LevelFilter::from_str(level.trim()).map_err(|_| LoggerInitError::UnknownLevel {
        target: target.into(),
        level: level.into(),
    })
}

/// Everything written before the message itself.
fn record_prefix(elapsed: f64, level: log::Level, target: &str, coloured: bool) -> String {
    let tag = if coloured {
        level_to_str(level).to_string()
    } else {
        level_to_plain(level).to_string()
    };

    if level > log::Level::Info {
        format!("[{:10.6} {}] {}: ", elapsed, tag, target)
    } else {
        format!("[{:10.6} {}] ", elapsed, tag)
    }
}

fn level_to_plain(level: log::Level) -> &'static str {
    match level {
        log::Level::Trace => "TRC",
        log::Level::Debug => "DBG",
        log::Level::Info => "INF",
        log::Level::Warn => "WRN",
        log::Level::Error => "ERR",
    }
}

/// Get the coloured string representation of a log level
fn level_to_str(level: log::Level) -> ColoredString {
    let tag = level_to_plain(level);

    match level {
        log::Level::Trace => tag.dimmed().italic(),
        log::Level::Debug => tag.dimmed(),
        log::Level::Info => tag.normal(),
        log::Level::Warn => tag.yellow(),
        log::Level::Error => tag.red().bold(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();

        assert_eq!(config.min_level().unwrap(), LevelFilter::Debug);
        assert!(config.target_levels().unwrap().is_empty());
    }

    #[test]
    fn test_target_overrides() {
        let config = LogConfig::with_level(LevelFilter::Info)
            .target("traj_lib::coupled::causal_traj_gen", LevelFilter::Trace)
            .target("traj_lib::path", LevelFilter::Off);

        assert_eq!(config.min_level().unwrap(), LevelFilter::Info);
        assert_eq!(
            config.target_levels().unwrap(),
            vec![
                ("traj_lib::coupled::causal_traj_gen".to_string(), LevelFilter::Trace),
                ("traj_lib::path".to_string(), LevelFilter::Off),
            ]
        );
    }

    #[test]
    fn test_parse_from_toml() {
        let config: LogConfig = toml::from_str(
            r#"
            level = "INFO"

            [targets]
            "traj_lib::coupled" = "warn"
            "#,
        )
        .unwrap();

        assert_eq!(config.min_level().unwrap(), LevelFilter::Info);
        assert_eq!(
            config.target_levels().unwrap(),
            vec![("traj_lib::coupled".to_string(), LevelFilter::Warn)]
        );

        // Missing fields take the defaults
        let config: LogConfig = toml::from_str("").unwrap();
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn test_invalid_levels() {
        assert!(matches!(
            LogConfig::with_level(LevelFilter::Warn).min_level(),
            Err(LoggerInitError::InvalidMinLogLevel(LevelFilter::Warn))
        ));

        let mut config = LogConfig::default();
        config.targets.insert("traj_lib".into(), "loud".into());
        match config.target_levels() {
            Err(LoggerInitError::UnknownLevel { target, level }) => {
                assert_eq!(target, "traj_lib");
                assert_eq!(level, "loud");
            }
            other => panic!("expected an unknown level error, got {:?}", other),
        }
    }

    #[test]
    fn test_record_prefix() {
        assert_eq!(
            record_prefix(1.5, log::Level::Info, "traj_exec", false),
            "[  1.500000 INF] "
        );
        assert_eq!(
            record_prefix(0.25, log::Level::Trace, "traj_lib::coupled", false),
            "[  0.250000 TRC] traj_lib::coupled: "
        );

        // The coloured prefix carries the same tag and target
        let coloured = record_prefix(2.0, log::Level::Warn, "traj_lib", true);
        assert!(coloured.contains("WRN"));
        assert!(!coloured.contains("traj_lib"));
        let coloured = record_prefix(2.0, log::Level::Debug, "traj_lib", true);
        assert!(coloured.contains("DBG"));
        assert!(coloured.ends_with("traj_lib: "));
    }
}

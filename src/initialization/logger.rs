//! Logger initialization.
//!
//! Logs go to stderr; stdout is reserved for result lines.

use std::io::{IsTerminal, Write};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::{Level, LevelFilter};

/// Dependency modules that are clamped regardless of the requested level.
const QUIET_MODULES: &[(&str, LevelFilter)] = &[
    ("html5ever", LevelFilter::Error),
    ("selectors", LevelFilter::Warn),
    ("reqwest", LevelFilter::Info),
    ("hyper", LevelFilter::Info),
    // Truncated UDP answers make hickory_proto warn on every retry
    ("hickory_proto", LevelFilter::Error),
];

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first; `level` then overrides the global level and the
/// level of this crate. Colors are only emitted when stderr is a terminal.
///
/// ```bash
/// RUST_LOG=edge_status=debug edge_status --urls targets.txt --passive true
/// edge_status --urls targets.txt --log-format json 2> scan.log
/// ```
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(std::io::stderr().is_terminal());

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for (module, clamp) in QUIET_MODULES {
        builder.filter_module(module, *clamp);
    }
    builder.filter_module("edge_status", level);
    builder.target(env_logger::Target::Stderr);

    match format {
        LogFormat::Json => builder.format(|buf, record| {
            let line = json_line(
                chrono::Utc::now().timestamp_millis(),
                record.level(),
                record.target(),
                &record.args().to_string(),
            );
            writeln!(buf, "{line}")
        }),
        LogFormat::Plain => builder.format(|buf, record| {
            let line = plain_line(
                &chrono::Local::now().format("%H:%M:%S").to_string(),
                record.level(),
                record.target(),
                &record.args().to_string(),
            );
            writeln!(buf, "{line}")
        }),
    };

    builder.try_init().map_err(InitializationError::from)
}

fn json_line(ts: i64, level: Level, target: &str, msg: &str) -> String {
    serde_json::json!({
        "ts": ts,
        "level": level.as_str(),
        "target": target,
        "msg": msg,
    })
    .to_string()
}

fn plain_line(time: &str, level: Level, target: &str, msg: &str) -> String {
    let level = match level {
        Level::Error => level.as_str().red().bold(),
        Level::Warn => level.as_str().yellow(),
        Level::Info => level.as_str().green(),
        Level::Debug => level.as_str().blue(),
        Level::Trace => level.as_str().purple(),
    };
    format!("{} {} {} {}", time.dimmed(), level, target.cyan(), msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_line_escapes_message() {
        let line = json_line(
            1_700_000_000_000,
            Level::Warn,
            "edge_status::run::sink",
            "Skipping https://a.example.com: \"unresolved\"\n",
        );
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["ts"], 1_700_000_000_000i64);
        assert_eq!(parsed["level"], "WARN");
        assert_eq!(parsed["target"], "edge_status::run::sink");
        assert_eq!(parsed["msg"], "Skipping https://a.example.com: \"unresolved\"\n");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_plain_line_carries_level_target_and_message() {
        let line = plain_line("12:00:01", Level::Info, "edge_status::run", "Admitted 3 targets");
        assert!(line.contains("12:00:01"));
        assert!(line.contains("INFO"));
        assert!(line.contains("edge_status::run"));
        assert!(line.ends_with("Admitted 3 targets"));
    }

    #[test]
    fn test_dependency_modules_are_clamped() {
        let hickory = QUIET_MODULES.iter().find(|(m, _)| *m == "hickory_proto");
        assert_eq!(hickory.map(|(_, l)| *l), Some(LevelFilter::Error));
        assert!(QUIET_MODULES.iter().all(|(m, _)| !m.starts_with("edge_status")));
    }

    #[test]
    fn test_init_logger_second_call_is_an_error_not_a_panic() {
        // env_logger can only be installed once per process
        let _ = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        let result = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        assert!(matches!(result, Err(InitializationError::LoggerError(_))));
    }
}

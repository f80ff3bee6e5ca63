//! Logging setup for the launcher
//!
//! Human-readable output goes through `env_logger`; `json` or `json:<level>`
//! switches to one JSON object per line. Everything is written to stderr (or
//! `SES_MAILER_LOG_PATH` in JSON mode) so stdout only carries the banner and
//! the framework's own output.

use crate::defaults::{DEFAULT_LOG_LEVEL, ENV_LOG_LEVEL, ENV_LOG_PATH};
use chrono::Utc;
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_json::json;
use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::Mutex;

/// JSON logger implementation
#[derive(Debug)]
pub struct JsonLogger {
    level: Level,
    target_file: Mutex<Option<std::fs::File>>,
}

/// Parsed form of a log level setting such as `debug` or `json:trace`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSpec {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Maximum level to record
    pub filter: LevelFilter,
}

impl LevelSpec {
    /// Parse a level setting; unknown levels fall back to the launcher default
    pub fn parse(level_str: &str) -> Self {
        let level_str = level_str.trim().to_lowercase();
        let (json, actual_level) = if let Some(stripped) = level_str.strip_prefix("json:") {
            (true, stripped.to_string())
        } else if level_str == "json" {
            (true, "info".to_string())
        } else {
            (false, level_str)
        };

        let filter = match actual_level.as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" | "warning" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => default_filter(),
        };

        LevelSpec { json, filter }
    }
}

/// UTC timestamp for human-readable log lines
fn human_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn default_filter() -> LevelFilter {
    match DEFAULT_LOG_LEVEL {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Warn,
    }
}

impl JsonLogger {
    /// Create a new JSON logger
    pub fn new(level: Level, log_path: Option<String>) -> Self {
        let target_file = if let Some(path) = log_path {
            OpenOptions::new().create(true).append(true).open(path).ok()
        } else {
            None
        };

        JsonLogger {
            level,
            target_file: Mutex::new(target_file),
        }
    }

    /// Initialize the logger from a level setting; returns the parsed spec
    pub fn init_with_level(level_str: &str) -> LevelSpec {
        let spec = LevelSpec::parse(level_str);

        if !spec.json {
            let result = env_logger::Builder::new()
                .filter_level(spec.filter)
                .target(env_logger::Target::Stderr)
                .format(|buf, record| {
                    write!(buf, "🦀 ")?;
                    write!(
                        buf,
                        "[{} {} {}] ",
                        human_timestamp(),
                        record.level(),
                        record.target()
                    )?;
                    writeln!(buf, "{}", record.args())
                })
                .try_init();
            if let Err(e) = result {
                eprintln!("Failed to initialize logger: {e}");
            }
            return spec;
        }

        // Off still needs a Level for the JSON logger; the max level gates it
        let level = spec.filter.to_level().unwrap_or(Level::Error);
        let log_path = env::var(ENV_LOG_PATH).ok();
        let logger = Box::new(JsonLogger::new(level, log_path));

        if let Err(e) = log::set_boxed_logger(logger) {
            eprintln!("Failed to initialize JSON logger: {e}");
            return spec;
        }

        log::set_max_level(spec.filter);
        spec
    }

    /// Initialize from `SES_MAILER_LOG_LEVEL`, defaulting to warnings only
    pub fn init() -> LevelSpec {
        let log_level = env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
        Self::init_with_level(&log_level)
    }
}

impl Log for JsonLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let log_entry = json!({
            "@timestamp": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
            "@level": record.level().to_string().to_lowercase(),
            "@message": record.args().to_string(),
            "@module": record.target(),
            "@pid": std::process::id(),
            "@file": record.file().unwrap_or("unknown"),
            "@line": record.line().unwrap_or(0),
        });

        let json_string = format!(
            "{}\n",
            serde_json::to_string(&log_entry).unwrap_or_default()
        );

        if let Ok(mut file_guard) = self.target_file.lock() {
            if let Some(ref mut file) = *file_guard {
                let _ = file.write_all(json_string.as_bytes());
                let _ = file.flush();
                return;
            }
        }

        let _ = io::stderr().write_all(json_string.as_bytes());
        let _ = io::stderr().flush();
    }

    fn flush(&self) {
        if let Ok(mut file_guard) = self.target_file.lock() {
            if let Some(ref mut file) = *file_guard {
                let _ = file.flush();
            }
        }
        let _ = io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_timestamp_is_utc() {
        let stamp = human_timestamp();
        let parsed = chrono::NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%dT%H:%M:%SZ").unwrap();
        let drift = Utc::now().naive_utc() - parsed;
        assert!(drift.num_seconds().abs() < 5, "{stamp} is not UTC");
    }

    #[test]
    fn test_parse_plain_levels() {
        assert_eq!(
            LevelSpec::parse("debug"),
            LevelSpec {
                json: false,
                filter: LevelFilter::Debug
            }
        );
        assert_eq!(LevelSpec::parse("ERROR").filter, LevelFilter::Error);
        assert_eq!(LevelSpec::parse("off").filter, LevelFilter::Off);
    }

    #[test]
    fn test_parse_json_levels() {
        let spec = LevelSpec::parse("json:trace");
        assert!(spec.json);
        assert_eq!(spec.filter, LevelFilter::Trace);

        let spec = LevelSpec::parse("json");
        assert!(spec.json);
        assert_eq!(spec.filter, LevelFilter::Info);
    }

    #[test]
    fn test_unknown_level_falls_back_to_default() {
        assert_eq!(LevelSpec::parse("chatty").filter, LevelFilter::Warn);
        assert!(!LevelSpec::parse("chatty").json);
    }

    #[test]
    fn test_json_logger_writes_to_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("launcher.log");
        let logger = JsonLogger::new(Level::Info, Some(path.to_string_lossy().to_string()));

        logger.log(
            &Record::builder()
                .args(format_args!("environment activated"))
                .level(Level::Info)
                .target("ses_mailer_launcher::venv")
                .build(),
        );
        logger.log(
            &Record::builder()
                .args(format_args!("dropped"))
                .level(Level::Debug)
                .target("ses_mailer_launcher::venv")
                .build(),
        );

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        let entry: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(entry["@level"], "info");
        assert_eq!(entry["@message"], "environment activated");
        assert_eq!(entry["@module"], "ses_mailer_launcher::venv");
    }
}

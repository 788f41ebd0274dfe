//! Logging backend setup
//!
//! All modules log through the `log` facade; this module installs
//! `flexi_logger` once at startup with one of three line formats:
//!
//! - `text`: `2025-01-31 12:00:00.123 INF message`
//! - `ext`:  `2025-01-31 12:00:00.123 INF message (worker/producer.rs:42)`
//! - `json`: `{"timestamp":..,"level":"INF","message":..,"target":..}`

use flexi_logger::{DeferredNow, FileSpec, Logger, LoggerHandle};
use std::sync::{Mutex, OnceLock};

// Keeps the logger alive for the lifetime of the process
static LOGGER_HANDLE: OnceLock<Mutex<LoggerHandle>> = OnceLock::new();

/// Log formats accepted by `--log-format`
pub const LOG_FORMATS: [&str; 3] = ["text", "ext", "json"];

/// Log levels accepted by `--log-level`
pub const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

pub fn init_logging(
    log_level: Option<&str>,
    log_format: Option<&str>,
    log_file: Option<&str>,
    color_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let level_str = log_level.unwrap_or("info");
    let format_type = log_format.unwrap_or("text");

    let mut logger = Logger::try_with_str(level_str)?;

    logger = match (format_type, color_enabled) {
        ("json", _) => logger.format(json_format),
        ("ext", true) => logger.format(extended_color_format),
        ("ext", false) => logger.format(extended_format),
        (_, true) => logger.format(simple_color_format),
        (_, false) => logger.format(simple_format),
    };

    if let Some(file_path) = log_file {
        let file_spec = FileSpec::try_from(std::path::Path::new(file_path))?;
        logger = logger.log_to_file(file_spec);
    }

    let handle = logger.start()?;
    let _ = LOGGER_HANDLE.set(Mutex::new(handle));

    Ok(())
}

fn level_abbr(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERR",
        log::Level::Warn => "WRN",
        log::Level::Info => "INF",
        log::Level::Debug => "DBG",
        log::Level::Trace => "TRC",
    }
}

fn level_colored(level: log::Level) -> colored::ColoredString {
    use colored::Colorize;

    match level {
        log::Level::Error => "ERR".red().bold(),
        log::Level::Warn => "WRN".yellow(),
        log::Level::Info => "INF".green(),
        log::Level::Debug => "DBG".blue(),
        log::Level::Trace => "TRC".magenta(),
    }
}

// Text format without target info
fn simple_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbr(record.level()),
        record.args()
    )
}

fn simple_color_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::Colorize;

    write!(
        w,
        "{} {} {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        level_colored(record.level()),
        record.args()
    )
}

// Extended format with target info, no colors
fn extended_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    let target_formatted = format_target_as_path(record.target(), record.line());

    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbr(record.level()),
        record.args(),
        target_formatted
    )
}

fn extended_color_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::Colorize;

    let target_formatted = format_target_as_path(record.target(), record.line());

    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        level_colored(record.level()),
        record.args(),
        target_formatted.dimmed()
    )
}

// One compact JSON object per line: timestamp, level, message, target
fn json_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use serde_json::json;

    let json_obj = json!({
        "timestamp": now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        "level": level_abbr(record.level()),
        "message": record.args().to_string(),
        "target": format_target_as_path(record.target(), record.line())
    });

    match serde_json::to_string(&json_obj) {
        Ok(json_string) => w.write_all(json_string.as_bytes()),
        Err(_) => w.write_all(b"{\"error\":\"Failed to serialize log message\"}"),
    }
}

// prioqueue::worker::producer -> worker/producer.rs:42
fn format_target_as_path(target: &str, line: Option<u32>) -> String {
    let path_like = if let Some(without_prefix) = target.strip_prefix("prioqueue::") {
        without_prefix.replace("::", "/") + ".rs"
    } else {
        target.replace("::", "/")
    };

    if let Some(line_num) = line {
        format!("{}:{}", path_like, line_num)
    } else {
        path_like
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn render(
        formatter: fn(
            &mut dyn std::io::Write,
            &mut DeferredNow,
            &log::Record,
        ) -> Result<(), std::io::Error>,
        level: log::Level,
    ) -> String {
        let mut buffer = Vec::new();
        let mut now = DeferredNow::new();
        let record = log::Record::builder()
            .level(level)
            .target("prioqueue::worker::producer")
            .line(Some(42))
            .args(format_args!("[P1] WRITE -> seq=1"))
            .build();

        formatter(&mut buffer, &mut now, &record).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_simple_format_has_no_target() {
        let output = render(simple_format, log::Level::Info);

        assert!(output.contains("INF [P1] WRITE -> seq=1"), "got: {}", output);
        assert!(!output.contains("producer.rs"));
    }

    #[test]
    fn test_extended_format_appends_source_path() {
        let output = render(extended_format, log::Level::Warn);

        assert!(output.contains("WRN [P1] WRITE -> seq=1"));
        assert!(output.ends_with("(worker/producer.rs:42)"), "got: {}", output);
    }

    #[test]
    fn test_json_format_fields() {
        let output = render(json_format, log::Level::Error);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["level"], "ERR");
        assert_eq!(value["message"], "[P1] WRITE -> seq=1");
        assert_eq!(value["target"], "worker/producer.rs:42");
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_format_target_as_path() {
        assert_eq!(
            format_target_as_path("prioqueue::app::startup", Some(7)),
            "app/startup.rs:7"
        );
        assert_eq!(format_target_as_path("tokio::runtime", None), "tokio/runtime");
    }

    #[test]
    #[serial]
    fn test_init_logging_once() {
        // Another test binary may already own the global logger
        match init_logging(Some("debug"), Some("ext"), None, false) {
            Ok(()) => log::debug!("logger installed"),
            Err(e) => assert!(
                e.to_string().to_lowercase().contains("logger"),
                "got: {}",
                e
            ),
        }
    }
}

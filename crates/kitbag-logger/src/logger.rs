//! The structured logger

use crate::context::GlobalContext;
use crate::event::{ErrorInfo, LogEvent};
use crate::level::Level;
use chrono::{SecondsFormat, Utc};
use colored::Colorize;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use std::sync::Arc;

/// Output encoding of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One compact JSON object per line
    #[default]
    Json,
    /// Indented, timestamped and colourised JSON for local development
    Pretty,
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Least severe level that is still written
    pub level: Level,
    pub format: LogFormat,
    pub context: GlobalContext,
}

impl LoggerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = if lookup("STAGE").as_deref() == Some("dev") {
            Level::Debug
        } else {
            Level::Info
        };

        let format = if lookup("IS_LOCAL").as_deref() == Some("true") {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        };

        Self {
            level,
            format,
            context: GlobalContext::from_lookup(&lookup),
        }
    }
}

/// Line as it is written out. Field order follows the documented log schema.
#[derive(Serialize)]
struct Record<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    level: Level,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a ErrorInfo>,
    #[serde(flatten)]
    context: &'a GlobalContext,
}

/// Syslog-levelled JSON logger.
///
/// Writing never fails from the caller's point of view: serialization and
/// I/O errors are dropped.
pub struct Logger {
    config: LoggerConfig,
    writer: Mutex<Box<dyn Write + Send>>,
}

macro_rules! level_methods {
    ($($name:ident, $with_data:ident => $level:ident),* $(,)?) => {
        $(
            pub fn $name(&self, message: impl Into<String>) {
                self.log(LogEvent::new(Level::$level, message));
            }

            pub fn $with_data(&self, message: impl Into<String>, data: Value) {
                self.log(LogEvent::new(Level::$level, message).data(data));
            }
        )*
    };
}

impl Logger {
    pub fn new(config: LoggerConfig, writer: impl Write + Send + 'static) -> Self {
        Self {
            config,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn stdout(config: LoggerConfig) -> Self {
        Self::new(config, io::stdout())
    }

    pub fn from_env() -> Self {
        Self::stdout(LoggerConfig::from_env())
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn level(&self) -> Level {
        self.config.level
    }

    pub fn levels(&self) -> &'static [Level; 8] {
        &Level::ALL
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.config.level
    }

    pub fn log(&self, event: LogEvent) {
        if !self.enabled(event.level) {
            return;
        }

        let line = match self.render(&event) {
            Some(line) => line,
            None => return,
        };

        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "{}", line);
        let _ = writer.flush();
    }

    level_methods! {
        emerg, emerg_with => Emerg,
        alert, alert_with => Alert,
        crit, crit_with => Crit,
        error, error_with => Error,
        warning, warning_with => Warning,
        notice, notice_with => Notice,
        info, info_with => Info,
        debug, debug_with => Debug,
    }

    fn render(&self, event: &LogEvent) -> Option<String> {
        let pretty = self.config.format == LogFormat::Pretty;
        let record = Record {
            timestamp: pretty.then(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            level: event.level,
            message: &event.message,
            source: event.source.as_deref(),
            data: event.data.as_ref(),
            error: event.error.as_ref(),
            context: &self.config.context,
        };

        if !pretty {
            return serde_json::to_string(&record)
                .ok()
                .or_else(|| fallback_line(event));
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        let line = match record.serialize(&mut ser) {
            Ok(()) => String::from_utf8(buf).ok(),
            Err(_) => fallback_line(event),
        }?;

        Some(colorize(event.level, line))
    }
}

// Only reached when an event payload cannot be serialized.
fn fallback_line(event: &LogEvent) -> Option<String> {
    serde_json::to_string(&serde_json::json!({
        "level": event.level,
        "message": event.message,
        "source": event.source,
    }))
    .ok()
}

fn colorize(level: Level, line: String) -> String {
    match level {
        Level::Emerg | Level::Alert | Level::Crit | Level::Error => line.red().to_string(),
        Level::Warning => line.yellow().to_string(),
        Level::Notice => line.cyan().to_string(),
        Level::Info => line.green().to_string(),
        Level::Debug => line.blue().to_string(),
    }
}

/// In-memory sink for log output, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Parse every line as a JSON record. Only meaningful for `LogFormat::Json`.
    pub fn records(&self) -> Vec<Value> {
        self.lines()
            .iter()
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect()
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> LoggerConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LoggerConfig::from_lookup(|name| map.get(name).cloned())
    }

    fn capture(config: LoggerConfig) -> (Logger, MemoryWriter) {
        let writer = MemoryWriter::new();
        (Logger::new(config, writer.clone()), writer)
    }

    #[test]
    fn test_global_context_in_events() {
        let (logger, out) = capture(config(&[
            ("K_REVISION", "test-revision"),
            ("SERVICE_NAME", "test-service"),
            ("STAGE", "test"),
            ("SERVICE_VERSION", "1.0.0"),
        ]));

        logger.log(
            LogEvent::new(Level::Info, "test message")
                .source("test-source")
                .data(json!({ "test": "data" })),
        );

        let records = out.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["level"], "info");
        assert_eq!(record["message"], "test message");
        assert_eq!(record["source"], "test-source");
        assert_eq!(record["data"]["test"], "data");
        assert_eq!(record["host"], "test-revision");
        assert_eq!(record["serviceName"], "test-service");
        assert_eq!(record["stage"], "test");
        assert_eq!(record["version"], "1.0.0");
        assert!(record["region"].is_null());
        assert!(record["runtime"].as_str().is_some());
        assert!(record.get("timestamp").is_none());
    }

    #[test]
    fn test_formats_errors() {
        let (logger, out) = capture(config(&[]));
        let err = io::Error::new(io::ErrorKind::Other, "test error");

        logger.log(
            LogEvent::new(Level::Error, "error occurred")
                .source("test-source")
                .error(&err),
        );

        let record = &out.records()[0];
        assert_eq!(record["error"]["message"], "test error");
        assert!(record["error"]["stack"].as_str().is_some());
        assert!(record["runtime"].as_str().is_some());
    }

    #[test]
    fn test_default_level() {
        assert_eq!(config(&[("STAGE", "dev")]).level, Level::Debug);
        assert_eq!(config(&[("STAGE", "prod")]).level, Level::Info);
        assert_eq!(config(&[]).level, Level::Info);
    }

    #[test]
    fn test_level_filtering() {
        let (logger, out) = capture(config(&[]));

        logger.debug("hidden");
        logger.info("shown");
        logger.alert("also shown");

        let levels: Vec<String> = out
            .records()
            .iter()
            .map(|r| r["level"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(levels, vec!["info", "alert"]);
    }

    #[test]
    fn test_level_helpers_with_data() {
        let (logger, out) = capture(config(&[]));

        logger.warning_with("disk almost full", json!({ "free": 12 }));
        logger.debug_with("dropped", json!({ "ignored": true }));
        logger.info("no data");

        let records = out.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["level"], "warning");
        assert_eq!(records[0]["message"], "disk almost full");
        assert_eq!(records[0]["data"]["free"], 12);
        assert!(records[1].get("data").is_none());
    }

    #[test]
    fn test_levels_table() {
        let (logger, _) = capture(config(&[]));
        assert_eq!(logger.levels()[0], Level::Emerg);
        assert_eq!(logger.levels()[7], Level::Debug);
    }

    #[test]
    fn test_pretty_format() {
        let (logger, out) = capture(config(&[("IS_LOCAL", "true"), ("STAGE", "dev")]));
        assert_eq!(logger.config().format, LogFormat::Pretty);

        logger.debug("local message");

        let contents = out.contents();
        assert!(contents.contains("\"timestamp\""));
        assert!(contents.contains("\n    \"message\": \"local message\""));
    }

    #[test]
    fn test_failing_writer_is_ignored() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
        }

        let logger = Logger::new(config(&[]), Broken);
        logger.emerg("nobody listens");
    }
}

//! Log events and error serialization

use crate::level::Level;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A single log record before enrichment.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: Level,
    pub message: String,
    pub source: Option<String>,
    pub data: Option<Value>,
    pub error: Option<ErrorInfo>,
}

impl LogEvent {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            source: None,
            data: None,
            error: None,
        }
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn error(mut self, error: &(dyn std::error::Error + 'static)) -> Self {
        self.error = Some(ErrorInfo::from_error(error));
        self
    }

    pub fn error_info(mut self, error: ErrorInfo) -> Self {
        self.error = Some(error);
        self
    }
}

/// Serializable view of an error value.
///
/// `stack` holds the rendered `source()` chain, outermost first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    pub message: String,
    pub stack: String,
    #[serde(flatten)]
    pub properties: BTreeMap<String, Value>,
}

impl ErrorInfo {
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let message = error.to_string();
        let mut stack = format!("Error: {}", message);

        let mut source = error.source();
        while let Some(cause) = source {
            stack.push_str("\n    caused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }

        Self {
            message,
            stack,
            properties: BTreeMap::new(),
        }
    }

    /// Attach an additional field, serialized next to `message` and `stack`.
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key != "message" && key != "stack" {
            self.properties.insert(key, value);
        }
        self
    }
}

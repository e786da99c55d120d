//! Structured logging for Kitbag
//!
//! A syslog-levelled JSON logger that enriches every event with deployment
//! metadata, plus the `tracing` subscriber setup used by the binaries.

pub mod context;
pub mod event;
pub mod level;
pub mod logger;
pub mod subscriber;

pub use context::{detect_runtime, GlobalContext};
pub use event::{ErrorInfo, LogEvent};
pub use level::{Level, ParseLevelError};
pub use logger::{LogFormat, Logger, LoggerConfig, MemoryWriter};
pub use subscriber::{filter_directive, init_tracing};

//! The environment guard

use crate::source::{EnvSource, ProcessEnv, ProcessExit, Terminator};
use crate::{EnvError, Result, EXIT_FAILURE};
use kitbag_logger::{Level, LogEvent, Logger};
use serde_json::{json, Value};
use std::sync::Arc;

/// What `get_required_env` does when the variable is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Return [`EnvError::Missing`] to the caller
    #[default]
    Error,
    /// Terminate the process with [`EXIT_FAILURE`]
    Exit,
}

pub struct EnvGuard<S = ProcessEnv, T = ProcessExit> {
    logger: Arc<Logger>,
    source: S,
    terminator: T,
}

impl EnvGuard {
    /// Guard over the process environment that exits on fatal errors.
    pub fn new(logger: Arc<Logger>) -> Self {
        Self::with_parts(logger, ProcessEnv, ProcessExit)
    }
}

impl<S: EnvSource, T: Terminator> EnvGuard<S, T> {
    pub fn with_parts(logger: Arc<Logger>, source: S, terminator: T) -> Self {
        Self {
            logger,
            source,
            terminator,
        }
    }

    pub fn terminator(&self) -> &T {
        &self.terminator
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// Plain lookup with no logging, for optional variables.
    pub fn var(&self, name: &str) -> Option<String> {
        self.source.var(name)
    }

    /// Succeeds when `name` is set and non-empty; otherwise logs an alert
    /// and terminates.
    pub fn check_required_env(&self, name: &str) -> Result<()> {
        match self.source.var(name) {
            Some(value) if !value.is_empty() => Ok(()),
            _ => {
                self.alert_missing(name, "checkRequiredEnv");
                self.terminator.terminate(EXIT_FAILURE);
                Err(EnvError::Missing {
                    name: name.to_string(),
                })
            }
        }
    }

    /// Like [`check_required_env`](Self::check_required_env) but hands back
    /// the value.
    pub fn require_env(&self, name: &str) -> Result<String> {
        self.check_required_env(name)?;
        Ok(self.source.var(name).unwrap_or_default())
    }

    /// Treats `null` and `""` as unset; any other value, including empty
    /// arrays and objects, is set.
    pub fn exit_with_error(&self, input: &Value) -> Result<()> {
        let rendered = match input {
            Value::Null => "null".to_string(),
            Value::String(s) if s.is_empty() => String::new(),
            _ => return Ok(()),
        };

        self.logger.log(
            LogEvent::new(Level::Alert, format!("{} is required", rendered))
                .source("exitWithError")
                .data(json!({ "input": input })),
        );
        self.terminator.terminate(EXIT_FAILURE);

        Err(EnvError::Unset { input: rendered })
    }

    /// Returns the value whenever the variable is defined, even if empty.
    pub fn get_required_env(&self, name: &str, mode: FailureMode) -> Result<String> {
        if let Some(value) = self.source.var(name) {
            return Ok(value);
        }

        self.alert_missing(name, "getRequiredEnv");
        if mode == FailureMode::Exit {
            self.terminator.terminate(EXIT_FAILURE);
        }

        Err(EnvError::Missing {
            name: name.to_string(),
        })
    }

    fn alert_missing(&self, name: &str, source: &str) {
        self.logger.log(
            LogEvent::new(Level::Alert, format!("env {} is required", name))
                .source(source)
                .data(json!({ "name": name })),
        );
    }
}

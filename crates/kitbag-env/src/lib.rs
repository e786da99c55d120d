//! Required environment variable guards
//!
//! Missing configuration is reported with an `alert` log event and then
//! handed to a [`Terminator`], which exits the process with status `1` in
//! production. Tests swap in a [`RecordingTerminator`] and observe the
//! returned [`EnvError`] instead.

pub mod guard;
pub mod source;

pub use guard::{EnvGuard, FailureMode};
pub use source::{EnvSource, ProcessEnv, ProcessExit, RecordingTerminator, Terminator};

use thiserror::Error;

/// Exit status used for every guard failure
pub const EXIT_FAILURE: i32 = 1;

pub type Result<T> = std::result::Result<T, EnvError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("env {name} is required")]
    Missing { name: String },

    #[error("{input} is required")]
    Unset { input: String },
}

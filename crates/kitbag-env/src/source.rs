//! Where variables come from and how failures end the process

use parking_lot::Mutex;
use std::collections::HashMap;

/// A source of environment variables.
pub trait EnvSource: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment. Non-unicode values count as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Ends the process on fatal configuration errors.
pub trait Terminator: Send + Sync {
    fn terminate(&self, code: i32);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl Terminator for ProcessExit {
    fn terminate(&self, code: i32) {
        std::process::exit(code)
    }
}

/// Records exit codes instead of exiting.
#[derive(Debug, Default)]
pub struct RecordingTerminator {
    codes: Mutex<Vec<i32>>,
}

impl RecordingTerminator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn codes(&self) -> Vec<i32> {
        self.codes.lock().clone()
    }
}

impl Terminator for RecordingTerminator {
    fn terminate(&self, code: i32) {
        self.codes.lock().push(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_source() {
        let mut vars = HashMap::new();
        vars.insert("PRESENT".to_string(), "value".to_string());

        assert_eq!(vars.var("PRESENT").as_deref(), Some("value"));
        assert!(vars.var("ABSENT").is_none());
    }

    #[test]
    fn test_recording_terminator() {
        let terminator = RecordingTerminator::new();
        terminator.terminate(1);
        terminator.terminate(2);
        assert_eq!(terminator.codes(), vec![1, 2]);
    }
}

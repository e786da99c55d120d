//! Syslog severity levels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Syslog severity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Emerg = 0,
    Alert = 1,
    Crit = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

#[derive(Debug, Error)]
#[error("Unknown log level: {0}")]
pub struct ParseLevelError(String);

impl Level {
    /// The full syslog table in severity order.
    pub const ALL: [Level; 8] = [
        Level::Emerg,
        Level::Alert,
        Level::Crit,
        Level::Error,
        Level::Warning,
        Level::Notice,
        Level::Info,
        Level::Debug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Emerg => "emerg",
            Self::Alert => "alert",
            Self::Crit => "crit",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Notice => "notice",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    /// Numeric syslog severity
    pub fn severity(&self) -> u8 {
        *self as u8
    }

    /// Closest `tracing` filter directive for this level.
    pub fn tracing_directive(&self) -> &'static str {
        match self {
            Self::Emerg | Self::Alert | Self::Crit | Self::Error => "error",
            Self::Warning => "warn",
            Self::Notice | Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "emerg" => Ok(Self::Emerg),
            "alert" => Ok(Self::Alert),
            "crit" => Ok(Self::Crit),
            "error" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            "notice" => Ok(Self::Notice),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syslog_table() {
        let table: Vec<(&str, u8)> = Level::ALL
            .iter()
            .map(|l| (l.as_str(), l.severity()))
            .collect();

        assert_eq!(
            table,
            vec![
                ("emerg", 0),
                ("alert", 1),
                ("crit", 2),
                ("error", 3),
                ("warning", 4),
                ("notice", 5),
                ("info", 6),
                ("debug", 7),
            ]
        );
    }

    #[test]
    fn test_ordering() {
        assert!(Level::Emerg < Level::Alert);
        assert!(Level::Info < Level::Debug);
    }

    #[test]
    fn test_parse() {
        assert_eq!("ALERT".parse::<Level>().unwrap(), Level::Alert);
        assert_eq!("warn".parse::<Level>().unwrap(), Level::Warning);
        assert!("verbose".parse::<Level>().is_err());
    }
}

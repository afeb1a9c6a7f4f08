//! Logger configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.

use super::error::Result;
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_LOG_FILE: &str = "log.txt";
pub const DEFAULT_SEPARATOR: &str = "================";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Log file name inside the directory passed to `init`
    pub file_name: String,
    /// Line written once per run when the log file is opened
    pub separator: String,
    pub timestamp_format: TimestampFormat,
    /// Lowest level forwarded to the crash reporter
    pub crash_min_level: LogLevel,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_LOG_FILE.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            timestamp_format: TimestampFormat::default(),
            crash_min_level: LogLevel::Error,
        }
    }
}

impl LoggerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            crate::core::LoggerError::io_operation(
                "reading logger config",
                path.display().to_string(),
                e,
            )
        })?;
        Self::from_json_str(&raw)
    }
}

//! Log record structure

use super::call_site::CallSite;
use super::failure::Failure;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};

/// One log event, captured in full on the emitting thread.
///
/// Fields are fixed at construction: the message is already formatted and the
/// call site already resolved, so nothing is re-evaluated on the worker.
#[derive(Debug, Clone)]
pub struct LogRecord {
    level: LogLevel,
    failure: Option<Failure>,
    message: String,
    caller_type: String,
    caller_method: String,
    timestamp: DateTime<Utc>,
}

impl LogRecord {
    pub fn new(
        level: LogLevel,
        site: CallSite,
        message: impl Into<String>,
        failure: Option<Failure>,
    ) -> Self {
        Self::at(level, site, message, failure, Utc::now())
    }

    /// Construct with an explicit timestamp
    pub fn at(
        level: LogLevel,
        site: CallSite,
        message: impl Into<String>,
        failure: Option<Failure>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let (caller_type, caller_method) = site.into_parts();
        Self {
            level,
            failure,
            message: message.into(),
            caller_type,
            caller_method,
            timestamp,
        }
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    #[inline]
    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Tag under which the record is published
    #[inline]
    pub fn caller_type(&self) -> &str {
        &self.caller_type
    }

    #[inline]
    pub fn caller_method(&self) -> &str {
        &self.caller_method
    }

    #[inline]
    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    /// `"<method>(): <message>"`, followed by the failure's stack trace on a
    /// new line when one is attached. Shared by the system and file sinks.
    pub fn body(&self) -> String {
        let mut body = format!("{}(): {}", self.caller_method, self.message);
        if let Some(ref failure) = self.failure {
            body.push('\n');
            body.push_str(&failure.stack_trace());
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_fields() {
        let record = LogRecord::new(
            LogLevel::Warn,
            CallSite::new("Player", "seek"),
            "position out of range",
            None,
        );

        assert_eq!(record.level(), LogLevel::Warn);
        assert_eq!(record.caller_type(), "Player");
        assert_eq!(record.caller_method(), "seek");
        assert_eq!(record.message(), "position out of range");
        assert!(record.failure().is_none());
    }

    #[test]
    fn test_body_without_failure() {
        let record = LogRecord::new(LogLevel::Info, CallSite::new("Player", "play"), "started", None);
        assert_eq!(record.body(), "play(): started");
    }

    #[test]
    fn test_body_with_failure() {
        let record = LogRecord::new(
            LogLevel::Error,
            CallSite::new("Player", "play"),
            "decoder crashed",
            Some(Failure::msg("bad frame")),
        );
        let body = record.body();
        assert!(body.starts_with("play(): decoder crashed\nbad frame"));
    }

    #[test]
    fn test_message_kept_verbatim() {
        let record = LogRecord::new(LogLevel::Info, CallSite::new("A", "b"), "line1\nline2", None);
        assert_eq!(record.message(), "line1\nline2");
    }
}

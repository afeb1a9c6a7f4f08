//! Error types for the logger system

use super::format::FormatError;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Format string could not be resolved against its arguments
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Crash hook discovery or invocation error
    #[error("Crash hook error: {message}")]
    CrashHookError { message: String },

    /// Worker thread could not be started
    #[error("Failed to spawn log worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// Channel send error
    #[error("Failed to send log record to worker")]
    ChannelSendError,

    /// Channel receive error
    #[error("Failed to receive log record from queue")]
    ChannelReceiveError,
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a crash hook error
    pub fn crash_hook(message: impl Into<String>) -> Self {
        LoggerError::CrashHookError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crash_hook_error() {
        let err = LoggerError::crash_hook("symbol missing");
        assert!(matches!(err, LoggerError::CrashHookError { .. }));
        assert_eq!(err.to_string(), "Crash hook error: symbol missing");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("opening log file", "/data/log.txt", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("opening log file"));
        assert!(err.to_string().contains("/data/log.txt"));
    }

    #[test]
    fn test_format_error_conversion() {
        let err: LoggerError = FormatError::MissingArgument {
            specifier: "%d".to_string(),
            index: 2,
        }
        .into();
        assert!(matches!(err, LoggerError::Format(FormatError::MissingArgument { index: 2, .. })));
        assert!(err.to_string().starts_with("Format error: "));
    }
}

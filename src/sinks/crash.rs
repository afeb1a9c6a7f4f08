//! Crash-reporting sink
//!
//! The crash reporter is an optional capability. A crash-reporting integration
//! that is linked into the binary registers itself once with
//! [`register_crash_reporter`]; at `init` the logger asks its
//! [`CrashHookProvider`] for a reporter and, if one turns up, installs a
//! [`CrashSink`]. An unregistered reporter is the normal case and stays silent.

use crate::core::{Failure, LogLevel, LogRecord, LoggerError, Result, Sink};
use std::sync::{Arc, OnceLock};

/// External crash-reporting hook.
pub trait CrashReporter: Send + Sync {
    fn log_exception(&self, failure: &Failure) -> Result<()>;
}

impl<F> CrashReporter for F
where
    F: Fn(&Failure) -> Result<()> + Send + Sync,
{
    fn log_exception(&self, failure: &Failure) -> Result<()> {
        self(failure)
    }
}

/// Startup-time lookup of a crash reporter.
///
/// `Ok(None)` means "not linked" and is not worth a warning; `Err` is any other
/// discovery problem and gets reported.
pub trait CrashHookProvider: Send {
    fn discover(&self) -> Result<Option<Box<dyn CrashReporter>>>;
}

impl<F> CrashHookProvider for F
where
    F: Fn() -> Result<Option<Box<dyn CrashReporter>>> + Send,
{
    fn discover(&self) -> Result<Option<Box<dyn CrashReporter>>> {
        self()
    }
}

/// Provider that never finds a reporter
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCrashHook;

impl CrashHookProvider for NoCrashHook {
    fn discover(&self) -> Result<Option<Box<dyn CrashReporter>>> {
        Ok(None)
    }
}

static LINKED_REPORTER: OnceLock<Arc<dyn CrashReporter>> = OnceLock::new();

/// Register the process-wide crash reporter. Only the first registration wins.
pub fn register_crash_reporter(reporter: impl CrashReporter + 'static) -> Result<()> {
    LINKED_REPORTER
        .set(Arc::new(reporter))
        .map_err(|_| LoggerError::crash_hook("a crash reporter is already registered"))
}

/// Default provider: whatever was passed to [`register_crash_reporter`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkedCrashHook;

impl CrashHookProvider for LinkedCrashHook {
    fn discover(&self) -> Result<Option<Box<dyn CrashReporter>>> {
        Ok(LINKED_REPORTER
            .get()
            .map(|reporter| Box::new(SharedReporter(Arc::clone(reporter))) as Box<dyn CrashReporter>))
    }
}

struct SharedReporter(Arc<dyn CrashReporter>);

impl CrashReporter for SharedReporter {
    fn log_exception(&self, failure: &Failure) -> Result<()> {
        self.0.log_exception(failure)
    }
}

/// Forwards attached failures of severe records to the crash reporter.
pub struct CrashSink {
    reporter: Box<dyn CrashReporter>,
    min_level: LogLevel,
}

impl CrashSink {
    pub fn new(reporter: Box<dyn CrashReporter>) -> Self {
        Self {
            reporter,
            min_level: LogLevel::Error,
        }
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }
}

impl Sink for CrashSink {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        if record.level() < self.min_level {
            return Ok(());
        }
        match record.failure() {
            Some(failure) => self.reporter.log_exception(failure),
            None => Ok(()),
        }
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "crash"
    }
}

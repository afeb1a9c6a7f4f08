//! Logger context: emitter API and one-time initialization
//!
//! A [`Logger`] is the process-wide logging context. Build it once, share it
//! by reference or `Arc`, and call [`Logger::init`] once the log directory is
//! known. Records emitted before `init` wait in the queue and are written as
//! soon as the worker starts.
//!
//! There is no teardown. Dropping the logger disconnects the queue, which the
//! worker takes as its interruption signal; anything still queued when the
//! process exits is lost.

use super::{
    call_site::CallSite,
    config::LoggerConfig,
    error::Result,
    failure::Failure,
    format::{resolve_message, Arg},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    queue::HandoffQueue,
    record::LogRecord,
    timestamp::TimestampFormat,
    worker::{panic_message, Worker, WorkerState, WorkerStatus},
};
use crate::sinks::{
    CrashHookProvider, CrashSink, ConsoleFacility, FileSink, LinkedCrashHook, PlatformLog,
    SinkRegistry, SystemSink, INTERNAL_TAG,
};
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Collaborators handed to the worker at `init`.
struct PendingSetup {
    platform: Box<dyn PlatformLog>,
    crash_hook: Box<dyn CrashHookProvider>,
    config: LoggerConfig,
}

/// Settings fixed by the first `init` call.
#[derive(Debug)]
struct Runtime {
    debug: bool,
    log_file: Option<PathBuf>,
    crash_hook: bool,
    worker_started: bool,
}

pub struct Logger {
    queue: HandoffQueue,
    setup: Mutex<Option<PendingSetup>>,
    runtime: OnceLock<Runtime>,
    metrics: Arc<LoggerMetrics>,
    status: Arc<WorkerStatus>,
}

impl Logger {
    /// Logger writing to the console facility, picking up a linked crash reporter
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Wire the sinks and start the worker.
    ///
    /// Only the first call has any effect; later calls return immediately,
    /// whatever their arguments. The file sink is opened only in debug mode
    /// and only if `<dir>/<file_name>` already exists. Setup problems are
    /// reported through the platform facility and the affected sink is left out.
    pub fn init(&self, dir: impl AsRef<Path>, debug_enabled: bool) {
        self.runtime
            .get_or_init(|| self.start(dir.as_ref(), debug_enabled));
    }

    fn start(&self, dir: &Path, debug: bool) -> Runtime {
        // the setup stays in its slot until discovery is done, so a panicking
        // provider leaves it intact for the next `init`
        let mut slot = self.setup.lock();
        let mut problems = Vec::new();
        let (file, crash) = match slot.as_ref() {
            Some(setup) => resolve_sinks(setup, dir, debug, &mut problems),
            None => (None, None),
        };
        let platform = match slot.take() {
            Some(setup) => setup.platform,
            None => Box::new(ConsoleFacility::new()),
        };
        drop(slot);

        let mut system = SystemSink::new(platform);
        for (level, message) in problems {
            report_setup_problem(&mut system, level, &message);
        }

        let runtime = Runtime {
            debug,
            log_file: file.as_ref().and_then(|f| f.path().map(Path::to_path_buf)),
            crash_hook: crash.is_some(),
            worker_started: false,
        };

        let mut registry = SinkRegistry::new(system);
        registry.file = file;
        registry.crash = crash;

        let worker = Worker::new(
            self.queue.consumer(),
            registry,
            Arc::clone(&self.metrics),
            Arc::clone(&self.status),
        );

        match worker.spawn() {
            Ok(_detached) => Runtime {
                worker_started: true,
                ..runtime
            },
            Err(e) => {
                eprintln!("[LOGGER ERROR] {}", e);
                runtime
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.runtime.get().is_some()
    }

    /// Debug mode as fixed by `init`; `false` before it
    pub fn is_debug(&self) -> bool {
        self.runtime.get().is_some_and(|r| r.debug)
    }

    /// Whether a record at `level` would be built at all
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        !level.is_debug_only() || self.is_debug()
    }

    /// Path of the active log file, if file logging was set up
    pub fn log_file(&self) -> Option<&Path> {
        self.runtime.get().and_then(|r| r.log_file.as_deref())
    }

    pub fn has_crash_reporter(&self) -> bool {
        self.runtime.get().is_some_and(|r| r.crash_hook)
    }

    /// `None` until the worker thread has been started
    pub fn worker_state(&self) -> Option<WorkerState> {
        self.runtime
            .get()
            .filter(|r| r.worker_started)
            .map(|_| self.status.get())
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Records waiting in the queue
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Emit a pre-built message with an optional failure.
    ///
    /// `site` runs only if the level passes the debug gate.
    pub fn log_message(
        &self,
        level: LogLevel,
        site: impl FnOnce() -> CallSite,
        message: impl Into<String>,
        failure: Option<Failure>,
    ) {
        if !self.is_enabled(level) {
            self.metrics.record_gated();
            return;
        }

        self.enqueue(LogRecord::new(level, site(), message, failure));
    }

    /// Emit a printf-style message.
    ///
    /// A trailing [`Arg::Failure`] that the format string does not consume is
    /// attached to the record instead of being formatted. Format errors are
    /// returned and nothing is enqueued.
    pub fn log_fmt(
        &self,
        level: LogLevel,
        site: impl FnOnce() -> CallSite,
        fmt: &str,
        args: &[Arg],
    ) -> Result<()> {
        if !self.is_enabled(level) {
            self.metrics.record_gated();
            return Ok(());
        }

        let site = site();
        let (message, failure) = resolve_message(fmt, args).inspect_err(|_| {
            self.metrics.record_format_failure();
        })?;

        self.enqueue(LogRecord::new(level, site, message, failure));
        Ok(())
    }

    fn enqueue(&self, record: LogRecord) {
        // the logger owns a receiver, so the channel cannot be disconnected here
        if self.queue.push(record).is_ok() {
            self.metrics.record_enqueued();
        }
    }

    #[inline]
    pub fn verbose(&self, site: impl FnOnce() -> CallSite, fmt: &str, args: &[Arg]) -> Result<()> {
        self.log_fmt(LogLevel::Verbose, site, fmt, args)
    }

    #[inline]
    pub fn debug(&self, site: impl FnOnce() -> CallSite, fmt: &str, args: &[Arg]) -> Result<()> {
        self.log_fmt(LogLevel::Debug, site, fmt, args)
    }

    #[inline]
    pub fn info(&self, site: impl FnOnce() -> CallSite, fmt: &str, args: &[Arg]) -> Result<()> {
        self.log_fmt(LogLevel::Info, site, fmt, args)
    }

    #[inline]
    pub fn warn(&self, site: impl FnOnce() -> CallSite, fmt: &str, args: &[Arg]) -> Result<()> {
        self.log_fmt(LogLevel::Warn, site, fmt, args)
    }

    #[inline]
    pub fn error(&self, site: impl FnOnce() -> CallSite, fmt: &str, args: &[Arg]) -> Result<()> {
        self.log_fmt(LogLevel::Error, site, fmt, args)
    }

    #[inline]
    pub fn fatal(&self, site: impl FnOnce() -> CallSite, fmt: &str, args: &[Arg]) -> Result<()> {
        self.log_fmt(LogLevel::Fatal, site, fmt, args)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Open the file sink and look up the crash reporter, collecting problems to
/// report once the system sink exists.
fn resolve_sinks(
    setup: &PendingSetup,
    dir: &Path,
    debug: bool,
    problems: &mut Vec<(LogLevel, String)>,
) -> (Option<FileSink>, Option<CrashSink>) {
    let config = &setup.config;
    let mut file = None;

    if debug {
        match FileSink::open_existing(dir.join(&config.file_name), config) {
            Ok(sink) => file = sink,
            Err(e) => problems.push((LogLevel::Error, e.to_string())),
        }
    }

    let crash = match setup.crash_hook.discover() {
        Ok(reporter) => reporter.map(|r| CrashSink::new(r).with_min_level(config.crash_min_level)),
        Err(e) => {
            problems.push((LogLevel::Warn, format!("crash hook unavailable: {}", e)));
            None
        }
    };

    (file, crash)
}

/// A panicking facility must not abort `init`; the worker still starts.
fn report_setup_problem(system: &mut SystemSink, level: LogLevel, message: &str) {
    if let Err(panic_info) = catch_unwind(AssertUnwindSafe(|| system.report(level, INTERNAL_TAG, message))) {
        eprintln!(
            "[LOGGER CRITICAL] Platform log panicked during init: {}",
            panic_message(panic_info.as_ref())
        );
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_queue_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .platform(ConsoleFacility::with_colors(false))
///     .crash_hook(NoCrashHook)
///     .file_name("player.log")
///     .build();
///
/// logger.init(std::env::temp_dir(), true);
/// ```
pub struct LoggerBuilder {
    platform: Option<Box<dyn PlatformLog>>,
    crash_hook: Option<Box<dyn CrashHookProvider>>,
    config: LoggerConfig,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            platform: None,
            crash_hook: None,
            config: LoggerConfig::default(),
        }
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    /// Platform log facility behind the system sink
    #[must_use = "builder methods return a new value"]
    pub fn platform<P: PlatformLog + 'static>(mut self, platform: P) -> Self {
        self.platform = Some(Box::new(platform));
        self
    }

    /// How the crash reporter is looked up at `init`
    #[must_use = "builder methods return a new value"]
    pub fn crash_hook<H: CrashHookProvider + 'static>(mut self, provider: H) -> Self {
        self.crash_hook = Some(Box::new(provider));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.config.file_name = name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.config.timestamp_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn crash_min_level(mut self, level: LogLevel) -> Self {
        self.config.crash_min_level = level;
        self
    }

    fn into_setup(self) -> PendingSetup {
        PendingSetup {
            platform: self
                .platform
                .unwrap_or_else(|| Box::new(ConsoleFacility::new())),
            crash_hook: self.crash_hook.unwrap_or_else(|| Box::new(LinkedCrashHook)),
            config: self.config,
        }
    }

    /// Build the Logger. Nothing is started until `init`.
    pub fn build(self) -> Logger {
        Logger {
            queue: HandoffQueue::new(),
            setup: Mutex::new(Some(self.into_setup())),
            runtime: OnceLock::new(),
            metrics: Arc::new(LoggerMetrics::new()),
            status: Arc::new(WorkerStatus::default()),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggerError;
    use crate::sinks::{CrashReporter, NoCrashHook};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    type Lines = Arc<Mutex<Vec<(LogLevel, String, String)>>>;

    fn recording_logger() -> (Logger, Lines) {
        let lines: Lines = Arc::default();
        let sink_lines = Arc::clone(&lines);
        let logger = Logger::builder()
            .platform(move |level: LogLevel, tag: &str, msg: &str| {
                sink_lines.lock().push((level, tag.to_string(), msg.to_string()));
            })
            .crash_hook(NoCrashHook)
            .build();
        (logger, lines)
    }

    fn wait_dispatched(logger: &Logger, count: u64) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while logger.metrics().records_dispatched() < count && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_builder_basic() {
        let logger = Logger::builder().build();
        assert!(!logger.is_initialized());
        assert!(!logger.is_debug());
        assert_eq!(logger.worker_state(), None);
    }

    #[test]
    fn test_gate_before_init() {
        let (logger, _) = recording_logger();
        assert!(!logger.is_enabled(LogLevel::Debug));
        assert!(logger.is_enabled(LogLevel::Info));
    }

    #[test]
    fn test_records_before_init_are_delivered() {
        let (logger, lines) = recording_logger();
        logger.log_message(LogLevel::Info, || CallSite::new("Boot", "main"), "early", None);
        assert_eq!(logger.queued(), 1);

        let dir = tempfile::tempdir().unwrap();
        logger.init(dir.path(), false);
        wait_dispatched(&logger, 1);

        assert_eq!(lines.lock()[0].2, "main(): early");
    }

    #[test]
    fn test_format_error_is_returned() {
        let (logger, _) = recording_logger();
        let result = logger.info(|| CallSite::new("A", "b"), "%d", &["nope".into()]);

        assert!(result.is_err());
        assert_eq!(logger.queued(), 0);
        assert_eq!(logger.metrics().format_failures(), 1);
    }

    #[test]
    fn test_worker_state_after_init() {
        let (logger, _) = recording_logger();
        let dir = tempfile::tempdir().unwrap();
        logger.init(dir.path(), true);

        assert!(logger.is_initialized());
        assert!(logger.is_debug());
        assert!(logger.worker_state().is_some());
        assert!(logger.log_file().is_none());
        assert!(!logger.has_crash_reporter());
    }

    #[test]
    fn test_panicking_provider_keeps_setup_for_retry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider_calls = Arc::clone(&calls);
        let lines: Lines = Arc::default();
        let sink_lines = Arc::clone(&lines);

        let logger = Logger::builder()
            .platform(move |level: LogLevel, tag: &str, msg: &str| {
                sink_lines.lock().push((level, tag.to_string(), msg.to_string()));
            })
            .crash_hook(move || -> Result<Option<Box<dyn CrashReporter>>> {
                if provider_calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    panic!("crash library not ready");
                }
                Ok(None)
            })
            .build();

        let first = catch_unwind(AssertUnwindSafe(|| logger.init(std::env::temp_dir(), false)));
        assert!(first.is_err());
        assert!(!logger.is_initialized());

        logger.init(std::env::temp_dir(), false);
        logger.log_message(LogLevel::Info, || CallSite::new("Boot", "retry"), "ok", None);
        wait_dispatched(&logger, 1);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(lines.lock()[0].2, "retry(): ok");
    }

    #[test]
    fn test_panicking_report_does_not_abort_init() {
        let panicked = Arc::new(AtomicBool::new(false));
        let first_call = Arc::clone(&panicked);
        let lines: Lines = Arc::default();
        let sink_lines = Arc::clone(&lines);

        let logger = Logger::builder()
            .platform(move |level: LogLevel, tag: &str, msg: &str| {
                if !first_call.swap(true, Ordering::SeqCst) {
                    panic!("facility not attached yet");
                }
                sink_lines.lock().push((level, tag.to_string(), msg.to_string()));
            })
            .crash_hook(|| -> Result<Option<Box<dyn CrashReporter>>> {
                Err(LoggerError::crash_hook("missing symbol"))
            })
            .build();

        logger.init(std::env::temp_dir(), false);
        assert!(panicked.load(Ordering::SeqCst));
        assert!(logger.worker_state().is_some());

        logger.log_message(LogLevel::Warn, || CallSite::new("Boot", "main"), "after", None);
        wait_dispatched(&logger, 1);
        assert_eq!(lines.lock()[0].2, "main(): after");
    }
}

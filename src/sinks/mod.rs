//! Sink implementations and the registry the worker drives

pub mod crash;
pub mod file;
pub mod system;

pub use crash::{
    register_crash_reporter, CrashHookProvider, CrashReporter, CrashSink, LinkedCrashHook,
    NoCrashHook,
};
pub use file::FileSink;
pub use system::{ConsoleFacility, PlatformLog, SystemSink, INTERNAL_TAG, WORKER_TAG};

pub use crate::core::Sink;

/// The sinks resolved at `init`, in dispatch order.
///
/// The system sink is mandatory; the file and crash sinks are present only
/// when they were set up successfully. Nothing is added or removed afterwards.
pub struct SinkRegistry {
    pub(crate) system: SystemSink,
    pub(crate) file: Option<FileSink>,
    pub(crate) crash: Option<CrashSink>,
}

impl SinkRegistry {
    pub fn new(system: SystemSink) -> Self {
        Self {
            system,
            file: None,
            crash: None,
        }
    }

    #[must_use]
    pub fn with_file(mut self, file: FileSink) -> Self {
        self.file = Some(file);
        self
    }

    #[must_use]
    pub fn with_crash(mut self, crash: CrashSink) -> Self {
        self.crash = Some(crash);
        self
    }
}

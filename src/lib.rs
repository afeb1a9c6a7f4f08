//! # Rust Queue Logger
//!
//! A process-wide logging pipeline for applications that must never block on
//! log I/O. Emitting threads build a record and push it onto an unbounded
//! queue; a single background worker drains the queue in order and fans each
//! record out to its sinks.
//!
//! ## Features
//!
//! - **Non-blocking emit**: producers only format and enqueue
//! - **Call-site tagging**: records carry the calling type and method
//! - **Three sinks**: platform log, optional debug file, optional crash reporter
//! - **Debug gating**: Verbose and Debug records cost nothing in release mode
//! - **Failure attachment**: printf-style calls can attach a trailing error
//!
//! ## Example
//!
//! ```
//! use rust_queue_logger::prelude::*;
//! use rust_queue_logger::{info, warn};
//!
//! let logger = Logger::builder().crash_hook(NoCrashHook).build();
//! logger.init(std::env::temp_dir(), true);
//!
//! info!(logger, "ready");
//! warn!(logger, "retry %d of %d", 1, 3).unwrap();
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Arg, CallSite, Failure, LogLevel, LogRecord, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, LoggerMetrics, Result, Sink, TimestampFormat, WorkerState,
    };
    pub use crate::sinks::{
        register_crash_reporter, ConsoleFacility, CrashHookProvider, CrashReporter,
        LinkedCrashHook, NoCrashHook, PlatformLog,
    };
}

pub use crate::core::{
    format, resolve_message, Arg, CallSite, Failure, FormatError, LogLevel, LogRecord, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Result, Sink, TimestampFormat,
    WorkerState,
};
pub use crate::sinks::{
    register_crash_reporter, ConsoleFacility, CrashHookProvider, CrashReporter, CrashSink,
    FileSink, LinkedCrashHook, NoCrashHook, PlatformLog, SystemSink,
};

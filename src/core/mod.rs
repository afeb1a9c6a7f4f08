//! Core logger types and traits

pub mod call_site;
pub mod config;
pub mod error;
pub mod failure;
pub mod format;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod queue;
pub mod record;
pub mod sink;
pub mod timestamp;
pub mod worker;

pub use call_site::CallSite;
pub use config::{LoggerConfig, DEFAULT_LOG_FILE, DEFAULT_SEPARATOR};
pub use error::{LoggerError, Result};
pub use failure::Failure;
pub use format::{format, resolve_message, Arg, FormatError};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use queue::{HandoffQueue, QueueConsumer};
pub use record::LogRecord;
pub use sink::Sink;
pub use timestamp::TimestampFormat;
pub use worker::{Worker, WorkerState, WorkerStatus, WORKER_THREAD_NAME};

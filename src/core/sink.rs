//! Sink trait for log output destinations

use super::{error::Result, record::LogRecord};

/// One form of output driven by the worker.
///
/// Sinks run on the worker thread only, so they need `Send` but not `Sync`.
pub trait Sink: Send {
    fn append(&mut self, record: &LogRecord) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

//! Logger metrics for observability
//!
//! Counters covering both ends of the pipeline: records accepted by the
//! emitter, records the worker finished dispatching, and the failures seen on
//! either side.

use std::sync::atomic::{AtomicU64, Ordering};

/// Pipeline counters
///
/// # Example
///
/// ```
/// use rust_queue_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_enqueued();
/// metrics.record_dispatched();
///
/// assert_eq!(metrics.records_enqueued(), 1);
/// assert_eq!(metrics.pending(), 0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records pushed onto the hand-off queue
    records_enqueued: AtomicU64,

    /// Records the worker has driven through every sink
    records_dispatched: AtomicU64,

    /// Emit calls discarded by the debug gate
    records_gated: AtomicU64,

    /// Sink errors or panics caught by the worker
    sink_failures: AtomicU64,

    /// Emit calls rejected because the format string could not be resolved
    format_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            records_enqueued: AtomicU64::new(0),
            records_dispatched: AtomicU64::new(0),
            records_gated: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            format_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_enqueued(&self) -> u64 {
        self.records_enqueued.load(Ordering::Acquire)
    }

    #[inline]
    pub fn records_dispatched(&self) -> u64 {
        self.records_dispatched.load(Ordering::Acquire)
    }

    #[inline]
    pub fn records_gated(&self) -> u64 {
        self.records_gated.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn format_failures(&self) -> u64 {
        self.format_failures.load(Ordering::Relaxed)
    }

    /// Records accepted but not yet dispatched
    pub fn pending(&self) -> u64 {
        self.records_enqueued()
            .saturating_sub(self.records_dispatched())
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.records_enqueued.fetch_add(1, Ordering::AcqRel)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.records_dispatched.fetch_add(1, Ordering::AcqRel)
    }

    #[inline]
    pub fn record_gated(&self) -> u64 {
        self.records_gated.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_format_failure(&self) -> u64 {
        self.format_failures.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            records_enqueued: AtomicU64::new(self.records_enqueued()),
            records_dispatched: AtomicU64::new(self.records_dispatched()),
            records_gated: AtomicU64::new(self.records_gated()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            format_failures: AtomicU64::new(self.format_failures()),
        }
    }
}

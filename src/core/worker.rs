//! Background worker draining the hand-off queue
//!
//! One worker per logger. It parks on the queue, drives each record through
//! the system, file and crash sinks in that order, and stops when the queue
//! reports that every producer is gone, flushing each sink on the way out.
//! Records still queued when the process exits are never written: there is no
//! drain-on-exit path.

use super::{
    error::{LoggerError, Result},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    queue::QueueConsumer,
    record::LogRecord,
    sink::Sink,
};
use crate::sinks::{SinkRegistry, SystemSink, INTERNAL_TAG, WORKER_TAG};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

pub const WORKER_THREAD_NAME: &str = "log-worker";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    /// Parked on the queue
    Idle = 0,
    /// Driving one record through the sinks
    Dispatching = 1,
    /// Queue disconnected; the thread has exited its loop
    Terminated = 2,
}

/// Lock-free view of the worker's state, shared with the logger.
#[derive(Debug, Default)]
pub struct WorkerStatus(AtomicU8);

impl WorkerStatus {
    pub fn get(&self) -> WorkerState {
        match self.0.load(Ordering::Acquire) {
            0 => WorkerState::Idle,
            1 => WorkerState::Dispatching,
            _ => WorkerState::Terminated,
        }
    }

    fn set(&self, state: WorkerState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

pub struct Worker {
    consumer: QueueConsumer,
    sinks: SinkRegistry,
    metrics: Arc<LoggerMetrics>,
    status: Arc<WorkerStatus>,
}

impl Worker {
    pub fn new(
        consumer: QueueConsumer,
        sinks: SinkRegistry,
        metrics: Arc<LoggerMetrics>,
        status: Arc<WorkerStatus>,
    ) -> Self {
        Self {
            consumer,
            sinks,
            metrics,
            status,
        }
    }

    /// Start the loop on a dedicated, named thread.
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || self.run())
            .map_err(LoggerError::WorkerSpawn)
    }

    /// Run until the queue disconnects, then flush every sink.
    pub fn run(mut self) {
        loop {
            self.status.set(WorkerState::Idle);

            let record = match self.consumer.pop_blocking() {
                Ok(record) => record,
                Err(_) => {
                    // the interruption notice goes to the system sink only
                    self.sinks
                        .system
                        .report(LogLevel::Debug, WORKER_TAG, "interrupted: log queue disconnected");
                    break;
                }
            };

            self.status.set(WorkerState::Dispatching);
            self.dispatch(&record);
            self.metrics.record_dispatched();
        }

        self.flush_all();
        self.status.set(WorkerState::Terminated);
    }

    /// Deliver one record to every registered sink.
    ///
    /// **Per-sink isolation**: an error or panic from the file or crash sink is
    /// reported through the system sink and never stops the remaining sinks.
    pub fn dispatch(&mut self, record: &LogRecord) {
        let SinkRegistry {
            system,
            file,
            crash,
        } = &mut self.sinks;

        if let Err(panic_info) = catch_unwind(AssertUnwindSafe(|| system.append(record))) {
            self.metrics.record_sink_failure();
            eprintln!(
                "[LOGGER CRITICAL] System sink panicked: {}",
                panic_message(panic_info.as_ref())
            );
        }

        if let Some(file) = file {
            isolate(file, |s| s.append(record), system, &self.metrics);
        }

        if let Some(crash) = crash {
            isolate(crash, |s| s.append(record), system, &self.metrics);
        }
    }

    /// Flush every sink once; failures are isolated like `dispatch`.
    fn flush_all(&mut self) {
        let SinkRegistry {
            system,
            file,
            crash,
        } = &mut self.sinks;

        if let Some(file) = file {
            isolate(file, |s| s.flush(), system, &self.metrics);
        }

        if let Some(crash) = crash {
            isolate(crash, |s| s.flush(), system, &self.metrics);
        }

        if let Err(panic_info) = catch_unwind(AssertUnwindSafe(|| system.flush())) {
            eprintln!(
                "[LOGGER CRITICAL] System sink panicked on flush: {}",
                panic_message(panic_info.as_ref())
            );
        }
    }
}

fn isolate<S, F>(sink: &mut S, op: F, system: &mut SystemSink, metrics: &LoggerMetrics)
where
    S: Sink,
    F: FnOnce(&mut S) -> Result<()>,
{
    let result = catch_unwind(AssertUnwindSafe(|| op(&mut *sink)));

    let report = match result {
        Ok(Ok(())) => return,
        Ok(Err(e)) => format!("{} sink failed: {}", sink.name(), e),
        Err(panic_info) => format!(
            "{} sink panicked: {}",
            sink.name(),
            panic_message(panic_info.as_ref())
        ),
    };

    metrics.record_sink_failure();
    system.report(LogLevel::Warn, INTERNAL_TAG, &report);
}

pub(crate) fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

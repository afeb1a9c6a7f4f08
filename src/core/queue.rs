//! Hand-off queue between emitting threads and the worker
//!
//! An unbounded crossbeam channel: `push` never waits for capacity, and the
//! channel's own parking discipline guarantees a push that races with the
//! consumer going to sleep is still delivered. The flip side of "never block
//! the producer" is that a stalled worker lets the queue grow without bound.

use super::error::{LoggerError, Result};
use super::record::LogRecord;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Producer side plus a parked receiver for the worker to take over.
pub struct HandoffQueue {
    sender: Sender<LogRecord>,
    receiver: Receiver<LogRecord>,
}

impl HandoffQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Append a record and wake the consumer.
    pub fn push(&self, record: LogRecord) -> Result<()> {
        self.sender
            .send(record)
            .map_err(|_| LoggerError::ChannelSendError)
    }

    /// Remove the oldest record, parking while the queue is empty.
    pub fn pop_blocking(&self) -> Result<LogRecord> {
        self.receiver
            .recv()
            .map_err(|_| LoggerError::ChannelReceiveError)
    }

    /// Handle for the single consumer thread.
    pub fn consumer(&self) -> QueueConsumer {
        QueueConsumer {
            receiver: self.receiver.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }
}

impl Default for HandoffQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer end owned by the worker.
///
/// `pop_blocking` fails once every `HandoffQueue` has been dropped and the
/// remaining records have been drained; the worker treats that as its
/// interruption signal.
pub struct QueueConsumer {
    receiver: Receiver<LogRecord>,
}

impl QueueConsumer {
    pub fn pop_blocking(&self) -> Result<LogRecord> {
        self.receiver
            .recv()
            .map_err(|_| LoggerError::ChannelReceiveError)
    }
}

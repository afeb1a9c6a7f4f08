//! Failure objects attached to log records
//!
//! A [`Failure`] is a shared [`anyhow::Error`]: the wrapped error, its
//! `source()` chain and the backtrace captured when it was wrapped. Sinks
//! render it through [`Failure::stack_trace`].

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Shared, cheaply cloneable error attached to a record.
///
/// `Failure` does not implement `Error` itself, which lets any error type
/// convert into it with `?` or `From`.
#[derive(Clone)]
pub struct Failure {
    error: Arc<anyhow::Error>,
}

impl Failure {
    /// Wrap an error, capturing a backtrace if `RUST_BACKTRACE` enables it
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::from_anyhow(anyhow::Error::new(error))
    }

    /// Build a failure from a plain message
    pub fn msg(message: impl Into<String>) -> Self {
        Self::from_anyhow(anyhow::Error::msg(message.into()))
    }

    /// Share an `anyhow::Error`, keeping its context chain and backtrace
    pub fn from_anyhow(error: anyhow::Error) -> Self {
        Self {
            error: Arc::new(error),
        }
    }

    pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
        &**self.error
    }

    pub fn backtrace(&self) -> &Backtrace {
        self.error.backtrace()
    }

    /// Two handles refer to the same wrapped error
    pub fn ptr_eq(&self, other: &Failure) -> bool {
        Arc::ptr_eq(&self.error, &other.error)
    }

    /// Render the error, its `source()` chain and the captured backtrace.
    pub fn stack_trace(&self) -> String {
        let mut out = self.error.to_string();

        for cause in self.error.chain().skip(1) {
            out.push_str("\nCaused by: ");
            out.push_str(&cause.to_string());
        }

        let backtrace = self.backtrace();
        if backtrace.status() == BacktraceStatus::Captured {
            out.push('\n');
            out.push_str(&backtrace.to_string());
        }

        out
    }
}

impl<E> From<E> for Failure
where
    E: Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Failure::new(error)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.error, f)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("error", &self.error.to_string())
            .field("backtrace", &self.backtrace().status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("request failed")]
    struct Outer {
        #[source]
        source: std::io::Error,
    }

    #[test]
    fn test_display_uses_inner_error() {
        let failure = Failure::msg("disk on fire");
        assert_eq!(failure.to_string(), "disk on fire");
    }

    #[test]
    fn test_stack_trace_walks_sources() {
        let failure = Failure::new(Outer {
            source: std::io::Error::new(std::io::ErrorKind::TimedOut, "socket timed out"),
        });

        let trace = failure.stack_trace();
        assert!(trace.starts_with("request failed"));
        assert!(trace.contains("\nCaused by: socket timed out"));
    }

    #[test]
    fn test_clone_shares_error() {
        let failure: Failure = std::io::Error::other("boom").into();
        let copy = failure.clone();
        assert!(failure.ptr_eq(&copy));
        assert!(!failure.ptr_eq(&Failure::msg("boom")));
    }

    #[test]
    fn test_from_anyhow_keeps_context() {
        let err = anyhow::Error::new(std::io::Error::other("eof")).context("reading manifest");
        let failure = Failure::from_anyhow(err);

        assert_eq!(failure.to_string(), "reading manifest");
        assert!(failure.stack_trace().contains("\nCaused by: eof"));
    }
}

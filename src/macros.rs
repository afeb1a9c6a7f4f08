//! Logging macros with call-site capture.
//!
//! Every macro checks the debug gate first. When the level is gated nothing
//! after the logger expression is evaluated: no call-site lookup, no message
//! expression, no argument conversion.
//!
//! Three forms per severity:
//!
//! ```
//! use rust_queue_logger::prelude::*;
//! use rust_queue_logger::{info, error};
//!
//! let logger = Logger::builder().crash_hook(NoCrashHook).build();
//! logger.init(std::env::temp_dir(), false);
//!
//! // plain message
//! info!(logger, "server started");
//!
//! // message with an attached failure
//! let err = std::io::Error::other("disk full");
//! error!(logger, "save failed"; err);
//!
//! // printf-style format; returns the format result
//! info!(logger, "listening on port %d", 8080).unwrap();
//! ```

/// Resolve the enclosing function as a [`CallSite`](crate::CallSite).
///
/// The path comes from `type_name` of a nested fn item, so it is fixed at
/// compile time and survives inlining.
#[macro_export]
macro_rules! call_site {
    () => {{
        fn __call_site_marker() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        $crate::CallSite::from_path(__type_name_of(__call_site_marker))
    }};
}

/// Log at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_queue_logger::prelude::*;
/// # let logger = Logger::builder().crash_hook(NoCrashHook).build();
/// use rust_queue_logger::log;
/// log!(logger, LogLevel::Info, "simple message");
/// log!(logger, LogLevel::Warn, "retry %d of %d", 1, 3).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $msg:expr; $failure:expr) => {{
        let __logger = &$logger;
        let __level = $level;
        if __logger.is_enabled(__level) {
            __logger.log_message(
                __level,
                || $crate::call_site!(),
                $msg,
                ::core::option::Option::Some($crate::Failure::from($failure)),
            );
        } else {
            __logger.metrics().record_gated();
        }
    }};
    ($logger:expr, $level:expr, $fmt:expr, $($arg:expr),+ $(,)?) => {{
        let __logger = &$logger;
        let __level = $level;
        if __logger.is_enabled(__level) {
            __logger.log_fmt(
                __level,
                || $crate::call_site!(),
                $fmt,
                &[$($crate::Arg::from($arg)),+],
            )
        } else {
            __logger.metrics().record_gated();
            $crate::Result::Ok(())
        }
    }};
    ($logger:expr, $level:expr, $msg:expr $(,)?) => {{
        let __logger = &$logger;
        let __level = $level;
        if __logger.is_enabled(__level) {
            __logger.log_message(__level, || $crate::call_site!(), $msg, ::core::option::Option::None);
        } else {
            __logger.metrics().record_gated();
        }
    }};
}

/// Log a verbose-level message. Dropped unless debug mode is on.
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Verbose, $($arg)+)
    };
}

/// Log a debug-level message. Dropped unless debug mode is on.
///
/// ```
/// # use rust_queue_logger::prelude::*;
/// # let logger = Logger::builder().crash_hook(NoCrashHook).build();
/// use rust_queue_logger::debug;
/// debug!(logger, "cache size %d", 10).unwrap();
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message. Shown with severity char `A`.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn quiet_logger() -> Logger {
        Logger::builder()
            .platform(|_: LogLevel, _: &str, _: &str| {})
            .crash_hook(NoCrashHook)
            .build()
    }

    #[test]
    fn test_call_site_macro() {
        let site = call_site!();
        assert_eq!(site.type_name(), "tests");
        assert_eq!(site.method(), "test_call_site_macro");
    }

    #[test]
    fn test_message_forms() {
        let logger = quiet_logger();
        info!(logger, "plain");
        warn!(logger, String::from("owned"));
        error!(logger, "with failure"; std::io::Error::other("io"));
        fatal!(logger, "with failure"; Failure::msg("already wrapped"));
        assert_eq!(logger.queued(), 4);
    }

    #[test]
    fn test_format_form_returns_result() {
        let logger = quiet_logger();
        assert!(info!(logger, "count=%d", 3).is_ok());
        assert!(warn!(logger, "%s and %s", "one").is_err());
        assert_eq!(logger.queued(), 1);
    }

    #[test]
    fn test_gated_levels_skip_arguments() {
        let logger = quiet_logger();
        let evaluated = Arc::new(Mutex::new(0));

        let expensive = || {
            *evaluated.lock() += 1;
            7
        };
        debug!(logger, "value %d", expensive()).unwrap();
        verbose!(logger, {
            *evaluated.lock() += 1;
            "message"
        });

        assert_eq!(*evaluated.lock(), 0);
        assert_eq!(logger.queued(), 0);
        assert_eq!(logger.metrics().records_gated(), 2);
    }

    #[test]
    fn test_log_macro_explicit_level() {
        let logger = quiet_logger();
        log!(logger, LogLevel::Info, "explicit");
        log!(logger, LogLevel::Error, "code %d", 500).unwrap();
        assert_eq!(logger.queued(), 2);
    }
}

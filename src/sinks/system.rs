//! Platform log facility sink

use crate::core::{LogLevel, LogRecord, Result, Sink};

#[cfg(feature = "console")]
use colored::Colorize;

/// Tag used for the pipeline's own warnings (init problems, sink failures)
pub const INTERNAL_TAG: &str = "Log";
/// Tag used by the worker when it stops
pub const WORKER_TAG: &str = "Logger";

/// The platform's native log call: severity, tag, text. Fire-and-forget.
pub trait PlatformLog: Send {
    fn println(&mut self, level: LogLevel, tag: &str, message: &str);
}

impl<F> PlatformLog for F
where
    F: FnMut(LogLevel, &str, &str) + Send,
{
    fn println(&mut self, level: LogLevel, tag: &str, message: &str) {
        self(level, tag, message)
    }
}

/// Default facility: `I/Tag: text` on stdout, Error and above on stderr.
#[cfg_attr(not(feature = "console"), allow(dead_code))]
pub struct ConsoleFacility {
    use_colors: bool,
}

impl ConsoleFacility {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn render(&self, level: LogLevel, tag: &str, message: &str) -> String {
        let prefix = format!("{}/{}", level.to_char(), tag);

        #[cfg(feature = "console")]
        let prefix = if self.use_colors {
            prefix.color(level.color_code()).to_string()
        } else {
            prefix
        };

        format!("{}: {}", prefix, message)
    }
}

impl Default for ConsoleFacility {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformLog for ConsoleFacility {
    fn println(&mut self, level: LogLevel, tag: &str, message: &str) {
        let line = self.render(level, tag, message);
        match level {
            LogLevel::Error | LogLevel::Fatal => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}

/// Always-present sink forwarding `<method>(): <message>` to the platform log
/// under the caller's type as tag.
pub struct SystemSink {
    facility: Box<dyn PlatformLog>,
}

impl SystemSink {
    pub fn new(facility: Box<dyn PlatformLog>) -> Self {
        Self { facility }
    }

    /// Write a diagnostic line that bypasses the queue.
    pub fn report(&mut self, level: LogLevel, tag: &str, message: &str) {
        self.facility.println(level, tag, message);
    }
}

impl Default for SystemSink {
    fn default() -> Self {
        Self::new(Box::new(ConsoleFacility::new()))
    }
}

impl Sink for SystemSink {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        self.facility
            .println(record.level(), record.caller_type(), &record.body());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "system"
    }
}

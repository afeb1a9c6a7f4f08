//! Append-only log file sink

use crate::core::{LogRecord, LoggerConfig, LoggerError, Result, Sink, TimestampFormat};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes `<timestamp> <c>/<tag>: <method>(): <message>` lines, flushing after
/// each record so the tail of the file survives a crash.
pub struct FileSink {
    writer: Box<dyn Write + Send>,
    path: Option<PathBuf>,
    timestamp_format: TimestampFormat,
}

impl FileSink {
    /// Open `path` for appending if it already exists.
    ///
    /// A missing file is not an error: file logging stays off until something
    /// else creates it. On success the run separator is written immediately.
    pub fn open_existing(path: impl Into<PathBuf>, config: &LoggerConfig) -> Result<Option<Self>> {
        let path = path.into();
        if !path.exists() {
            return Ok(None);
        }

        let file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::io_operation("opening log file", path.display().to_string(), e))?;

        let mut sink = Self {
            writer: Box::new(BufWriter::new(file)),
            path: Some(path),
            timestamp_format: config.timestamp_format.clone(),
        };
        sink.write_line(&config.separator)?;

        Ok(Some(sink))
    }

    /// Wrap an arbitrary writer
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
            path: None,
            timestamp_format: TimestampFormat::default(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn format_line(&self, record: &LogRecord) -> String {
        format!(
            "{} {}/{}: {}",
            self.timestamp_format.format(record.timestamp()),
            record.level().to_char(),
            record.caller_type(),
            record.body()
        )
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        let result = self
            .writer
            .write_all(line.as_bytes())
            .and_then(|_| self.writer.write_all(b"\n"))
            .and_then(|_| self.writer.flush());

        result.map_err(|e| {
            let target = self
                .path
                .as_ref()
                .map_or_else(|| "<writer>".to_string(), |p| p.display().to_string());
            LoggerError::io_operation("writing log file", target, e)
        })
    }
}

impl Sink for FileSink {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        let line = self.format_line(record);
        self.write_line(&line)
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

//! Basic logger usage example
//!
//! Demonstrates initialization, the three emit forms and failure attachment.
//!
//! Run with: cargo run --example basic_usage

use rust_queue_logger::prelude::*;
use rust_queue_logger::{debug, error, info, warn};
use std::time::Duration;

struct Downloader;

impl Downloader {
    fn fetch(&self, logger: &Logger, url: &str) -> Result<()> {
        info!(logger, "fetching %s", url)?;

        let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "mirror timed out");
        error!(logger, "giving up on %s after %d attempts", url, 3, Failure::from(err))?;
        Ok(())
    }
}

fn main() -> Result<()> {
    println!("=== Rust Queue Logger - Basic Usage Example ===\n");

    let log_dir = std::env::temp_dir();
    // the file sink only attaches to a file that already exists
    std::fs::write(log_dir.join("basic_usage.log"), "")?;

    let logger = Logger::builder()
        .platform(ConsoleFacility::new())
        .file_name("basic_usage.log")
        .build();

    // queued before init, delivered once the worker starts
    info!(logger, "starting up");

    logger.init(&log_dir, true);
    println!("file sink: {:?}\n", logger.log_file());

    debug!(logger, "debug mode is %b", logger.is_debug())?;
    warn!(logger, "disk almost full");
    warn!(logger, "quota check failed"; std::io::Error::other("quota service down"));

    Downloader.fetch(&logger, "https://example.com/pack.zip")?;

    std::thread::sleep(Duration::from_millis(100));

    let metrics = logger.metrics();
    println!(
        "\nenqueued={} dispatched={} gated={} sink_failures={}",
        metrics.records_enqueued(),
        metrics.records_dispatched(),
        metrics.records_gated(),
        metrics.sink_failures()
    );

    Ok(())
}

//! Polling loop that reports peak memory usage while the parent is alive.

use crate::stat::{read_stat_value, StatError};
use crate::tracker::PeakTracker;
use camino::Utf8PathBuf;
use labkit_parsers::byte_num_repr;
use std::io::Write;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

/// cgroup v1 memory accounting file of the current job.
pub const DEFAULT_STAT_FILE: &str = "/sys/fs/cgroup/memory/memory.stat";

/// Counter reported by default.
pub const DEFAULT_KEY: &str = "total_rss";

#[derive(Error, Debug)]
pub enum MemwatchError {
    #[error(transparent)]
    Stat(#[from] StatError),
    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Configuration for the memory poller.
#[derive(Debug, Clone)]
pub struct MemwatchConfig {
    /// Statistics file to read.
    pub stat_file: Utf8PathBuf,
    /// Counter to track.
    pub key: String,
    /// Pause between two checks.
    pub poll_interval: Duration,
    /// Extra pause after a new maximum was reported.
    pub cooldown: Duration,
}

impl Default for MemwatchConfig {
    fn default() -> Self {
        Self {
            stat_file: Utf8PathBuf::from(DEFAULT_STAT_FILE),
            key: DEFAULT_KEY.to_string(),
            poll_interval: Duration::from_secs(1),
            cooldown: Duration::from_secs(10),
        }
    }
}

/// Reads the configured counter and reports new maxima.
pub struct RssChecker {
    config: MemwatchConfig,
    tracker: PeakTracker,
}

impl RssChecker {
    pub fn new(config: MemwatchConfig) -> Self {
        Self {
            config,
            tracker: PeakTracker::new(),
        }
    }

    pub fn config(&self) -> &MemwatchConfig {
        &self.config
    }

    /// Largest value reported so far.
    pub fn max_value(&self) -> u64 {
        self.tracker.max_value()
    }

    /// Read the current value of the counter.
    pub async fn current(&self) -> Result<u64, StatError> {
        read_stat_value(&self.config.stat_file, &self.config.key).await
    }

    /// Take one sample. On a new maximum, write a report and wait for the
    /// cooldown before returning `true`.
    pub async fn update<W: Write>(&mut self, out: &mut W) -> Result<bool, MemwatchError> {
        let value = self.current().await?;
        let Some(rendered) = self.tracker.observe(value) else {
            return Ok(false);
        };
        writeln!(out, "New maximum RSS usage: {}", rendered)?;
        out.flush()?;
        sleep(self.config.cooldown).await;
        Ok(true)
    }
}

/// Whether the process that started us still exists.
///
/// Orphaned processes are re-parented to init (pid 1).
pub fn parent_alive() -> bool {
    std::os::unix::process::parent_id() > 1
}

/// Poll until `keep_running` returns false, then report the final usage.
///
/// The final report is written unconditionally, whether or not it is a new
/// maximum. Returns the final value.
pub async fn run<F, W>(
    config: MemwatchConfig,
    mut keep_running: F,
    out: &mut W,
) -> Result<u64, MemwatchError>
where
    F: FnMut() -> bool,
    W: Write,
{
    tracing::info!(
        "Watching {} in {}, polling every {:?}",
        config.key,
        config.stat_file,
        config.poll_interval
    );

    let mut checker = RssChecker::new(config);
    while keep_running() {
        checker.update(out).await?;
        sleep(checker.config().poll_interval).await;
    }

    let final_value = checker.current().await?;
    writeln!(out, "Final usage: {}", byte_num_repr(final_value))?;
    out.flush()?;
    tracing::debug!(
        "peak {} final {}",
        byte_num_repr(checker.max_value()),
        byte_num_repr(final_value)
    );
    Ok(final_value)
}

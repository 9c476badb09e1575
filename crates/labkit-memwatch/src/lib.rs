//! Peak resident memory reporting for batch jobs.
//!
//! Reads a cgroup `memory.stat` file once per second and prints every new
//! maximum of one counter until the parent process goes away.

pub mod poller;
pub mod stat;
pub mod tracker;

pub use poller::{parent_alive, run, MemwatchConfig, MemwatchError, RssChecker};
pub use stat::{parse_stat, read_stat_value, StatError};
pub use tracker::PeakTracker;

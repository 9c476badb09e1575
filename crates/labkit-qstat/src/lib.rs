//! Grid Engine integration.
//!
//! Query job details via `qstat -j`, from the cluster directly or over ssh.

pub mod cache;
pub mod cluster;
pub mod info;

pub use cache::{QstatCache, QstatError};
pub use cluster::{cluster_command, local_hostname, on_cluster, shell_quote, ssh_command};
pub use info::{parse_qstat_info, QstatInfo};

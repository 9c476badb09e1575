//! Routing scheduler commands to the cluster.

use labkit_exec::{run_output, ExecError};
use tokio::process::Command;

/// Submit host used when running off-cluster.
pub const CLUSTER_HOST: &str = "cluster-cn-01";

/// Host name prefix of cluster nodes.
const CLUSTER_PREFIX: &str = "cluster-";

/// Whether `hostname` is a cluster node that can talk to the scheduler.
pub fn on_cluster(hostname: &str) -> bool {
    hostname.starts_with(CLUSTER_PREFIX)
}

/// Quote `s` for a POSIX shell.
pub fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    let safe = s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c));
    if safe {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\"'\"'"))
    }
}

/// Wrap `cmd` to run on `host` over non-interactive ssh.
pub fn ssh_command(host: &str, cmd: &[String]) -> Vec<String> {
    let remote = cmd
        .iter()
        .map(|arg| shell_quote(arg))
        .collect::<Vec<_>>()
        .join(" ");
    [
        "ssh",
        "-o",
        "BatchMode=yes",
        "-o",
        "ConnectTimeout=3",
        "-o",
        "ServerAliveInterval=2",
        "-o",
        "StrictHostKeyChecking=no",
        host,
    ]
    .into_iter()
    .map(str::to_string)
    .chain(std::iter::once(remote))
    .collect()
}

/// Run `cmd` directly on cluster nodes, otherwise via ssh to [`CLUSTER_HOST`].
pub fn cluster_command(cmd: Vec<String>, hostname: &str) -> Vec<String> {
    if on_cluster(hostname) {
        cmd
    } else {
        ssh_command(CLUSTER_HOST, &cmd)
    }
}

/// Host name of this machine.
pub async fn local_hostname() -> Result<String, ExecError> {
    if let Ok(name) = std::fs::read_to_string("/proc/sys/kernel/hostname") {
        return Ok(name.trim().to_string());
    }
    let out = run_output(&mut Command::new("hostname")).await?;
    Ok(out.trim().to_string())
}

//! Cached `qstat -j` lookups.

use crate::cluster::cluster_command;
use crate::info::QstatInfo;
use camino::Utf8PathBuf;
use labkit_exec::ExecError;
use std::collections::HashMap;
use thiserror::Error;
use tokio::process::Command;

/// stderr marker of `qstat -j` for jobs that already left the queue.
const MISSING_JOB_MARKER: &str = "Following jobs do not exist:";

#[derive(Error, Debug)]
pub enum QstatError {
    #[error(transparent)]
    Exec(#[from] ExecError),
    #[error("Failed to parse qstat output for job {job_id}: {reason}")]
    Parse { job_id: u64, reason: String },
}

/// Job details keyed by job id, owned by the caller.
///
/// Entries are kept until [`QstatCache::invalidate`] or [`QstatCache::clear`].
/// Jobs that no longer exist are not cached.
#[derive(Debug)]
pub struct QstatCache {
    hostname: String,
    program: Utf8PathBuf,
    entries: HashMap<u64, QstatInfo>,
}

impl QstatCache {
    /// Cache for queries issued from `hostname`.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            program: Utf8PathBuf::from("qstat"),
            entries: HashMap::new(),
        }
    }

    /// Use a different qstat executable.
    pub fn with_program(mut self, program: impl Into<Utf8PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Details of `job_id`, querying qstat on a cache miss.
    ///
    /// Returns None if the job does not exist (any more).
    pub async fn get(&mut self, job_id: u64) -> Result<Option<&QstatInfo>, QstatError> {
        if !self.entries.contains_key(&job_id) {
            match self.query(job_id).await? {
                Some(info) => {
                    self.entries.insert(job_id, info);
                }
                None => return Ok(None),
            }
        }
        Ok(self.entries.get(&job_id))
    }

    /// Drop the cached entry for `job_id`. Returns whether there was one.
    pub fn invalidate(&mut self, job_id: u64) -> bool {
        self.entries.remove(&job_id).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    async fn query(&self, job_id: u64) -> Result<Option<QstatInfo>, QstatError> {
        let argv = cluster_command(
            vec![
                self.program.to_string(),
                "-j".to_string(),
                job_id.to_string(),
            ],
            &self.hostname,
        );
        let command = argv.join(" ");
        tracing::debug!("querying {}", command);

        let output = Command::new(&argv[0])
            .args(&argv[1..])
            .output()
            .await
            .map_err(|source| ExecError::Spawn {
                command: command.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains(MISSING_JOB_MARKER) {
            return Ok(None);
        }
        if !output.status.success() {
            return Err(ExecError::Exit {
                command,
                code: output.status.code().unwrap_or(-1),
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        QstatInfo::parse(&stdout)
            .map(Some)
            .map_err(|reason| QstatError::Parse { job_id, reason })
    }
}

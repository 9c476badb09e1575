//! Process environment the data-dir setup runs in.

use camino::{Utf8Path, Utf8PathBuf};
use labkit_exec::{run_output, ExecError, FsError};
use labkit_parsers::non_empty_string;
use std::path::PathBuf;
use thiserror::Error;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum DataDirError {
    #[error("Error: Must be in {0}/")]
    OutsideSetups(Utf8PathBuf),
    #[error("Failed to access {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid info file {path}: {source}")]
    Config {
        path: Utf8PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Path is not valid UTF-8: {0:?}")]
    NonUtf8Path(PathBuf),
    #[error("HOME is not set")]
    NoHome,
    #[error("Could not determine the user name")]
    NoUser,
    #[error(transparent)]
    Fs(#[from] FsError),
    #[error(transparent)]
    Exec(#[from] ExecError),
}

impl DataDirError {
    pub(crate) fn io(path: &Utf8Path, source: std::io::Error) -> Self {
        DataDirError::Io {
            path: path.to_owned(),
            source,
        }
    }
}

/// Where and as whom the setup runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDirContext {
    /// Setup directory being configured.
    pub cwd: Utf8PathBuf,
    /// Home directory containing `setups/`.
    pub home: Utf8PathBuf,
    /// Owner of the work directory.
    pub user: String,
}

impl DataDirContext {
    /// Build the context from the current directory, `$HOME` and `$USER`.
    ///
    /// Falls back to `whoami` when `$USER` is unset or blank.
    pub async fn from_env() -> Result<Self, DataDirError> {
        let cwd =
            std::env::current_dir().map_err(|e| DataDirError::io(Utf8Path::new("."), e))?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|e| DataDirError::NonUtf8Path(e.into_path_buf()))?;

        let home = std::env::var("HOME")
            .ok()
            .and_then(|h| non_empty_string(&h))
            .ok_or(DataDirError::NoHome)?;

        let user = match std::env::var("USER").ok().and_then(|u| non_empty_string(&u)) {
            Some(user) => user,
            None => {
                let out = run_output(&mut Command::new("whoami")).await?;
                non_empty_string(&out).ok_or(DataDirError::NoUser)?
            }
        };

        Ok(Self {
            cwd,
            home: Utf8PathBuf::from(home),
            user,
        })
    }

    /// Resolved `~/setups`. Falls back to the literal path if it cannot be
    /// canonicalized.
    pub fn setups_root(&self) -> Utf8PathBuf {
        let root = self.home.join("setups");
        root.canonicalize_utf8().unwrap_or(root)
    }
}

//! Symlink and listing helpers.

use crate::command::{run_status, ExecError};
use camino::{Utf8Path, Utf8PathBuf};
use std::io;
use std::os::unix::fs::symlink;
use thiserror::Error;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum FsError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("the link destination {0} does not exist")]
    MissingTarget(Utf8PathBuf),
    #[error("existing mismatching symlink: {dst} -> {current}")]
    MismatchingSymlink { dst: Utf8PathBuf, current: String },
    #[error("{0}")]
    Precondition(String),
    #[error(transparent)]
    Exec(#[from] ExecError),
}

impl FsError {
    pub(crate) fn io(path: &Utf8Path, source: io::Error) -> Self {
        FsError::Io {
            path: path.to_owned(),
            source,
        }
    }
}

/// Fail with `msg` unless `condition` holds.
pub fn require(condition: bool, msg: impl Into<String>) -> Result<(), FsError> {
    if condition {
        Ok(())
    } else {
        Err(FsError::Precondition(msg.into()))
    }
}

/// Create `dst` as a symlink to `src`, or verify an existing one.
///
/// A relative `src` is resolved against the parent of `dst` for the existence
/// check but written into the link unchanged. An existing symlink at `dst`
/// must already point at exactly `src`.
pub fn make_symlink(src: &Utf8Path, dst: &Utf8Path) -> Result<(), FsError> {
    require(!src.as_str().is_empty(), "symlink target must not be empty")?;

    let resolved = if src.is_absolute() {
        src.to_owned()
    } else {
        dst.parent().unwrap_or(Utf8Path::new("")).join(src)
    };
    if !resolved.exists() {
        return Err(FsError::MissingTarget(src.to_owned()));
    }

    if dst.is_symlink() {
        let current = std::fs::read_link(dst).map_err(|e| FsError::io(dst, e))?;
        if current != src.as_std_path() {
            return Err(FsError::MismatchingSymlink {
                dst: dst.to_owned(),
                current: current.to_string_lossy().into_owned(),
            });
        }
        tracing::debug!("symlink {} already points at {}", dst, src);
        return Ok(());
    }

    symlink(src, dst).map_err(|e| FsError::io(dst, e))
}

/// Point `link` at `target`, removing whatever file or link was there.
pub fn replace_symlink(target: &Utf8Path, link: &Utf8Path) -> Result<(), FsError> {
    if link.is_symlink() || link.exists() {
        println!("Removing old {}", link);
        std::fs::remove_file(link).map_err(|e| FsError::io(link, e))?;
    }
    println!("Creating {} -> {}", link, target);
    symlink(target, link).map_err(|e| FsError::io(link, e))
}

/// Show a long listing of `path` on stdout.
pub async fn ls(path: &Utf8Path) -> Result<(), FsError> {
    let mut cmd = Command::new("ls");
    cmd.args(["--color=auto", "-l"]).arg(path);
    run_status(&mut cmd).await?;
    Ok(())
}

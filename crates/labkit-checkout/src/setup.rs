//! Clone and setup workflows.

use crate::git::{Git, SubmoduleOptions};
use camino::{Utf8Path, Utf8PathBuf};
use labkit_datadir::{DataDirContext, DataDirError, DATA_DIR_LINK};
use labkit_exec::{require, ExecError, FsError};
use thiserror::Error;

/// Nested checkout whose own submodules are initialized by
/// [`CheckoutSetup::run_with_multisetup`].
pub const MULTISETUP_DIR: &str = "tools-multisetup";

/// Stale training state removed from fresh checkouts.
const STALE_FILES: &[&str] = &["newbob.data"];

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error(transparent)]
    Exec(#[from] ExecError),
    #[error(transparent)]
    Fs(#[from] FsError),
    #[error(transparent)]
    DataDir(#[from] DataDirError),
    #[error("Failed to access {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Post-checkout setup of one working tree.
#[derive(Debug, Clone)]
pub struct CheckoutSetup {
    dir: Utf8PathBuf,
    options: SubmoduleOptions,
    git: Git,
}

impl CheckoutSetup {
    pub fn new(dir: &Utf8Path, options: SubmoduleOptions) -> Self {
        let git = Git::new(&options.git_program, dir);
        Self {
            dir: dir.to_owned(),
            options,
            git,
        }
    }

    /// Refresh the data-dir link, drop stale files and set up submodules.
    ///
    /// A failing `git submodule update` is reported and skipped; every other
    /// failing command aborts.
    pub async fn run(&self) -> Result<(), CheckoutError> {
        if self.dir.join(DATA_DIR_LINK).exists() {
            self.refresh_data_dir().await?;
        }
        self.remove_stale_files()?;
        self.setup_submodules().await
    }

    /// [`CheckoutSetup::run`], then initialize the submodules of
    /// `tools-multisetup/`. Failures there are fatal.
    pub async fn run_with_multisetup(&self) -> Result<(), CheckoutError> {
        self.run().await?;
        let multisetup = self.dir.join(MULTISETUP_DIR);
        println!("> Change into {}", multisetup);
        Git::new(&self.options.git_program, &multisetup)
            .submodule_init_update()
            .await?;
        Ok(())
    }

    async fn refresh_data_dir(&self) -> Result<(), CheckoutError> {
        let mut ctx = DataDirContext::from_env().await?;
        ctx.cwd = self
            .dir
            .canonicalize_utf8()
            .map_err(|source| CheckoutError::Io {
                path: self.dir.clone(),
                source,
            })?;
        labkit_datadir::run(ctx, &[]).await?;
        self.git
            .run(["commit", DATA_DIR_LINK, "-m", DATA_DIR_LINK])
            .await?;
        Ok(())
    }

    fn remove_stale_files(&self) -> Result<(), CheckoutError> {
        for name in STALE_FILES {
            let path = self.dir.join(name);
            if path.exists() {
                tracing::debug!("Removing {}", path);
                std::fs::remove_file(&path).map_err(|source| CheckoutError::Io {
                    path: path.clone(),
                    source,
                })?;
            }
        }
        Ok(())
    }

    async fn setup_submodules(&self) -> Result<(), CheckoutError> {
        self.git.run(["submodule", "init"]).await?;
        if let Err(e) = self.git.run(["submodule", "update"]).await {
            tracing::warn!("{}. Try to continue though, maybe still works.", e);
        }
        self.git
            .run([
                "submodule",
                "foreach",
                "git",
                "config",
                "credential.helper",
                self.options.credential_helper.as_str(),
            ])
            .await?;
        let upstream = format!("origin/{}", self.options.branch);
        self.git
            .run([
                "submodule",
                "foreach",
                "git",
                "checkout",
                "-B",
                self.options.branch.as_str(),
                upstream.as_str(),
            ])
            .await?;
        Ok(())
    }
}

/// Clone `source` into `dest` and run [`CheckoutSetup::run`] there.
///
/// `dest` must not exist beforehand.
pub async fn clone_setup(
    source: &str,
    dest: &Utf8Path,
    options: SubmoduleOptions,
) -> Result<(), CheckoutError> {
    require(
        !dest.exists() && !dest.is_symlink(),
        format!("{} already exists", dest),
    )?;
    Git::in_current_dir(&options.git_program)
        .run(["clone", source, dest.as_str()])
        .await?;
    require(dest.is_dir(), format!("{} is not a directory after clone", dest))?;

    println!("> Change into new dir {}", dest);
    CheckoutSetup::new(dest, options).run().await
}

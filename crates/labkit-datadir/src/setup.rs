//! The `setup-data-dir` workflow.

use crate::context::{DataDirContext, DataDirError};
use crate::info::{find_info_file, load_settings, Settings};
use camino::{Utf8Path, Utf8PathBuf};
use labkit_exec::{ls, make_symlink, replace_symlink, require};

/// Symlink in every setup directory pointing at its work directory.
pub const DATA_DIR_LINK: &str = "setup-data-dir-symlink";

/// Link to the configured dataset.
const DATASET_LINK: &str = "data-common";

/// Link to the shared package checkout.
const PKG_LINK: &str = "pkg_symlink";

/// A setup directory with its resolved settings and work directory.
#[derive(Debug, Clone)]
pub struct DataDir {
    ctx: DataDirContext,
    setups_root: Utf8PathBuf,
    info_file: Option<Utf8PathBuf>,
    settings: Settings,
    workdir: Utf8PathBuf,
}

impl DataDir {
    /// Resolve settings and the work directory for `ctx.cwd`.
    ///
    /// The current directory must be strictly inside `~/setups`.
    pub fn new(ctx: DataDirContext) -> Result<Self, DataDirError> {
        println!("Current dir: {}", ctx.cwd);
        let setups_root = ctx.setups_root();
        let relative = match ctx.cwd.strip_prefix(&setups_root) {
            Ok(rel) if !rel.as_str().is_empty() => rel.to_owned(),
            _ => return Err(DataDirError::OutsideSetups(setups_root)),
        };

        let info_file = find_info_file(&setups_root, &ctx.cwd);
        let settings = match &info_file {
            Some(path) => {
                tracing::debug!("Loading settings from {}", path);
                load_settings(path)?
            }
            None => Settings::default(),
        };

        let workdir = settings
            .workdir_base
            .join(&ctx.user)
            .join("setups-data")
            .join(relative);

        Ok(Self {
            ctx,
            setups_root,
            info_file,
            settings,
            workdir,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn info_file(&self) -> Option<&Utf8Path> {
        self.info_file.as_deref()
    }

    pub fn workdir(&self) -> &Utf8Path {
        &self.workdir
    }

    /// Path of the work directory symlink inside the setup.
    pub fn link_path(&self) -> Utf8PathBuf {
        self.ctx.cwd.join(DATA_DIR_LINK)
    }

    /// Create the work directory and point the setup's symlink at it.
    ///
    /// A symlink pointing anywhere else is replaced.
    pub async fn ensure_workdir_link(&self) -> Result<(), DataDirError> {
        println!("Work dir: {}", self.workdir);
        if !self.workdir.is_dir() {
            println!("Work dir does not exist, create...");
            tokio::fs::create_dir_all(&self.workdir)
                .await
                .map_err(|e| DataDirError::io(&self.workdir, e))?;
        }

        let link = self.link_path();
        if link.is_symlink() {
            let current = tokio::fs::read_link(&link)
                .await
                .map_err(|e| DataDirError::io(&link, e))?;
            if current != self.workdir.as_std_path() {
                println!("existing mismatching symlink:");
                ls(&link).await?;
                println!("Deleting {}...", DATA_DIR_LINK);
                tokio::fs::remove_file(&link)
                    .await
                    .map_err(|e| DataDirError::io(&link, e))?;
            }
        }

        if !link.is_symlink() {
            println!("{} does not exist, create...", DATA_DIR_LINK);
            tokio::fs::symlink(&self.workdir, &link)
                .await
                .map_err(|e| DataDirError::io(&link, e))?;
            ls(&link).await?;
        }
        Ok(())
    }

    /// Ensure the work directory link, then create `name` in the work
    /// directory and link it into the setup as `name`.
    pub async fn setup_dir(&self, name: &str) -> Result<(), DataDirError> {
        self.ensure_workdir_link().await?;
        require(!name.is_empty(), "Error: directory name must not be empty")?;
        require(
            !name.contains('/'),
            format!("Error: {:?} must not contain slashes", name),
        )?;

        let target = Utf8PathBuf::from(DATA_DIR_LINK).join(name);
        let target_abs = self.ctx.cwd.join(&target);
        if !target_abs.is_dir() {
            println!("Workdir/{:?} does not exist, create...", name);
            tokio::fs::create_dir(&target_abs)
                .await
                .map_err(|e| DataDirError::io(&target_abs, e))?;
        }

        println!("Create symlink {:?}...", name);
        let link = self.ctx.cwd.join(name);
        make_symlink(&target, &link)?;
        ls(&link).await?;
        Ok(())
    }

    /// Names of entries in the setup that link into the work directory.
    pub fn linked_dirs(&self) -> Result<Vec<String>, DataDirError> {
        let cwd = &self.ctx.cwd;
        let prefix = format!("{}/", DATA_DIR_LINK);
        let mut names = Vec::new();
        for entry in cwd.read_dir_utf8().map_err(|e| DataDirError::io(cwd, e))? {
            let entry = entry.map_err(|e| DataDirError::io(cwd, e))?;
            let is_link = entry
                .file_type()
                .map_err(|e| DataDirError::io(entry.path(), e))?
                .is_symlink();
            if !is_link {
                continue;
            }
            let target =
                std::fs::read_link(entry.path()).map_err(|e| DataDirError::io(entry.path(), e))?;
            if target.to_string_lossy().starts_with(&prefix) {
                names.push(entry.file_name().to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Re-run [`DataDir::setup_dir`] for every directory already linked into
    /// the work directory.
    pub async fn auto_update_dirs(&self) -> Result<(), DataDirError> {
        println!("Automatically update dirs. Current dir: {}", self.ctx.cwd);
        for name in self.linked_dirs()? {
            println!(">>> Dir: {}", name);
            self.setup_dir(&name).await?;
        }
        Ok(())
    }

    /// Link the configured dataset as `data-common`.
    ///
    /// A missing dataset only produces a warning. Returns whether a link was
    /// created.
    pub fn setup_dataset_link(&self) -> Result<bool, DataDirError> {
        let dataset = &self.settings.dataset;
        if !dataset.exists() {
            let config_hint = self
                .info_file
                .clone()
                .unwrap_or_else(|| self.setups_root.join(crate::info::INFO_FILE_NAME));
            tracing::warn!(
                "The specified path to dataset {} doesn't exist. Please put the correct path \
                 in {} and run again if you want a symlink to the dataset!",
                dataset,
                config_hint
            );
            return Ok(false);
        }
        replace_symlink(dataset, &self.ctx.cwd.join(DATASET_LINK))?;
        Ok(true)
    }

    /// Link `~/returnn/pkg` as `pkg_symlink`, warning if it is missing.
    pub fn setup_pkg_link(&self) -> Result<bool, DataDirError> {
        let pkg_path = self.ctx.home.join("returnn").join("pkg");
        if !pkg_path.exists() {
            tracing::warn!("The package directory {} doesn't exist.", pkg_path);
            return Ok(false);
        }
        replace_symlink(&pkg_path, &self.ctx.cwd.join(PKG_LINK))?;
        Ok(true)
    }
}

/// Full `setup-data-dir` run.
///
/// Without `dirs`, refreshes the work directory link and every directory
/// already linked into it. Otherwise sets up each named directory. Dataset and
/// package links are refreshed in both cases.
pub async fn run(ctx: DataDirContext, dirs: &[String]) -> Result<(), DataDirError> {
    let data_dir = DataDir::new(ctx)?;

    if dirs.is_empty() {
        data_dir.ensure_workdir_link().await?;
        data_dir.auto_update_dirs().await?;
    } else {
        for name in dirs {
            println!(">>> Dir: {}", name);
            data_dir.setup_dir(name).await?;
        }
    }

    data_dir.setup_dataset_link()?;
    data_dir.setup_pkg_link()?;
    println!("Finished.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::INFO_FILE_NAME;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        base: Utf8PathBuf,
        ctx: DataDirContext,
    }

    /// `<base>/home/setups/exp/run1` as the current directory, with work dirs
    /// under `<base>/work`.
    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let base = Utf8Path::from_path(temp.path())
            .unwrap()
            .canonicalize_utf8()
            .unwrap();
        let home = base.join("home");
        let cwd = home.join("setups/exp/run1");
        std::fs::create_dir_all(&cwd).unwrap();
        std::fs::write(
            home.join("setups/exp").join(INFO_FILE_NAME),
            format!(
                "workdir_base = \"{}\"\ndataset = \"{}\"\n",
                base.join("work"),
                base.join("corpus")
            ),
        )
        .unwrap();

        Fixture {
            _temp: temp,
            base,
            ctx: DataDirContext {
                cwd,
                home,
                user: "alice".to_string(),
            },
        }
    }

    #[test]
    fn test_new_resolves_workdir() {
        let fx = fixture();
        let data_dir = DataDir::new(fx.ctx.clone()).unwrap();
        assert_eq!(
            data_dir.workdir(),
            fx.base.join("work/alice/setups-data/exp/run1").as_path()
        );
        assert_eq!(
            data_dir.info_file(),
            Some(fx.base.join("home/setups/exp").join(INFO_FILE_NAME).as_path())
        );
    }

    #[test]
    fn test_new_rejects_outside_setups() {
        let fx = fixture();
        for cwd in [fx.base.clone(), fx.base.join("home/setups")] {
            let ctx = DataDirContext {
                cwd,
                ..fx.ctx.clone()
            };
            assert!(matches!(
                DataDir::new(ctx),
                Err(DataDirError::OutsideSetups(_))
            ));
        }
    }

    #[test]
    fn test_new_without_info_file_uses_defaults() {
        let fx = fixture();
        std::fs::remove_file(fx.base.join("home/setups/exp").join(INFO_FILE_NAME)).unwrap();
        let data_dir = DataDir::new(fx.ctx.clone()).unwrap();
        assert_eq!(data_dir.settings(), &Settings::default());
        assert_eq!(
            data_dir.workdir().as_str(),
            "/tmp/alice/setups-data/exp/run1"
        );
    }

    #[tokio::test]
    async fn test_ensure_workdir_link() {
        let fx = fixture();
        let data_dir = DataDir::new(fx.ctx.clone()).unwrap();
        data_dir.ensure_workdir_link().await.unwrap();

        assert!(data_dir.workdir().is_dir());
        assert_eq!(
            std::fs::read_link(data_dir.link_path()).unwrap(),
            data_dir.workdir().as_std_path()
        );

        // Idempotent
        data_dir.ensure_workdir_link().await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_workdir_link_replaces_mismatch() {
        let fx = fixture();
        let data_dir = DataDir::new(fx.ctx.clone()).unwrap();
        std::os::unix::fs::symlink(fx.base.join("elsewhere"), data_dir.link_path()).unwrap();

        data_dir.ensure_workdir_link().await.unwrap();
        assert_eq!(
            std::fs::read_link(data_dir.link_path()).unwrap(),
            data_dir.workdir().as_std_path()
        );
    }

    #[tokio::test]
    async fn test_setup_dir() {
        let fx = fixture();
        let data_dir = DataDir::new(fx.ctx.clone()).unwrap();
        data_dir.setup_dir("alignments").await.unwrap();

        assert!(data_dir.workdir().join("alignments").is_dir());
        let link = fx.ctx.cwd.join("alignments");
        assert_eq!(
            std::fs::read_link(&link).unwrap(),
            Utf8Path::new("setup-data-dir-symlink/alignments").as_std_path()
        );
        assert!(link.is_dir());

        data_dir.setup_dir("alignments").await.unwrap();
    }

    #[tokio::test]
    async fn test_setup_dir_rejects_bad_names() {
        let fx = fixture();
        let data_dir = DataDir::new(fx.ctx.clone()).unwrap();
        assert!(data_dir.setup_dir("").await.is_err());
        let err = data_dir.setup_dir("a/b").await.unwrap_err();
        assert!(err.to_string().contains("must not contain slashes"));
    }

    #[tokio::test]
    async fn test_auto_update_dirs() {
        let fx = fixture();
        let data_dir = DataDir::new(fx.ctx.clone()).unwrap();
        data_dir.setup_dir("logs").await.unwrap();
        data_dir.setup_dir("models").await.unwrap();
        std::os::unix::fs::symlink("/tmp", fx.ctx.cwd.join("unrelated")).unwrap();

        assert_eq!(data_dir.linked_dirs().unwrap(), vec!["logs", "models"]);

        // A fresh work dir, e.g. after the scratch area was wiped
        std::fs::remove_dir_all(fx.base.join("work")).unwrap();
        data_dir.auto_update_dirs().await.unwrap();
        assert!(data_dir.workdir().join("logs").is_dir());
        assert!(data_dir.workdir().join("models").is_dir());
    }

    #[tokio::test]
    async fn test_dataset_and_pkg_links() {
        let fx = fixture();
        let data_dir = DataDir::new(fx.ctx.clone()).unwrap();

        assert!(!data_dir.setup_dataset_link().unwrap());
        assert!(!data_dir.setup_pkg_link().unwrap());

        std::fs::create_dir(fx.base.join("corpus")).unwrap();
        std::fs::create_dir_all(fx.ctx.home.join("returnn/pkg")).unwrap();
        assert!(data_dir.setup_dataset_link().unwrap());
        assert!(data_dir.setup_pkg_link().unwrap());

        assert_eq!(
            std::fs::read_link(fx.ctx.cwd.join("data-common")).unwrap(),
            fx.base.join("corpus").as_std_path()
        );
        assert_eq!(
            std::fs::read_link(fx.ctx.cwd.join("pkg_symlink")).unwrap(),
            fx.ctx.home.join("returnn/pkg").as_std_path()
        );
    }

    #[tokio::test]
    async fn test_run_with_dirs() {
        let fx = fixture();
        run(fx.ctx.clone(), &["data".to_string()]).await.unwrap();
        assert!(fx.ctx.cwd.join(DATA_DIR_LINK).is_symlink());
        assert!(fx.ctx.cwd.join("data").is_dir());
    }
}

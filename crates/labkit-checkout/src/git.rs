//! git invocations rooted at a working tree.

use camino::{Utf8Path, Utf8PathBuf};
use labkit_exec::{run_verbose, ExecError};
use tokio::process::Command;

/// How submodules are configured after checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmoduleOptions {
    /// Branch every submodule is reset to, tracking `origin/<branch>`.
    pub branch: String,
    /// Value for `credential.helper` in every submodule.
    pub credential_helper: String,
    /// git executable.
    pub git_program: Utf8PathBuf,
}

impl Default for SubmoduleOptions {
    fn default() -> Self {
        Self {
            branch: "master".to_string(),
            credential_helper: "store".to_string(),
            git_program: Utf8PathBuf::from("git"),
        }
    }
}

/// Runs git commands in a fixed directory, echoing each one.
#[derive(Debug, Clone)]
pub struct Git {
    program: Utf8PathBuf,
    dir: Option<Utf8PathBuf>,
}

impl Git {
    /// git running in `dir`.
    pub fn new(program: &Utf8Path, dir: &Utf8Path) -> Self {
        Self {
            program: program.to_owned(),
            dir: Some(dir.to_owned()),
        }
    }

    /// git running in the current directory of this process.
    pub fn in_current_dir(program: &Utf8Path) -> Self {
        Self {
            program: program.to_owned(),
            dir: None,
        }
    }

    pub fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Echo and run `git <args>`.
    pub async fn run<I, S>(&self, args: I) -> Result<(), ExecError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        run_verbose(&mut self.command(args)).await
    }

    /// `git submodule init` followed by `git submodule update`.
    pub async fn submodule_init_update(&self) -> Result<(), ExecError> {
        self.run(["submodule", "init"]).await?;
        self.run(["submodule", "update"]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labkit_exec::describe;

    #[test]
    fn test_command_in_dir() {
        let git = Git::new(Utf8Path::new("git"), Utf8Path::new("/work/setup"));
        let cmd = git.command(["submodule", "init"]);
        assert_eq!(describe(&cmd), "git submodule init");
        assert_eq!(
            cmd.as_std().get_current_dir(),
            Some(std::path::Path::new("/work/setup"))
        );
    }

    #[test]
    fn test_command_in_current_dir() {
        let git = Git::in_current_dir(Utf8Path::new("git"));
        let cmd = git.command(["clone", "src", "dst"]);
        assert_eq!(describe(&cmd), "git clone src dst");
        assert_eq!(cmd.as_std().get_current_dir(), None);
    }

    #[test]
    fn test_default_options() {
        let options = SubmoduleOptions::default();
        assert_eq!(options.branch, "master");
        assert_eq!(options.credential_helper, "store");
        assert_eq!(options.git_program.as_str(), "git");
    }
}

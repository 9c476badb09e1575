//! Command line arguments of each tool.

use camino::Utf8PathBuf;
use clap::{Args, Parser};
use labkit_checkout::SubmoduleOptions;
use labkit_memwatch::MemwatchConfig;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "cgroup-mem-log-rss-max")]
#[command(about = "Log the peak RSS of the current job from cgroup memory statistics")]
pub struct MemwatchArgs {
    /// cgroup memory statistics file
    #[arg(long, default_value = labkit_memwatch::poller::DEFAULT_STAT_FILE)]
    pub stat_file: Utf8PathBuf,

    /// Counter to track
    #[arg(long, default_value = labkit_memwatch::poller::DEFAULT_KEY)]
    pub key: String,

    /// Poll interval in seconds
    #[arg(long, default_value = "1")]
    pub interval: u64,

    /// Extra pause in seconds after a new maximum
    #[arg(long, default_value = "10")]
    pub cooldown: u64,
}

impl From<MemwatchArgs> for MemwatchConfig {
    fn from(args: MemwatchArgs) -> Self {
        Self {
            stat_file: args.stat_file,
            key: args.key,
            poll_interval: Duration::from_secs(args.interval),
            cooldown: Duration::from_secs(args.cooldown),
        }
    }
}

/// Submodule options shared by the checkout tools.
#[derive(Args, Debug)]
pub struct SubmoduleArgs {
    /// Branch to check out in every submodule
    #[arg(long, default_value = "master")]
    pub branch: String,

    /// credential.helper for every submodule
    #[arg(long, default_value = "store")]
    pub credential_helper: String,
}

impl SubmoduleArgs {
    pub fn options(&self) -> SubmoduleOptions {
        SubmoduleOptions {
            branch: self.branch.clone(),
            credential_helper: self.credential_helper.clone(),
            ..SubmoduleOptions::default()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "git-clone-setup")]
#[command(about = "Clone a setup repository and initialize its submodules")]
pub struct CloneSetupArgs {
    /// Repository to clone
    pub source: String,

    /// New checkout directory (must not exist)
    pub dest: Utf8PathBuf,

    #[command(flatten)]
    pub submodules: SubmoduleArgs,
}

#[derive(Parser, Debug)]
#[command(name = "setup-checkout")]
#[command(about = "Initialize submodules of the setup checkout in the current directory")]
pub struct SetupCheckoutArgs {
    #[command(flatten)]
    pub submodules: SubmoduleArgs,
}

#[derive(Parser, Debug)]
#[command(name = "setup-data-dir")]
#[command(about = "Link per-user work directories into the current setup")]
pub struct DataDirArgs {
    /// Which dir symlinks we should check/update
    pub dirs: Vec<String>,
}

#[derive(Parser, Debug)]
#[command(name = "qstat-job-info")]
#[command(about = "Show owner, working directory and runtime limit of SGE jobs")]
pub struct QstatArgs {
    /// Job ids
    #[arg(required = true)]
    pub job_ids: Vec<u64>,

    /// Shorten working directories
    #[arg(long)]
    pub short: bool,
}

//! Link per-user work directories into the current setup.

use clap::Parser;
use labkit_cli::{init_tracing, DataDirArgs};
use labkit_datadir::DataDirContext;
use miette::{IntoDiagnostic, Result};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let args = DataDirArgs::parse();

    let ctx = DataDirContext::from_env().await.into_diagnostic()?;
    labkit_datadir::run(ctx, &args.dirs).await.into_diagnostic()
}

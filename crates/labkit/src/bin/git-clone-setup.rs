//! Clone a setup repository and prepare its submodules.

use clap::Parser;
use labkit_checkout::clone_setup;
use labkit_cli::{init_tracing, CloneSetupArgs};
use miette::{IntoDiagnostic, Result};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let args = CloneSetupArgs::parse();

    clone_setup(&args.source, &args.dest, args.submodules.options())
        .await
        .into_diagnostic()
}

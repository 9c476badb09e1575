//! Prepare submodules of the setup checkout in the current directory.

use camino::Utf8PathBuf;
use clap::Parser;
use labkit_checkout::CheckoutSetup;
use labkit_cli::{init_tracing, SetupCheckoutArgs};
use miette::{IntoDiagnostic, Result};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let args = SetupCheckoutArgs::parse();

    let cwd = std::env::current_dir().into_diagnostic()?;
    let cwd = Utf8PathBuf::try_from(cwd).into_diagnostic()?;
    CheckoutSetup::new(&cwd, args.submodules.options())
        .run_with_multisetup()
        .await
        .into_diagnostic()
}

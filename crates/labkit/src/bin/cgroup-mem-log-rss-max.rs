//! Log the peak RSS of the running job until its parent exits.

use clap::Parser;
use labkit_cli::{init_tracing, MemwatchArgs};
use labkit_memwatch::{parent_alive, run, MemwatchConfig};
use miette::{IntoDiagnostic, Result};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let config = MemwatchConfig::from(MemwatchArgs::parse());

    let mut stdout = std::io::stdout();
    run(config, parent_alive, &mut stdout)
        .await
        .into_diagnostic()?;
    Ok(())
}

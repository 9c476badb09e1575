//! CLI argument parsing and logging setup for the labkit tools.

pub mod args;
pub mod logging;

pub use args::{
    CloneSetupArgs, DataDirArgs, MemwatchArgs, QstatArgs, SetupCheckoutArgs, SubmoduleArgs,
};
pub use logging::init_tracing;

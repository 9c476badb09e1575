//! Subprocess execution and filesystem helpers shared by the setup tools.

pub mod command;
pub mod fs;

pub use command::{describe, run_output, run_shell, run_status, run_verbose, ExecError};
pub use fs::{ls, make_symlink, replace_symlink, require, FsError};

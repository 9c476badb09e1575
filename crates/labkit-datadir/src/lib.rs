//! Work directory setup for experiment checkouts under `~/setups`.
//!
//! Every setup directory gets a `setup-data-dir-symlink` pointing into a
//! per-user scratch area, and named subdirectories of that area are linked
//! back into the setup.

pub mod context;
pub mod info;
pub mod setup;

pub use context::{DataDirContext, DataDirError};
pub use info::{find_info_file, find_info_file_with, load_settings, Settings, INFO_FILE_NAME};
pub use setup::{run, DataDir, DATA_DIR_LINK};

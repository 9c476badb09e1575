//! Checkout setup for experiment repositories.
//!
//! Clones a repository, refreshes its data-dir link and brings all
//! submodules onto a tracking branch.

pub mod git;
pub mod setup;

pub use git::{Git, SubmoduleOptions};
pub use setup::{clone_setup, CheckoutError, CheckoutSetup, MULTISETUP_DIR};

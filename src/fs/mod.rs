//! Filesystem module.
//!
//! Provides:
//! - Script file naming
//! - Destination directory management and saving

pub mod naming;
pub mod paths;

pub use naming::{script_file_name, validate_file_name};
pub use paths::{ensure_dir, save_script};

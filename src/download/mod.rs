//! Download module.
//!
//! This module provides:
//! - The per-target pipeline (retrieve, patch, save, expand)
//! - Per-target reports
//! - Session statistics

pub mod pipeline;
pub mod report;
pub mod state;

pub use pipeline::download_script;
pub use report::{DownloadReport, Stage, StageWarning};
pub use state::SessionStats;

//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Progress bars
//! - Report and statistics printing

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{
    print_banner, print_candidates, print_config_summary, print_error, print_info,
    print_sources, print_success, print_warning,
};
pub use progress::{create_download_bar, create_spinner};
pub use stats::{print_report, print_session_stats};

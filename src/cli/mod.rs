//! Command-line interface: arguments, prompting and target resolution.

pub mod args;
pub mod prompt;
pub mod resolve;

pub use args::Args;
pub use prompt::{parse_selection, Prompt};
pub use resolve::{pick_candidate, resolve_target, Resolution};

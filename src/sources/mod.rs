//! Source registry module.
//!
//! This module provides:
//! - URI templates with `{id}` placeholders
//! - The immutable registry of mirror, archive, key-map and API endpoints
//! - Ordered fallback across a list of sources

pub mod fallback;
pub mod registry;

pub use fallback::{try_in_order, Hit};
pub use registry::{SourceRegistry, SourceTemplate, ID_PLACEHOLDER};

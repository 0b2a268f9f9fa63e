//! URL handling module for Page Harvester
//!
//! This module provides seed normalization, link resolution, and the
//! same-site test that splits links into internal and external sets.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_host, same_site};
pub use normalize::{normalize_seed, resolve_link, strip_fragment};

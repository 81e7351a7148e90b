//! URL handling module for RPA-Scout
//!
//! This module decides which links stay on the crawled site and validates the
//! seed URL a scan starts from.

mod internal;
mod seed;

// Re-export main functions
pub use internal::{authority_of, is_internal};
pub use seed::parse_seed;

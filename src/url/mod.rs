//! URL handling module for Crawl-Warden
//!
//! This module provides URL canonicalization, relative-link resolution, and
//! domain extraction. Every operation is a pure function over string input and
//! runs in O(length of URL) — the crawler calls these on every discovered link,
//! so there is no backtracking pattern matching anywhere in this path.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, extract_path, normalize_domain};
pub use normalize::{is_valid_url, normalize, resolve_relative};

/// Maximum accepted URL length, in bytes. Longer inputs are rejected outright.
pub const MAX_URL_LENGTH: usize = 2048;

/// Minimum length for a URL to be considered fetchable ("http://a.b" is 10 bytes).
pub const MIN_URL_LENGTH: usize = 10;

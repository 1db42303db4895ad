//! Configuration module for Crawl-Warden
//!
//! Loads, parses, and validates TOML configuration files: seed URL lists,
//! feed poll configurations, sink paths, and politeness thresholds. TOML's
//! native `#` comments give operators the comment-tolerant config files the
//! crawler has always shipped with.
//!
//! # Example
//!
//! ```no_run
//! use crawl_warden::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("warden.toml")).unwrap();
//! println!("Seed URLs: {}", config.seeds.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FeedConfig, OutputConfig, PolitenessConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

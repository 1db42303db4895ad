//! Crawl-Warden: the reliability, politeness, and observability core of a
//! multi-threaded web crawler
//!
//! This crate decides, for each fetch attempt, whether a domain may be contacted,
//! records outcomes, gates accepted content by language, durably logs every attempt
//! off the fetch hot path, and reports aggregate throughput statistics. The fetch
//! engine, frontier, and content pipeline are external callers.

pub mod config;
pub mod language;
pub mod monitor;
pub mod politeness;
pub mod url;

use thiserror::Error;

/// Main error type for Crawl-Warden operations
#[derive(Debug, Error)]
pub enum WardenError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Logger initialization failed for {path}: {source}")]
    LoggerInit {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Crawl-Warden operations
pub type Result<T> = std::result::Result<T, WardenError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use language::LanguageDetector;
pub use monitor::{CrawlLogger, PerformanceMonitor};
pub use politeness::{DomainBlacklist, ErrorTracker, FetchErrorKind};
pub use crate::url::{extract_domain, normalize, resolve_relative};

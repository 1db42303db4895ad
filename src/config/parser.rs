use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Used to detect whether the configuration changed between crawl runs.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
# seed list; comments are allowed anywhere
seeds = [
    "https://example.com/",      # primary
    "https://news.example.org/", # secondary
]

[output]
database-path = "./data/crawl.db"
log-path = "./data/crawl.csv"

[politeness]
blacklist-path = "./config/blacklist.txt"
cooldown-secs = 60

[[feeds]]
url = "https://example.com/feed.xml"
poll-interval-minutes = 15
priority = 9

[[feeds]]
url = "https://news.example.org/rss"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.seeds.len(), 2);
        assert_eq!(config.output.database_path, "./data/crawl.db");
        assert_eq!(
            config.politeness.blacklist_path.as_deref(),
            Some("./config/blacklist.txt")
        );
        assert_eq!(config.politeness.cooldown_secs, 60);
        assert_eq!(config.feeds.len(), 2);
        assert_eq!(config.feeds[0].poll_interval_minutes, 15);
        assert_eq!(config.feeds[0].priority, 9);
        // Unspecified feed fields take their documented defaults
        assert_eq!(config.feeds[1].poll_interval_minutes, 10);
        assert_eq!(config.feeds[1].priority, 8);
    }

    #[test]
    fn test_politeness_defaults() {
        let config_content = r#"
[output]
database-path = "./data/crawl.db"
log-path = "./data/crawl.csv"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert!(config.seeds.is_empty());
        assert!(config.politeness.blacklist_path.is_none());
        assert_eq!(config.politeness.cooldown_secs, 60);
        assert_eq!(config.politeness.max_consecutive_timeouts, 5);
        assert_eq!(config.politeness.max_total_errors, 10);
        assert_eq!(config.politeness.log_queue_capacity, 10_000);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/warden.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
seeds = ["not-a-url"]

[output]
database-path = "./data/crawl.db"
log-path = "./data/crawl.csv"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}

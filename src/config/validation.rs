use crate::config::types::{Config, FeedConfig, OutputConfig, PolitenessConfig};
use crate::url::is_valid_url;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_output_config(&config.output)?;
    validate_politeness_config(&config.politeness)?;
    validate_seeds(&config.seeds)?;
    validate_feeds(&config.feeds)?;
    Ok(())
}

/// Validates sink paths
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if config.log_path.is_empty() {
        return Err(ConfigError::Validation(
            "log-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates politeness thresholds
fn validate_politeness_config(config: &PolitenessConfig) -> Result<(), ConfigError> {
    if config.cooldown_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "cooldown-secs must be >= 1, got {}",
            config.cooldown_secs
        )));
    }

    if config.max_consecutive_timeouts < 1 {
        return Err(ConfigError::Validation(format!(
            "max-consecutive-timeouts must be >= 1, got {}",
            config.max_consecutive_timeouts
        )));
    }

    if config.max_total_errors < 1 {
        return Err(ConfigError::Validation(format!(
            "max-total-errors must be >= 1, got {}",
            config.max_total_errors
        )));
    }

    if config.log_queue_capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "log-queue-capacity must be >= 1, got {}",
            config.log_queue_capacity
        )));
    }

    Ok(())
}

/// Validates seed URLs
fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    for seed in seeds {
        if !is_valid_url(seed) {
            return Err(ConfigError::InvalidUrl(format!(
                "Invalid seed URL: '{}'",
                seed
            )));
        }
    }
    Ok(())
}

/// Validates feed entries
fn validate_feeds(feeds: &[FeedConfig]) -> Result<(), ConfigError> {
    for feed in feeds {
        if !is_valid_url(&feed.url) {
            return Err(ConfigError::InvalidUrl(format!(
                "Invalid feed URL: '{}'",
                feed.url
            )));
        }

        if feed.priority < 1 || feed.priority > 10 {
            return Err(ConfigError::Validation(format!(
                "Feed '{}' priority must be between 1 and 10, got {}",
                feed.url, feed.priority
            )));
        }

        if feed.poll_interval_minutes < 1 {
            return Err(ConfigError::Validation(format!(
                "Feed '{}' poll-interval-minutes must be >= 1",
                feed.url
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            seeds: vec!["https://example.com/".to_string()],
            output: OutputConfig {
                database_path: "./data/crawl.db".to_string(),
                log_path: "./data/crawl.csv".to_string(),
            },
            politeness: PolitenessConfig::default(),
            feeds: vec![FeedConfig {
                url: "https://example.com/feed.xml".to_string(),
                poll_interval_minutes: 10,
                priority: 8,
            }],
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_database_path_rejected() {
        let mut config = valid_config();
        config.output.database_path = String::new();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_invalid_seed_rejected() {
        let mut config = valid_config();
        config.seeds.push("ftp://example.com/file".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_feed_priority_out_of_range_rejected() {
        let mut config = valid_config();
        config.feeds[0].priority = 11;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_cooldown_rejected() {
        let mut config = valid_config();
        config.politeness.cooldown_secs = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_no_seeds_allowed() {
        // The crawler can run from feeds alone
        let mut config = valid_config();
        config.seeds.clear();
        assert!(validate(&config).is_ok());
    }
}

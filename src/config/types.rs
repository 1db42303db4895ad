use serde::Deserialize;

/// Main configuration structure for Crawl-Warden
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Seed URLs handed to the frontier at startup
    #[serde(default)]
    pub seeds: Vec<String>,

    pub output: OutputConfig,

    #[serde(default)]
    pub politeness: PolitenessConfig,

    /// Feed/sitemap poll configurations consumed by the external frontier
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
}

/// Durable sink locations for the crawl logger
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite crawl-log database
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the append-only text record
    #[serde(rename = "log-path")]
    pub log_path: String,
}

/// Politeness and suspension tuning
#[derive(Debug, Clone, Deserialize)]
pub struct PolitenessConfig {
    /// Optional persisted permanent-blacklist file loaded at startup
    #[serde(rename = "blacklist-path", default)]
    pub blacklist_path: Option<String>,

    /// Temporary-suspension cooldown window, in seconds
    #[serde(rename = "cooldown-secs", default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Consecutive timeouts before a domain qualifies for suspension
    #[serde(
        rename = "max-consecutive-timeouts",
        default = "default_max_consecutive_timeouts"
    )]
    pub max_consecutive_timeouts: u32,

    /// All-time total errors before a domain qualifies for suspension
    #[serde(rename = "max-total-errors", default = "default_max_total_errors")]
    pub max_total_errors: u32,

    /// Bound on the crawl logger's producer queue
    #[serde(rename = "log-queue-capacity", default = "default_log_queue_capacity")]
    pub log_queue_capacity: usize,
}

/// One feed or sitemap polled periodically by the frontier
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub url: String,

    /// Minutes between polls of this feed
    #[serde(
        rename = "poll-interval-minutes",
        default = "default_poll_interval_minutes"
    )]
    pub poll_interval_minutes: u32,

    /// Scheduling priority, 1 (lowest) to 10 (highest)
    #[serde(default = "default_feed_priority")]
    pub priority: u8,
}

fn default_cooldown_secs() -> u64 {
    60
}

fn default_max_consecutive_timeouts() -> u32 {
    5
}

fn default_max_total_errors() -> u32 {
    10
}

fn default_log_queue_capacity() -> usize {
    10_000
}

fn default_poll_interval_minutes() -> u32 {
    10
}

fn default_feed_priority() -> u8 {
    8
}

impl Default for PolitenessConfig {
    fn default() -> Self {
        Self {
            blacklist_path: None,
            cooldown_secs: default_cooldown_secs(),
            max_consecutive_timeouts: default_max_consecutive_timeouts(),
            max_total_errors: default_max_total_errors(),
            log_queue_capacity: default_log_queue_capacity(),
        }
    }
}

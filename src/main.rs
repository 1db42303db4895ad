//! Crawl-Warden command-line entry point
//!
//! The crawl core itself is embedded by the fetch engine; this binary is the
//! operator's toolbox: validate a configuration before a run, or inspect the
//! crawl-log store after one.

use anyhow::Context;
use clap::Parser;
use crawl_warden::config::{load_config_with_hash, Config};
use crawl_warden::politeness::DomainBlacklist;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Crawl-Warden: reliability and politeness core for a web crawler
#[derive(Parser, Debug)]
#[command(name = "crawl-warden")]
#[command(version = "1.0.0")]
#[command(about = "Validate crawler configuration and inspect crawl logs", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what the core would enforce
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show aggregate statistics from the crawl-log database and exit
    #[arg(long)]
    stats: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.stats {
        handle_stats(&config)
    } else {
        handle_dry_run(&config)
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawl_warden=info,warn"),
            1 => EnvFilter::new("crawl_warden=debug,info"),
            2 => EnvFilter::new("crawl_warden=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Validates the configuration and prints what the core would enforce
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Crawl-Warden Dry Run ===\n");

    println!("Output:");
    println!("  Database: {}", config.output.database_path);
    println!("  Log: {}", config.output.log_path);

    println!("\nPoliteness:");
    println!("  Cooldown: {}s", config.politeness.cooldown_secs);
    println!(
        "  Suspension after: {} consecutive timeouts or {} total errors",
        config.politeness.max_consecutive_timeouts, config.politeness.max_total_errors
    );
    println!(
        "  Log queue capacity: {}",
        config.politeness.log_queue_capacity
    );

    match &config.politeness.blacklist_path {
        Some(path) => {
            let blacklist = DomainBlacklist::new();
            match blacklist.load_from_file(Path::new(path)) {
                Ok(count) => println!("  Permanent blacklist: {} domains from {}", count, path),
                Err(e) => {
                    tracing::warn!("Could not read blacklist file {}: {}", path, e);
                    println!("  Permanent blacklist: unreadable ({})", path);
                }
            }
        }
        None => println!("  Permanent blacklist: none configured"),
    }

    println!("\nSeed URLs ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }

    println!("\nFeeds ({}):", config.feeds.len());
    for feed in &config.feeds {
        println!(
            "  - {} (every {} min, priority {})",
            feed.url, feed.poll_interval_minutes, feed.priority
        );
    }

    println!("\nConfiguration is valid");
    Ok(())
}

/// Prints aggregate statistics from the crawl-log database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let db_path = Path::new(&config.output.database_path);
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("failed to open {}", db_path.display()))?;

    let total: i64 = conn.query_row("SELECT COUNT(*) FROM crawl_log", [], |row| row.get(0))?;
    let domains: i64 = conn.query_row(
        "SELECT COUNT(DISTINCT domain) FROM crawl_log WHERE domain != ''",
        [],
        |row| row.get(0),
    )?;
    let bytes: i64 = conn.query_row(
        "SELECT COALESCE(SUM(content_size), 0) FROM crawl_log",
        [],
        |row| row.get(0),
    )?;

    println!("=== Crawl Log Statistics ===\n");
    println!("Database: {}", config.output.database_path);
    println!("  Pages logged: {}", total);
    println!("  Unique domains: {}", domains);
    println!("  Content bytes: {}", bytes);

    let mut stmt = conn.prepare(
        "SELECT domain, COUNT(*) AS pages FROM crawl_log
         WHERE domain != '' GROUP BY domain ORDER BY pages DESC LIMIT 10",
    )?;
    let top: Vec<(String, i64)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    if !top.is_empty() {
        println!("\nTop domains:");
        for (domain, pages) in top {
            println!("  {:6}  {}", pages, domain);
        }
    }

    Ok(())
}

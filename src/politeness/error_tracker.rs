use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

/// Default consecutive-timeout threshold for suspension
const MAX_CONSECUTIVE_TIMEOUTS: u32 = 5;

/// Default all-time total-error threshold for suspension
const MAX_TOTAL_ERRORS: u32 = 10;

/// Transport-level failure categories reported by the fetch engine
///
/// The fetch engine maps whatever its HTTP stack produces into one of these
/// before calling [`ErrorTracker::record_error`]. Only [`Timeout`] feeds the
/// consecutive-timeout counter.
///
/// [`Timeout`]: FetchErrorKind::Timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// The request exceeded its deadline
    Timeout,
    /// TCP connection could not be established
    ConnectionFailed,
    /// Hostname resolution failed
    DnsFailure,
    /// TLS negotiation failed
    TlsFailure,
    /// The server answered with an error status
    HttpStatus,
    /// The redirect limit was exceeded
    TooManyRedirects,
    /// The response body was cut short
    Truncated,
    /// Anything the fetch engine could not classify
    Other,
}

impl FetchErrorKind {
    /// Returns true for the kinds that count toward consecutive timeouts
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchErrorKind::Timeout)
    }
}

/// Per-domain failure history
#[derive(Debug, Default)]
struct DomainErrorStats {
    /// Occurrence count per error kind, accumulated for the process lifetime
    error_counts: HashMap<FetchErrorKind, u32>,
    /// When the most recent error was recorded
    last_error: Option<Instant>,
    /// Back-to-back timeouts since the last success or non-timeout error
    consecutive_timeouts: u32,
}

impl DomainErrorStats {
    fn total_errors(&self) -> u32 {
        self.error_counts.values().sum()
    }
}

/// Shared per-domain error bookkeeping feeding blacklist decisions
///
/// One mutex guards the whole map; every operation is an O(1) in-memory
/// update, so the lock is never held across I/O. None of the operations can
/// fail.
#[derive(Debug)]
pub struct ErrorTracker {
    domain_errors: Mutex<HashMap<String, DomainErrorStats>>,
    max_consecutive_timeouts: u32,
    max_total_errors: u32,
}

impl ErrorTracker {
    /// Creates a tracker with the default suspension thresholds (5 consecutive
    /// timeouts, 10 total errors)
    pub fn new() -> Self {
        Self::with_thresholds(MAX_CONSECUTIVE_TIMEOUTS, MAX_TOTAL_ERRORS)
    }

    /// Creates a tracker with explicit thresholds
    pub fn with_thresholds(max_consecutive_timeouts: u32, max_total_errors: u32) -> Self {
        Self {
            domain_errors: Mutex::new(HashMap::new()),
            max_consecutive_timeouts,
            max_total_errors,
        }
    }

    /// Records a failed fetch attempt for a domain
    ///
    /// Bumps the per-kind count and the last-error timestamp. A timeout
    /// increments the consecutive-timeout counter; any other kind resets it,
    /// since the domain is evidently reachable.
    pub fn record_error(&self, domain: &str, kind: FetchErrorKind) {
        let mut domains = self.domain_errors.lock().unwrap();
        let stats = domains.entry(domain.to_string()).or_default();

        *stats.error_counts.entry(kind).or_insert(0) += 1;
        stats.last_error = Some(Instant::now());

        if kind.is_timeout() {
            stats.consecutive_timeouts += 1;
        } else {
            stats.consecutive_timeouts = 0;
        }
    }

    /// Records a successful fetch, resetting the consecutive-timeout counter
    ///
    /// A no-op for domains with no recorded history.
    pub fn record_success(&self, domain: &str) {
        let mut domains = self.domain_errors.lock().unwrap();
        if let Some(stats) = domains.get_mut(domain) {
            stats.consecutive_timeouts = 0;
        }
    }

    /// Decides whether a domain's history warrants suspension
    ///
    /// True when consecutive timeouts or the all-time error total reach their
    /// thresholds. This is a pure query over accumulated history: it never
    /// touches the blacklist itself - escalation is the caller's explicit
    /// decision.
    pub fn should_blacklist_domain(&self, domain: &str) -> bool {
        let domains = self.domain_errors.lock().unwrap();
        let stats = match domains.get(domain) {
            Some(stats) => stats,
            None => return false,
        };

        if stats.consecutive_timeouts >= self.max_consecutive_timeouts {
            return true;
        }

        stats.total_errors() >= self.max_total_errors
    }

    /// Number of domains with recorded error history
    pub fn tracked_domains(&self) -> usize {
        self.domain_errors.lock().unwrap().len()
    }

    /// Prints per-domain error history to stdout
    pub fn print_stats(&self) {
        let domains = self.domain_errors.lock().unwrap();

        println!("\n================== ERROR STATISTICS ==================");
        for (domain, stats) in domains.iter() {
            println!("Domain: {}", domain);
            println!("  Consecutive timeouts: {}", stats.consecutive_timeouts);
            for (kind, count) in &stats.error_counts {
                println!("  {:?}: {} times", kind, count);
            }
        }
        println!("========================================================\n");
    }

    /// Clears all recorded history, for every domain
    pub fn reset_stats(&self) {
        self.domain_errors.lock().unwrap().clear();
    }
}

impl Default for ErrorTracker {
    fn default() -> Self {
        Self::new()
    }
}

use crate::url::normalize_domain;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default suspension window for temporarily blacklisted domains
const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

/// Both suspension maps, guarded together
#[derive(Debug, Default)]
struct BlacklistState {
    /// Domain -> insertion time; entries expire after the cooldown
    temporary: HashMap<String, Instant>,
    /// Domains suspended unconditionally; never expire
    permanent: HashSet<String>,
}

/// The single source of truth for "may we contact this domain now"
///
/// Fetch workers consult [`is_blacklisted`] before every fetch. Expiry of
/// temporary entries is checked lazily at lookup time, so correctness never
/// depends on [`cleanup_expired`] running - the sweep only bounds map growth.
///
/// One mutex guards both maps: every operation is an O(1) in-memory map
/// manipulation, never I/O.
///
/// [`is_blacklisted`]: DomainBlacklist::is_blacklisted
/// [`cleanup_expired`]: DomainBlacklist::cleanup_expired
#[derive(Debug)]
pub struct DomainBlacklist {
    state: Mutex<BlacklistState>,
    cooldown: Duration,
}

impl DomainBlacklist {
    /// Creates a blacklist with the standard 60-second cooldown
    pub fn new() -> Self {
        Self::with_cooldown(DEFAULT_COOLDOWN)
    }

    /// Creates a blacklist with an explicit cooldown window
    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self {
            state: Mutex::new(BlacklistState::default()),
            cooldown,
        }
    }

    /// Returns true when the domain is currently suspended
    ///
    /// Permanent entries always match. Temporary entries match while their
    /// insertion time is younger than the cooldown; older entries are simply
    /// reported as not blacklisted and left for the next sweep.
    pub fn is_blacklisted(&self, domain: &str) -> bool {
        let state = self.state.lock().unwrap();

        if state.permanent.contains(domain) {
            return true;
        }

        match state.temporary.get(domain) {
            Some(inserted) => inserted.elapsed() < self.cooldown,
            None => false,
        }
    }

    /// Suspends a domain for one cooldown window, refreshing any existing entry
    pub fn add_temporary(&self, domain: &str) {
        let mut state = self.state.lock().unwrap();
        state.temporary.insert(domain.to_string(), Instant::now());
    }

    /// Suspends a domain unconditionally
    ///
    /// Permanent entries never expire and are untouched by [`cleanup_expired`].
    ///
    /// [`cleanup_expired`]: DomainBlacklist::cleanup_expired
    pub fn add_permanent(&self, domain: &str) {
        let mut state = self.state.lock().unwrap();
        state.permanent.insert(domain.to_string());
    }

    /// Eagerly removes expired temporary entries
    ///
    /// Bounds the temporary map's size on long runs. Lookups check expiry
    /// themselves, so skipping this sweep never produces a wrong answer.
    pub fn cleanup_expired(&self) {
        let mut state = self.state.lock().unwrap();
        let cooldown = self.cooldown;
        state
            .temporary
            .retain(|_, inserted| inserted.elapsed() < cooldown);
    }

    /// Total entry count, permanent plus temporary
    pub fn size(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.temporary.len() + state.permanent.len()
    }

    /// Seeds the permanent set from a persisted domain list
    ///
    /// One domain per line; blank lines and lines starting with `#` are
    /// skipped. Raw lines are canonicalized through [`normalize_domain`] so
    /// the loaded keys match what workers look up.
    ///
    /// # Returns
    ///
    /// The number of domains loaded, or the I/O error from opening/reading
    /// the file - the caller decides whether a missing seed file is fatal.
    pub fn load_from_file(&self, path: &Path) -> std::io::Result<usize> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut loaded = 0;

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            self.add_permanent(&normalize_domain(trimmed));
            loaded += 1;
        }

        Ok(loaded)
    }
}

impl Default for DomainBlacklist {
    fn default() -> Self {
        Self::new()
    }
}

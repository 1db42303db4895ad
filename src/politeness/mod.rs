//! Politeness state shared across fetch workers
//!
//! Two components cooperate here: the [`ErrorTracker`] accumulates per-domain
//! failure history, and the [`DomainBlacklist`] holds the resulting suspension
//! decisions. The tracker never escalates on its own - a worker (or a periodic
//! sweep) asks [`ErrorTracker::should_blacklist_domain`] and then explicitly
//! calls [`DomainBlacklist::add_temporary`]. Decisions are eventually
//! consistent under concurrency: a domain may be contacted once or twice past
//! its theoretical suspension point before the next check observes the update.
//!
//! All lookups expect canonical domain keys (see [`crate::url::normalize_domain`]).

mod blacklist;
mod error_tracker;

pub use blacklist::DomainBlacklist;
pub use error_tracker::{ErrorTracker, FetchErrorKind};
